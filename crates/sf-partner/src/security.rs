//! Escaping and validation for values placed into SOAP envelopes and SOQL.
//!
//! Every value that reaches an envelope goes through [`xml::escape`], and every
//! SObject or field name that reaches a SOQL statement is checked with
//! [`soql::is_safe_field_name`] first.

/// SOQL identifier validation.
pub mod soql {
    /// Validate that a field name contains only safe characters.
    ///
    /// Field names must start with a letter and may only contain ASCII
    /// alphanumerics and underscores (which covers the `__c` custom suffix).
    ///
    /// ```rust
    /// use busbar_sf_partner::security::soql;
    ///
    /// assert!(soql::is_safe_field_name("Name"));
    /// assert!(soql::is_safe_field_name("Region__c"));
    /// assert!(!soql::is_safe_field_name("Name FROM User--"));
    /// ```
    #[must_use]
    pub fn is_safe_field_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {}
            _ => return false,
        }
        chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
    }

    /// Validate that a SObject name is safe.
    #[must_use]
    pub fn is_safe_sobject_name(name: &str) -> bool {
        is_safe_field_name(name)
    }
}

/// XML text escaping.
pub mod xml {
    /// Escape a string for safe inclusion in XML content.
    ///
    /// ```rust
    /// use busbar_sf_partner::security::xml;
    ///
    /// assert_eq!(xml::escape("a<b & 'c'"), "a&lt;b &amp; &apos;c&apos;");
    /// ```
    #[must_use]
    pub fn escape(value: &str) -> String {
        let mut escaped = String::with_capacity(value.len() + 16);
        for ch in value.chars() {
            match ch {
                '&' => escaped.push_str("&amp;"),
                '<' => escaped.push_str("&lt;"),
                '>' => escaped.push_str("&gt;"),
                '"' => escaped.push_str("&quot;"),
                '\'' => escaped.push_str("&apos;"),
                _ => escaped.push(ch),
            }
        }
        escaped
    }

    /// Decode the predefined entities and numeric character references.
    ///
    /// Unknown or malformed references are kept verbatim.
    #[must_use]
    pub fn unescape(value: &str) -> String {
        if !value.contains('&') {
            return value.to_string();
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(amp) = rest.find('&') {
            out.push_str(&rest[..amp]);
            let candidate = &rest[amp..];
            let decoded = candidate
                .find(';')
                .and_then(|end| decode_entity(&candidate[1..end]).map(|ch| (ch, end)));
            match decoded {
                Some((ch, end)) => {
                    out.push(ch);
                    rest = &candidate[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }

    fn decode_entity(entity: &str) -> Option<char> {
        match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                let code = if let Some(hex) = entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok()?
                } else {
                    entity.strip_prefix('#')?.parse().ok()?
                };
                char::from_u32(code)
            }
        }
    }
}
