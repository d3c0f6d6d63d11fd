//! Minimal XML scanning for Partner API responses.
//!
//! Responses are scanned by local element name, so `<name>`, `<sf:Name>` and
//! `<result xsi:type="QueryResult">` are all found regardless of prefix or
//! attributes. Repeated elements of the same name are assumed not to nest.

use crate::error::{Error, ErrorKind, Result};
use crate::security::xml;
use crate::types::{FieldType, LoginResult, QueryRecord, RawField, RawObject, SoapFault};

/// Blocks inside a `describeSObjects` result whose children reuse names we read.
const NESTED_OBJECT_BLOCKS: &[&str] = &[
    "actionOverrides",
    "childRelationships",
    "fields",
    "namedLayoutInfos",
    "recordTypeInfos",
    "supportedScopes",
];

/// Blocks inside a field describe whose children reuse names we read.
const NESTED_FIELD_BLOCKS: &[&str] = &["picklistValues", "filteredLookupInfo"];

/// An opening tag located in a document.
struct OpenTag<'a> {
    start: usize,
    content_start: usize,
    attributes: &'a str,
    self_closing: bool,
}

impl OpenTag<'_> {
    fn is_nil(&self) -> bool {
        self.attributes.contains("nil=\"true\"")
    }
}

/// Local part of a possibly prefixed element name.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

/// Find the first opening tag with the given local name at or after `from`.
fn find_open_tag<'a>(xml: &'a str, tag: &str, from: usize) -> Option<OpenTag<'a>> {
    let mut pos = from;
    while let Some(rel) = xml[pos..].find('<') {
        let start = pos + rel;
        let rest = &xml[start + 1..];
        let end = rest.find('>')?;
        let inner = &rest[..end];
        pos = start + 1;

        if inner.starts_with('/') || inner.starts_with('?') || inner.starts_with('!') {
            continue;
        }

        let self_closing = inner.ends_with('/');
        let inner = inner.trim_end_matches('/');
        let name_end = inner
            .find(|c: char| c.is_whitespace())
            .unwrap_or(inner.len());
        if local_name(&inner[..name_end]) == tag {
            return Some(OpenTag {
                start,
                content_start: start + 1 + end + 1,
                attributes: &inner[name_end..],
                self_closing,
            });
        }
    }
    None
}

/// Find the closing tag with the given local name at or after `from`.
/// Returns `(start, end)` byte offsets of the closing tag itself.
fn find_close_tag(xml: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let mut pos = from;
    while let Some(rel) = xml[pos..].find("</") {
        let start = pos + rel;
        let rest = &xml[start + 2..];
        let end = rest.find('>')?;
        if local_name(rest[..end].trim()) == tag {
            return Some((start, start + 2 + end + 1));
        }
        pos = start + 2;
    }
    None
}

/// Parse a SOAP fault from the response.
pub(crate) fn parse_soap_fault(xml: &str) -> Option<SoapFault> {
    let fault = find_open_tag(xml, "Fault", 0)?;
    let (close, _) = find_close_tag(xml, "Fault", fault.content_start)?;
    let body = &xml[fault.content_start..close];

    let fault_code = extract_element(body, "faultcode")?;
    let fault_string =
        extract_element(body, "faultstring").unwrap_or_else(|| "Unknown error".to_string());

    Some(SoapFault {
        fault_code,
        fault_string,
    })
}

/// Extract the decoded text of the first element with the given local name.
///
/// Returns `None` when the element is absent, self-closing or `xsi:nil`.
pub(crate) fn extract_element(xml: &str, tag: &str) -> Option<String> {
    let open = find_open_tag(xml, tag, 0)?;
    if open.self_closing || open.is_nil() {
        return None;
    }
    let (close, _) = find_close_tag(xml, tag, open.content_start)?;
    Some(xml::unescape(&xml[open.content_start..close]))
}

/// Extract the raw inner content of every element with the given local name.
pub(crate) fn extract_blocks<'a>(xml: &'a str, tag: &str) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut pos = 0;
    while let Some(open) = find_open_tag(xml, tag, pos) {
        if open.self_closing {
            pos = open.content_start;
            continue;
        }
        match find_close_tag(xml, tag, open.content_start) {
            Some((close, after)) => {
                blocks.push(&xml[open.content_start..close]);
                pos = after;
            }
            None => break,
        }
    }
    blocks
}

/// Remove every element with the given local name, including its content.
pub(crate) fn strip_blocks(xml: &str, tag: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;
    while let Some(open) = find_open_tag(xml, tag, pos) {
        out.push_str(&xml[pos..open.start]);
        if open.self_closing {
            pos = open.content_start;
            continue;
        }
        match find_close_tag(xml, tag, open.content_start) {
            Some((_, after)) => pos = after,
            None => {
                pos = xml.len();
                break;
            }
        }
    }
    out.push_str(&xml[pos..]);
    out
}

fn extract_bool(xml: &str, tag: &str) -> bool {
    extract_element(xml, tag)
        .map(|s| s.trim() == "true")
        .unwrap_or(false)
}

fn required(xml: &str, tag: &str, context: &str) -> Result<String> {
    extract_element(xml, tag).ok_or_else(|| {
        Error::new(ErrorKind::InvalidResponse(format!(
            "Missing {} in {}",
            tag, context
        )))
    })
}

/// Parse a `loginResponse`.
pub(crate) fn parse_login_result(xml: &str) -> Result<LoginResult> {
    let result = extract_blocks(xml, "result")
        .into_iter()
        .next()
        .ok_or_else(|| {
            Error::new(ErrorKind::InvalidResponse(
                "Missing result in loginResponse".to_string(),
            ))
        })?;
    // userInfo repeats several names; only top-level values matter here.
    let top = strip_blocks(result, "userInfo");

    Ok(LoginResult {
        session_id: required(&top, "sessionId", "loginResponse")?,
        server_url: required(&top, "serverUrl", "loginResponse")?,
        password_expired: extract_bool(&top, "passwordExpired"),
    })
}

/// Parse a `describeGlobalResponse` into SObject names.
pub(crate) fn parse_describe_global(xml: &str) -> Vec<String> {
    extract_blocks(xml, "sobjects")
        .into_iter()
        .filter_map(|block| extract_element(block, "name"))
        .collect()
}

/// Parse a `describeSObjectsResponse`.
pub(crate) fn parse_describe_sobjects(xml: &str) -> Result<Vec<RawObject>> {
    let mut objects = Vec::new();

    for result in extract_blocks(xml, "result") {
        let mut top = result.to_string();
        for nested in NESTED_OBJECT_BLOCKS {
            top = strip_blocks(&top, nested);
        }
        let name = required(&top, "name", "describeSObjects result")?;

        let mut object = RawObject::new(name.clone());
        object.custom = extract_bool(&top, "custom");

        for block in extract_blocks(result, "fields") {
            object.fields.push(parse_field(block, &name)?);
        }

        objects.push(object);
    }

    Ok(objects)
}

/// Parse one `<fields>` block of a describe result.
pub(crate) fn parse_field(block: &str, parent_object: &str) -> Result<RawField> {
    let mut top = block.to_string();
    for nested in NESTED_FIELD_BLOCKS {
        top = strip_blocks(&top, nested);
    }

    let name = required(&top, "name", "field describe")?;
    let field_type = FieldType::from_wire(&required(&top, "type", "field describe")?);

    Ok(RawField {
        name,
        field_type,
        nillable: extract_bool(&top, "nillable"),
        length: extract_element(&top, "length")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0),
        createable: extract_bool(&top, "createable"),
        updateable: extract_bool(&top, "updateable"),
        custom: extract_bool(&top, "custom"),
        external_id: extract_bool(&top, "externalId"),
        defaulted_on_create: extract_bool(&top, "defaultedOnCreate"),
        parent_object: parent_object.to_string(),
    })
}

/// Parse a `queryResponse`, reading the requested fields from every record.
pub(crate) fn parse_query_records(xml: &str, fields: &[&str]) -> Vec<QueryRecord> {
    extract_blocks(xml, "records")
        .into_iter()
        .map(|block| QueryRecord {
            id: extract_element(block, "Id"),
            fields: fields
                .iter()
                .map(|f| (f.to_string(), extract_element(block, f)))
                .collect(),
        })
        .collect()
}
