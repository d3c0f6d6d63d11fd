//! Neutral schema descriptors handed to the synchronization engine.

use serde::{Deserialize, Serialize};

use crate::convert::ConverterConfiguration;

/// Neutral value type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NeutralType {
    String,
    Bytes,
    Bool,
    /// High-precision decimal (currency).
    Decimal,
    Int32,
    Double,
    DateTime,
    /// Generic fallback for types that cannot be synchronized.
    Object,
}

impl NeutralType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NeutralType::String => "string",
            NeutralType::Bytes => "bytes",
            NeutralType::Bool => "bool",
            NeutralType::Decimal => "decimal",
            NeutralType::Int32 => "int32",
            NeutralType::Double => "double",
            NeutralType::DateTime => "datetime",
            NeutralType::Object => "object",
        }
    }

    /// The nullable variant of this type.
    pub fn nullable(self) -> ValueType {
        ValueType {
            base: self,
            nullable: true,
        }
    }

    /// The non-nullable variant of this type.
    pub fn required(self) -> ValueType {
        ValueType {
            base: self,
            nullable: false,
        }
    }
}

impl std::fmt::Display for NeutralType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A neutral type together with its nullability.
///
/// Displays as `string` or `string?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub base: NeutralType,
    pub nullable: bool,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

/// Portable description of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    pub value_type: ValueType,
    pub nullable: bool,
    /// Maximum length; `-1` means unbounded (binary payloads).
    pub length: i32,
    pub unicode: bool,
    pub read_only: bool,
    /// Value is computed by the remote system.
    pub backend_computed: bool,
    /// Cannot be set at creation but can be updated afterwards.
    pub copy_after_create: bool,
    pub identity: bool,
    pub concurrency_control: bool,
    /// Remote "external id" flag; such fields are correlation candidates.
    pub external_id: bool,
    /// Remote "custom" flag.
    pub custom: bool,
    pub proposed_converter: Option<ConverterConfiguration>,
}

/// Portable description of one object or library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescriptor {
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
    pub identity_field: Option<String>,
    /// Fields usable to match records across systems.
    pub correlation_fields: Vec<String>,
}

impl ObjectDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            identity_field: None,
            correlation_fields: Vec::new(),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Add a correlation field unless it is already listed.
    pub(crate) fn add_correlation_field(&mut self, name: &str) {
        if !self.correlation_fields.iter().any(|f| f == name) {
            self.correlation_fields.push(name.to_string());
        }
    }
}
