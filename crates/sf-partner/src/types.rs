//! Raw schema types returned by the Partner API.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default Partner API version.
pub const DEFAULT_API_VERSION: &str = "62.0";

/// Partner API `fieldType` enumeration.
///
/// See the `fieldType` simple type in the Partner WSDL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldType {
    String,
    Picklist,
    MultiPicklist,
    ComboBox,
    Reference,
    Base64,
    Boolean,
    Currency,
    TextArea,
    Int,
    Long,
    Double,
    Percent,
    Phone,
    Id,
    Date,
    DateTime,
    Time,
    Url,
    Email,
    EncryptedString,
    DataCategoryGroupReference,
    Location,
    Address,
    Json,
    ComplexValue,
    AnyType,
}

impl FieldType {
    /// Parse a wire name. Names this crate does not know become [`FieldType::AnyType`].
    pub fn from_wire(name: &str) -> Self {
        match name {
            "string" => FieldType::String,
            "picklist" => FieldType::Picklist,
            "multipicklist" => FieldType::MultiPicklist,
            "combobox" => FieldType::ComboBox,
            "reference" => FieldType::Reference,
            "base64" => FieldType::Base64,
            "boolean" => FieldType::Boolean,
            "currency" => FieldType::Currency,
            "textarea" => FieldType::TextArea,
            "int" => FieldType::Int,
            "long" => FieldType::Long,
            "double" => FieldType::Double,
            "percent" => FieldType::Percent,
            "phone" => FieldType::Phone,
            "id" => FieldType::Id,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "time" => FieldType::Time,
            "url" => FieldType::Url,
            "email" => FieldType::Email,
            "encryptedstring" => FieldType::EncryptedString,
            "datacategorygroupreference" => FieldType::DataCategoryGroupReference,
            "location" => FieldType::Location,
            "address" => FieldType::Address,
            "json" => FieldType::Json,
            "complexvalue" => FieldType::ComplexValue,
            _ => FieldType::AnyType,
        }
    }

    /// The wire name of this type.
    pub fn as_wire(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Picklist => "picklist",
            FieldType::MultiPicklist => "multipicklist",
            FieldType::ComboBox => "combobox",
            FieldType::Reference => "reference",
            FieldType::Base64 => "base64",
            FieldType::Boolean => "boolean",
            FieldType::Currency => "currency",
            FieldType::TextArea => "textarea",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Double => "double",
            FieldType::Percent => "percent",
            FieldType::Phone => "phone",
            FieldType::Id => "id",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
            FieldType::Url => "url",
            FieldType::Email => "email",
            FieldType::EncryptedString => "encryptedstring",
            FieldType::DataCategoryGroupReference => "datacategorygroupreference",
            FieldType::Location => "location",
            FieldType::Address => "address",
            FieldType::Json => "json",
            FieldType::ComplexValue => "complexvalue",
            FieldType::AnyType => "anyType",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// One field of a `describeSObjects` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    pub name: String,
    pub field_type: FieldType,
    pub nillable: bool,
    /// Declared length; `0` for types without one.
    pub length: i32,
    pub createable: bool,
    pub updateable: bool,
    pub custom: bool,
    pub external_id: bool,
    pub defaulted_on_create: bool,
    /// Name of the SObject this field was described on.
    pub parent_object: String,
}

impl RawField {
    /// Create a field with every capability flag cleared.
    pub fn new(
        parent_object: impl Into<String>,
        name: impl Into<String>,
        field_type: FieldType,
    ) -> Self {
        Self {
            name: name.into(),
            field_type,
            nillable: false,
            length: 0,
            createable: false,
            updateable: false,
            custom: false,
            external_id: false,
            defaulted_on_create: false,
            parent_object: parent_object.into(),
        }
    }
}

/// One `describeSObjects` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    pub name: String,
    pub custom: bool,
    /// Fields in declaration order.
    pub fields: Vec<RawField>,
}

impl RawObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            custom: false,
            fields: Vec::new(),
        }
    }

    /// Look up a field by name.
    pub fn field(&self, name: &str) -> Option<&RawField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Result of a successful `login` call.
///
/// The session id is redacted in Debug output.
#[derive(Clone, PartialEq)]
pub struct LoginResult {
    pub session_id: String,
    pub server_url: String,
    pub password_expired: bool,
}

impl std::fmt::Debug for LoginResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResult")
            .field("session_id", &"[REDACTED]")
            .field("server_url", &self.server_url)
            .field("password_expired", &self.password_expired)
            .finish()
    }
}

/// A row returned by `query`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub id: Option<String>,
    /// Selected field values keyed by field name; `None` for `xsi:nil` values.
    pub fields: HashMap<String, Option<String>>,
}

impl QueryRecord {
    /// Get a non-null field value.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }
}

/// SOAP Fault from the Partner API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoapFault {
    pub fault_code: String,
    pub fault_string: String,
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SOAP Fault: {} - {}", self.fault_code, self.fault_string)
    }
}

impl std::error::Error for SoapFault {}
