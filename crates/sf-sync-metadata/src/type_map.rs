//! Partner field types to neutral value types.

use busbar_sf_partner::FieldType;

use crate::types::NeutralType;

/// Map a Partner API field type to its neutral value type.
///
/// Total: every type the transport can report, including ones it did not
/// recognise, maps to exactly one neutral type. Types with no portable
/// representation map to [`NeutralType::Object`].
pub fn map_type(field_type: FieldType) -> NeutralType {
    match field_type {
        FieldType::String
        | FieldType::Url
        | FieldType::Email
        | FieldType::Phone
        | FieldType::EncryptedString
        | FieldType::TextArea
        | FieldType::Id => NeutralType::String,
        FieldType::Base64 => NeutralType::Bytes,
        FieldType::Boolean => NeutralType::Bool,
        FieldType::Currency => NeutralType::Decimal,
        FieldType::Int => NeutralType::Int32,
        FieldType::Double => NeutralType::Double,
        FieldType::Date | FieldType::DateTime | FieldType::Time => NeutralType::DateTime,
        FieldType::Picklist | FieldType::MultiPicklist => NeutralType::String,
        FieldType::ComboBox
        | FieldType::Reference
        | FieldType::Percent
        | FieldType::DataCategoryGroupReference
        | FieldType::Location
        | FieldType::Address
        | FieldType::Long
        | FieldType::Json
        | FieldType::ComplexValue
        | FieldType::AnyType => NeutralType::Object,
    }
}
