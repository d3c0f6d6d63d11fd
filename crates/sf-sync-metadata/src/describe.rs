//! Raw Partner describe results to neutral descriptors.

use busbar_sf_partner::{FieldType, RawField, RawObject};
use tracing::warn;

use crate::convert::{ConverterConfiguration, ConverterKind, PicklistConverter};
use crate::type_map::map_type;
use crate::types::{FieldDescriptor, NeutralType, ObjectDescriptor, ValueType};

/// Modification timestamp used for optimistic concurrency.
pub const SYSTEM_MODSTAMP: &str = "SystemModstamp";

/// Content size, computed by Salesforce from the uploaded payload.
pub const CONTENT_SIZE: &str = "ContentSize";

/// Build the descriptor for one field.
///
/// Returns `None` for fields whose type has no neutral counterpart; those
/// cannot be synchronized and are left out of the object descriptor.
pub fn build_field_descriptor(field: &RawField) -> Option<FieldDescriptor> {
    let base = map_type(field.field_type);
    if base == NeutralType::Object {
        return None;
    }

    let proposed_converter = match field.field_type {
        FieldType::Date => Some(ConverterConfiguration::new(ConverterKind::Date)),
        FieldType::Picklist => Some(
            ConverterConfiguration::new(ConverterKind::Picklist)
                .with_configuration(PicklistConverter::encode(false)),
        ),
        FieldType::MultiPicklist => Some(
            ConverterConfiguration::new(ConverterKind::Picklist)
                .with_configuration(PicklistConverter::encode(true)),
        ),
        _ => None,
    };

    Some(FieldDescriptor {
        name: field.name.clone(),
        value_type: ValueType {
            base,
            nullable: field.nillable,
        },
        nullable: field.nillable,
        length: if field.field_type == FieldType::Base64 {
            -1
        } else {
            field.length
        },
        unicode: base == NeutralType::String,
        read_only: !field.createable && !field.updateable,
        backend_computed: field.defaulted_on_create || field.name == CONTENT_SIZE,
        copy_after_create: !field.createable && field.updateable,
        identity: field.field_type == FieldType::Id,
        concurrency_control: field.name == SYSTEM_MODSTAMP,
        external_id: field.external_id,
        custom: field.custom,
        proposed_converter,
    })
}

/// Build the descriptor for one object, keeping field declaration order.
pub fn build_object_descriptor(object: &RawObject) -> ObjectDescriptor {
    let mut descriptor = ObjectDescriptor::new(object.name.clone());

    for raw in &object.fields {
        let Some(mut field) = build_field_descriptor(raw) else {
            continue;
        };

        if field.identity {
            match &descriptor.identity_field {
                None => {
                    descriptor.identity_field = Some(field.name.clone());
                    descriptor.add_correlation_field(&field.name);
                }
                Some(existing) => {
                    warn!(
                        object = %object.name,
                        field = %field.name,
                        identity = %existing,
                        "Ignoring additional identity field"
                    );
                    field.identity = false;
                }
            }
        }
        if field.external_id {
            descriptor.add_correlation_field(&field.name);
        }

        descriptor.fields.push(field);
    }

    descriptor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, ty: FieldType) -> RawField {
        RawField::new("Account", name, ty)
    }

    #[test]
    fn test_fallback_type_is_skipped() {
        assert!(build_field_descriptor(&field("OwnerId", FieldType::Reference)).is_none());
        assert!(build_field_descriptor(&field("BillingAddress", FieldType::Address)).is_none());
    }

    #[test]
    fn test_nullable_and_length() {
        let mut raw = field("Name", FieldType::String);
        raw.nillable = true;
        raw.length = 255;
        let desc = build_field_descriptor(&raw).unwrap();
        assert_eq!(desc.value_type, NeutralType::String.nullable());
        assert!(desc.nullable);
        assert_eq!(desc.length, 255);
        assert!(desc.unicode);

        let mut raw = field("Body", FieldType::Base64);
        raw.length = 100;
        let desc = build_field_descriptor(&raw).unwrap();
        assert_eq!(desc.value_type, NeutralType::Bytes.required());
        assert_eq!(desc.length, -1);
        assert!(!desc.unicode);
    }

    #[test]
    fn test_permission_flags() {
        let mut raw = field("Name", FieldType::String);
        raw.createable = true;
        raw.updateable = true;
        let desc = build_field_descriptor(&raw).unwrap();
        assert!(!desc.read_only && !desc.copy_after_create);

        let raw = field("CreatedDate", FieldType::DateTime);
        let desc = build_field_descriptor(&raw).unwrap();
        assert!(desc.read_only);
        assert!(!desc.copy_after_create);

        let mut raw = field("Status", FieldType::String);
        raw.updateable = true;
        let desc = build_field_descriptor(&raw).unwrap();
        assert!(!desc.read_only);
        assert!(desc.copy_after_create);
    }

    #[test]
    fn test_computed_and_concurrency_fields() {
        let mut raw = field("CreatedById", FieldType::String);
        raw.defaulted_on_create = true;
        assert!(build_field_descriptor(&raw).unwrap().backend_computed);

        let raw = field(CONTENT_SIZE, FieldType::Int);
        assert!(build_field_descriptor(&raw).unwrap().backend_computed);

        let raw = field(SYSTEM_MODSTAMP, FieldType::DateTime);
        let desc = build_field_descriptor(&raw).unwrap();
        assert!(desc.concurrency_control);
        assert!(!desc.backend_computed);
    }

    #[test]
    fn test_proposed_converters() {
        let desc = build_field_descriptor(&field("CloseDate", FieldType::Date)).unwrap();
        assert_eq!(
            desc.proposed_converter,
            Some(ConverterConfiguration::new(ConverterKind::Date))
        );

        let desc = build_field_descriptor(&field("Rating", FieldType::Picklist)).unwrap();
        let converter = desc.proposed_converter.unwrap();
        assert_eq!(converter.kind, ConverterKind::Picklist);
        assert_eq!(converter.configuration.as_deref(), Some("IsMultiChoice=False;;"));

        let desc = build_field_descriptor(&field("Regions__c", FieldType::MultiPicklist)).unwrap();
        assert_eq!(
            desc.proposed_converter.unwrap().configuration.as_deref(),
            Some("IsMultiChoice=True;;")
        );

        let desc = build_field_descriptor(&field("LastModifiedDate", FieldType::DateTime)).unwrap();
        assert!(desc.proposed_converter.is_none());
    }

    #[test]
    fn test_object_descriptor() {
        let mut object = RawObject::new("Account");
        object.fields.push(field("Id", FieldType::Id));
        object.fields.push(field("OwnerId", FieldType::Reference));
        object.fields.push(field("Name", FieldType::String));
        let mut ext = field("AccountNumber__c", FieldType::String);
        ext.external_id = true;
        ext.custom = true;
        object.fields.push(ext);

        let desc = build_object_descriptor(&object);
        assert_eq!(desc.name, "Account");
        assert_eq!(
            desc.field_names().collect::<Vec<_>>(),
            vec!["Id", "Name", "AccountNumber__c"]
        );
        assert_eq!(desc.identity_field.as_deref(), Some("Id"));
        assert_eq!(desc.correlation_fields, vec!["Id", "AccountNumber__c"]);
    }

    #[test]
    fn test_single_identity_field() {
        let mut object = RawObject::new("Odd");
        object.fields.push(field("Id", FieldType::Id));
        object.fields.push(field("OtherId", FieldType::Id));

        let desc = build_object_descriptor(&object);
        let identities: Vec<_> = desc.fields.iter().filter(|f| f.identity).collect();
        assert_eq!(identities.len(), 1);
        assert_eq!(identities[0].name, "Id");
        assert_eq!(desc.identity_field.as_deref(), Some("Id"));
        assert_eq!(desc.correlation_fields, vec!["Id"]);
    }

    #[test]
    fn test_object_without_identity() {
        let mut object = RawObject::new("Plain");
        object.fields.push(field("Name", FieldType::String));

        let desc = build_object_descriptor(&object);
        assert!(desc.identity_field.is_none());
        assert!(desc.correlation_fields.is_empty());
    }
}
