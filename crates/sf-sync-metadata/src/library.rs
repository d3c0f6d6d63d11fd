//! Virtual schema for content libraries.
//!
//! A library has no table of its own. Its schema is the document container
//! object merged with the document version object.

use tracing::warn;

use crate::types::ObjectDescriptor;

/// Object whose rows are the content libraries.
pub const CONTENT_WORKSPACE: &str = "ContentWorkspace";

/// Document container object.
pub const CONTENT_DOCUMENT: &str = "ContentDocument";

/// Document version object.
pub const CONTENT_VERSION: &str = "ContentVersion";

/// Built-in version fields kept in a library schema.
pub const CONTENT_VERSION_FIELDS: &[&str] = &[
    "Title",
    "ContentSize",
    "Description",
    "ReasonForChange",
    "VersionData",
    "PathOnClient",
    "FirstPublishLocationId",
];

/// Rules for merging the container and version schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibrarySchema {
    /// Container field replaced by the version field of the same name.
    pub superseded_field: String,
    /// Non-custom version fields to keep.
    pub allow_list: Vec<String>,
}

impl Default for LibrarySchema {
    fn default() -> Self {
        Self {
            superseded_field: "Title".to_string(),
            allow_list: CONTENT_VERSION_FIELDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LibrarySchema {
    /// Synthesize the descriptor of the library `name`.
    ///
    /// Container fields come first, minus the superseded field; then the
    /// version fields that are custom or allow-listed. Identity and
    /// correlation fields are taken from the version object only, and only
    /// where a field of that name survived the merge.
    pub fn synthesize(
        &self,
        name: &str,
        container: &ObjectDescriptor,
        item_version: &ObjectDescriptor,
    ) -> ObjectDescriptor {
        let mut library = ObjectDescriptor::new(name);

        if container.field(&self.superseded_field).is_none() {
            warn!(
                container = %container.name,
                field = %self.superseded_field,
                "Superseded field not found on container"
            );
        }

        library.fields.extend(
            container
                .fields
                .iter()
                .filter(|f| f.name != self.superseded_field)
                .cloned(),
        );
        library.fields.extend(
            item_version
                .fields
                .iter()
                .filter(|f| f.custom || self.allow_list.iter().any(|a| *a == f.name))
                .cloned(),
        );

        library.identity_field = item_version
            .identity_field
            .as_ref()
            .filter(|id| library.field(id).is_some())
            .cloned();
        for field in &mut library.fields {
            field.identity = library.identity_field.as_deref() == Some(field.name.as_str());
        }
        for correlation in &item_version.correlation_fields {
            if library.field(correlation).is_some() {
                library.add_correlation_field(correlation);
            }
        }

        library
    }
}
