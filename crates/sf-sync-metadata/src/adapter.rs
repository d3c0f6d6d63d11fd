//! The Salesforce metadata adapter.
//!
//! Every discovery call opens its own session and closes it before returning,
//! whether or not the call succeeded. Object names, library names and the
//! content object schemas are cached for the lifetime of the adapter; create
//! a new adapter to see schema changes.

use std::collections::HashSet;

use busbar_sf_partner::{PartnerTransport, SoapPartnerClient};
use tracing::{debug, instrument, warn};

use crate::config::{AdapterConfiguration, DiscoveredList};
use crate::describe::build_object_descriptor;
use crate::error::{Error, ErrorKind, Result};
use crate::library::{LibrarySchema, CONTENT_DOCUMENT, CONTENT_VERSION, CONTENT_WORKSPACE};
use crate::transform::{MapCapabilities, MetadataTransform};
use crate::types::ObjectDescriptor;

/// Most object types a single `describeSObjects` request accepts.
pub const DESCRIBE_SOBJECTS_LIMIT: usize = 100;

/// A content library found in the org.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    pub id: Option<String>,
    pub name: String,
}

/// Session state of an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
    /// [`MetadataAdapter::close`] was called; every discovery call fails.
    Closed,
}

#[derive(Debug, Clone)]
struct ContentSchema {
    container: ObjectDescriptor,
    item_version: ObjectDescriptor,
}

/// Discovers Salesforce objects and content libraries as neutral descriptors.
///
/// Not meant to be shared: discovery takes `&mut self`.
pub struct MetadataAdapter<T = SoapPartnerClient> {
    config: AdapterConfiguration,
    username: String,
    password: String,
    transport: T,
    state: SessionState,
    object_names: Option<Vec<String>>,
    libraries: Option<Vec<Library>>,
    content_schema: Option<ContentSchema>,
    library_schema: LibrarySchema,
    capabilities: Option<MapCapabilities>,
}

impl<T> std::fmt::Debug for MetadataAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataAdapter")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("state", &self.state)
            .field("object_names", &self.object_names.as_ref().map(Vec::len))
            .field("libraries", &self.libraries.as_ref().map(Vec::len))
            .finish()
    }
}

/// Create an adapter talking to Salesforce over the Partner SOAP API.
///
/// This is the factory registered in [`AdapterRegistry`](crate::AdapterRegistry).
pub fn create_adapter(config: AdapterConfiguration) -> Result<MetadataAdapter> {
    MetadataAdapter::new(config)
}

impl MetadataAdapter<SoapPartnerClient> {
    /// Create an adapter from its configuration.
    pub fn new(config: AdapterConfiguration) -> Result<Self> {
        let settings = config.connection_settings()?;
        let transport = SoapPartnerClient::from_settings(&settings)?;
        Self::with_transport(config, transport)
    }
}

impl<T: PartnerTransport> MetadataAdapter<T> {
    /// Create an adapter on top of an existing transport.
    pub fn with_transport(config: AdapterConfiguration, transport: T) -> Result<Self> {
        let settings = config.connection_settings()?;
        Ok(Self {
            username: settings.username().to_string(),
            password: settings.login_password(),
            config,
            transport,
            state: SessionState::Unauthenticated,
            object_names: None,
            libraries: None,
            content_schema: None,
            library_schema: LibrarySchema::default(),
            capabilities: None,
        })
    }

    /// Use different rules for synthesizing library schemas.
    pub fn with_library_schema(mut self, library_schema: LibrarySchema) -> Self {
        self.library_schema = library_schema;
        self
    }

    pub fn config(&self) -> &AdapterConfiguration {
        &self.config
    }

    /// Consume the adapter, returning its configuration with every discovered list.
    pub fn into_config(self) -> AdapterConfiguration {
        self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Libraries found by the last listing, if any listing happened.
    pub fn libraries(&self) -> Option<&[Library]> {
        self.libraries.as_deref()
    }

    /// Close the adapter. Later discovery calls fail with [`ErrorKind::Closed`].
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// List every object and library name visible to the configured user.
    ///
    /// A name used by both an object and a library appears once.
    #[instrument(skip(self))]
    pub async fn list_names(&mut self) -> Result<Vec<String>> {
        self.login().await?;
        let outcome = self.collect_names().await;
        self.finish(outcome).await
    }

    /// Describe the named objects and libraries.
    ///
    /// Objects come first, then libraries. Names that are neither are left
    /// out of the result. Objects are described in batches of
    /// [`DESCRIBE_SOBJECTS_LIMIT`], the most one `describeSObjects` call accepts.
    #[instrument(skip(self))]
    pub async fn describe(&mut self, names: &[&str]) -> Result<Vec<ObjectDescriptor>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        self.login().await?;
        let outcome = self.describe_lists(names).await;
        self.finish(outcome).await
    }

    /// Mapping capabilities of this adapter.
    pub fn capabilities(&mut self) -> &MapCapabilities {
        self.capabilities.get_or_insert_with(MapCapabilities::salesforce)
    }

    /// The metadata transform for the given capabilities, or this adapter's own.
    pub fn transform(&mut self, capabilities: Option<&MapCapabilities>) -> Result<MetadataTransform> {
        let capabilities = match capabilities {
            Some(capabilities) => capabilities.clone(),
            None => self.capabilities().clone(),
        };
        MetadataTransform::new(capabilities)
    }

    /// Not supported by this adapter.
    pub fn forward_map(&self, _lists: &[ObjectDescriptor]) -> Result<serde_json::Value> {
        Err(Error::unsupported("forward_map"))
    }

    async fn login(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Err(Error::new(ErrorKind::Closed));
        }

        let result = self
            .transport
            .login(&self.username, &self.password)
            .await
            .map_err(Error::login)?;
        self.state = SessionState::Authenticated;

        if result.password_expired {
            if let Err(err) = self.logout().await {
                warn!(error = %err, "Logout failed after expired-password login");
            }
            return Err(Error::new(ErrorKind::Authentication(
                "Salesforce password has expired.".to_string(),
            )));
        }

        debug!("Logged in");
        Ok(())
    }

    async fn logout(&mut self) -> Result<()> {
        self.state = SessionState::Unauthenticated;
        self.transport
            .logout()
            .await
            .map_err(|e| Error::remote("logout", e))
    }

    /// Log out, keeping the first error: the operation's own, else the logout's.
    async fn finish<R>(&mut self, outcome: Result<R>) -> Result<R> {
        let logout = self.logout().await;
        match (outcome, logout) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(logout_err)) => Err(logout_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(logout_err)) => {
                warn!(error = %logout_err, "Logout failed after an earlier error");
                Err(err)
            }
        }
    }

    async fn collect_names(&mut self) -> Result<Vec<String>> {
        let object_names = self.fetch_object_names().await?;
        let mut names = object_names.clone();
        self.object_names = Some(object_names);

        if names.iter().any(|n| n == CONTENT_WORKSPACE) {
            let libraries = self.fetch_libraries().await?;
            names.extend(libraries.iter().map(|l| l.name.clone()));
            self.libraries = Some(libraries);
        }

        let mut seen = HashSet::new();
        names.retain(|n| seen.insert(n.clone()));
        debug!(count = names.len(), "Listed names");
        Ok(names)
    }

    async fn describe_lists(&mut self, names: &[&str]) -> Result<Vec<ObjectDescriptor>> {
        if self.object_names.is_none() {
            self.object_names = Some(self.fetch_object_names().await?);
        } else {
            debug!("Using cached object names");
        }
        let known = self.object_names.clone().unwrap_or_default();
        if self.libraries.is_none() && known.iter().any(|n| n == CONTENT_WORKSPACE) {
            self.libraries = Some(self.fetch_libraries().await?);
        }

        let objects: Vec<String> = known
            .into_iter()
            .filter(|n| names.contains(&n.as_str()))
            .collect();

        let mut descriptors = Vec::new();
        for batch in objects.chunks(DESCRIBE_SOBJECTS_LIMIT) {
            let raw = self
                .transport
                .describe_sobjects(batch)
                .await
                .map_err(|e| Error::remote("metadata", e))?;
            for object in &raw {
                let descriptor = build_object_descriptor(object);
                self.config.record(DiscoveredList {
                    name: descriptor.name.clone(),
                    library_id: None,
                    source_objects: vec![object.name.clone()],
                });
                descriptors.push(descriptor);
            }
        }

        let mut remaining: Vec<&str> = Vec::new();
        for name in names {
            if !objects.iter().any(|o| o == name) && !remaining.contains(name) {
                remaining.push(*name);
            }
        }

        let mut content_missing = false;
        for name in remaining {
            let library = self
                .libraries
                .as_ref()
                .and_then(|libraries| libraries.iter().find(|l| l.name == name))
                .cloned();
            let Some(library) = library else {
                debug!(name, "Omitting unknown list");
                continue;
            };

            if self.content_schema.is_none() && !content_missing {
                self.content_schema = self.fetch_content_schema().await?;
                content_missing = self.content_schema.is_none();
            }
            let Some(schema) = &self.content_schema else {
                continue;
            };

            let descriptor =
                self.library_schema
                    .synthesize(name, &schema.container, &schema.item_version);
            self.config.record(DiscoveredList {
                name: name.to_string(),
                library_id: library.id,
                source_objects: vec![CONTENT_DOCUMENT.to_string(), CONTENT_VERSION.to_string()],
            });
            descriptors.push(descriptor);
        }

        debug!(count = descriptors.len(), "Described lists");
        Ok(descriptors)
    }

    async fn fetch_object_names(&self) -> Result<Vec<String>> {
        self.transport
            .describe_global()
            .await
            .map_err(|e| Error::remote("description", e))
    }

    async fn fetch_libraries(&self) -> Result<Vec<Library>> {
        let records = self
            .transport
            .query(CONTENT_WORKSPACE, &["Id", "Name"])
            .await
            .map_err(|e| Error::remote("query", e))?;

        let mut libraries = Vec::with_capacity(records.len());
        for record in records {
            match record.get("Name") {
                Some(name) => libraries.push(Library {
                    name: name.to_string(),
                    id: record.id.clone(),
                }),
                None => warn!(id = ?record.id, "Skipping library without a name"),
            }
        }
        debug!(count = libraries.len(), "Fetched libraries");
        Ok(libraries)
    }

    async fn fetch_content_schema(&self) -> Result<Option<ContentSchema>> {
        let raw = self
            .transport
            .describe_sobjects(&[CONTENT_DOCUMENT.to_string(), CONTENT_VERSION.to_string()])
            .await
            .map_err(|e| Error::remote("metadata", e))?;

        let find = |name: &str| {
            raw.iter()
                .find(|object| object.name == name)
                .map(build_object_descriptor)
        };
        match (find(CONTENT_DOCUMENT), find(CONTENT_VERSION)) {
            (Some(container), Some(item_version)) => Ok(Some(ContentSchema {
                container,
                item_version,
            })),
            _ => {
                warn!("Content objects are not described; libraries are omitted");
                Ok(None)
            }
        }
    }
}
