//! Lifecycle engines for managed resources.
//!
//! The lifecycle of every resource kind is the same:
//! - **create** validates, fills in generated values, writes, and settles
//! - **read** fetches and normalizes; a missing entity is [`ReconcileError::NotFound`]
//! - **update** writes the mutable subset and settles
//! - **delete** removes; an already-missing entity counts as deleted
//! - **import** adopts an existing entity, exactly like read
//!
//! "Settling" turns a write response into the authoritative state: a full
//! payload is normalized directly, an identifier-only payload triggers a
//! follow-up read. [`Engine`] implements this once; each kind supplies a
//! [`Resource`] with the calls and conversions specific to it.
//!
//! Engines hold no state besides the injected [`RemoteClient`] and are safe
//! to share across tasks. Operations on the same entity must be serialized by
//! the caller.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::convert::ConvertError;
use crate::error::{ReconcileError, RemoteOperation, TransportError};
use crate::model::ResourceKind;
use crate::remote::{RemoteClient, RemoteError};
use crate::wire::Envelope;

pub mod folder;
pub mod password;
pub mod vault;

pub use folder::{FolderEngine, FolderResource};
pub use password::{PasswordEngine, PasswordResource};
pub use vault::{VaultEngine, VaultResource};

/// Response of a remote write.
#[derive(Debug)]
pub enum Written<D> {
    /// The write returned the complete entity.
    Full(Envelope<D>),
    /// The write returned only the entity identifier.
    Partial(Envelope<String>),
}

/// Kind-specific part of a resource lifecycle.
#[async_trait]
pub trait Resource: Send + Sync {
    type Id: AsRef<str> + fmt::Display + Send + Sync;
    type Model: Send + Sync;
    type Data: Send;
    type CreateRequest: Send + Sync;
    type UpdateRequest: Send + Sync;

    const KIND: ResourceKind;

    /// Reject a desired model before anything is sent.
    fn validate(&self, _desired: &Self::Model) -> Result<(), ReconcileError> {
        Ok(())
    }

    /// Fill in values that are generated once at creation.
    fn prepare(&self, desired: Self::Model) -> Result<Self::Model, ReconcileError> {
        Ok(desired)
    }

    fn create_request(&self, desired: &Self::Model) -> Result<Self::CreateRequest, ReconcileError>;

    fn update_request(&self, desired: &Self::Model) -> Self::UpdateRequest;

    async fn add(
        &self,
        client: &dyn RemoteClient,
        request: &Self::CreateRequest,
    ) -> Result<Written<Self::Data>, RemoteError>;

    async fn get(&self, client: &dyn RemoteClient, id: &str)
        -> Result<Envelope<Self::Data>, RemoteError>;

    async fn edit(
        &self,
        client: &dyn RemoteClient,
        id: &str,
        request: &Self::UpdateRequest,
    ) -> Result<Written<Self::Data>, RemoteError>;

    async fn remove(&self, client: &dyn RemoteClient, id: &str) -> Result<(), RemoteError>;

    fn normalize(&self, data: Self::Data) -> Result<Self::Model, ConvertError>;

    /// Log immutable attributes the remote state did not take.
    fn check_drift(&self, _desired: &Self::Model, _live: &Self::Model) {}
}

/// Lifecycle operations the host framework drives.
#[async_trait]
pub trait Reconciler: Send + Sync {
    type Id: Send + Sync;
    type Model: Send;

    async fn create(&self, desired: Self::Model) -> Result<Self::Model, ReconcileError>;

    async fn read(&self, id: &Self::Id) -> Result<Self::Model, ReconcileError>;

    /// Apply the mutable subset of `desired` and return the remote state.
    async fn update(&self, id: &Self::Id, desired: Self::Model)
        -> Result<Self::Model, ReconcileError>;

    async fn delete(&self, id: &Self::Id) -> Result<(), ReconcileError>;

    /// Adopt an existing remote entity.
    async fn import(&self, id: &Self::Id) -> Result<Self::Model, ReconcileError> {
        self.read(id).await
    }

    /// Read, mapping a missing entity to `None` so a stale record can be dropped.
    async fn refresh(&self, id: &Self::Id) -> Result<Option<Self::Model>, ReconcileError> {
        match self.read(id).await {
            Ok(model) => Ok(Some(model)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Generic lifecycle engine over one resource kind.
pub struct Engine<R> {
    resource: R,
    client: Arc<dyn RemoteClient>,
}

impl<R: Resource + Default> Engine<R> {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self::with_resource(R::default(), client)
    }
}

impl<R: Resource> Engine<R> {
    pub fn with_resource(resource: R, client: Arc<dyn RemoteClient>) -> Self {
        Self { resource, client }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    fn transport(operation: RemoteOperation, id: Option<&str>, source: RemoteError) -> TransportError {
        TransportError::new(R::KIND, operation, id, source)
    }

    fn normalize(&self, data: R::Data) -> Result<R::Model, ReconcileError> {
        self.resource
            .normalize(data)
            .map_err(|e| ReconcileError::convert(R::KIND, e))
    }

    /// Fetch and normalize. Both a missing entity and a non-success status
    /// are reported as not found.
    async fn fetch(&self, id: &str) -> Result<R::Model, ReconcileError> {
        debug!("reading {} {}", R::KIND, id);
        let not_found = || ReconcileError::NotFound {
            kind: R::KIND,
            id: id.to_string(),
        };

        let envelope = match self.resource.get(self.client.as_ref(), id).await {
            Ok(envelope) => envelope,
            Err(RemoteError::NotFound) => return Err(not_found()),
            Err(source) => {
                return Err(Self::transport(RemoteOperation::Get, Some(id), source).into());
            }
        };
        if !envelope.is_success() {
            debug!(
                "{} {} reported status '{}'",
                R::KIND,
                id,
                envelope.status
            );
            return Err(not_found());
        }

        let data = envelope
            .into_result()
            .map_err(|source| Self::transport(RemoteOperation::Get, Some(id), source))?;
        self.normalize(data)
    }

    /// Turn a write response into the authoritative remote state.
    async fn settle(
        &self,
        written: Written<R::Data>,
        operation: RemoteOperation,
        id: Option<&str>,
    ) -> Result<R::Model, ReconcileError> {
        match written {
            Written::Full(envelope) => {
                let data = envelope
                    .into_result()
                    .map_err(|source| Self::transport(operation, id, source))?;
                self.normalize(data)
            }
            Written::Partial(envelope) => {
                let written_id = envelope
                    .into_result()
                    .map_err(|source| Self::transport(operation, id, source))?;
                debug!("{} {} returned an id only, re-reading", R::KIND, written_id);
                match self.fetch(&written_id).await {
                    // A freshly created entity must stay traceable by its id.
                    Err(e) if id.is_none() && e.is_not_found() => Err(Self::transport(
                        RemoteOperation::Get,
                        Some(&written_id),
                        RemoteError::NotFound,
                    )
                    .into()),
                    other => other,
                }
            }
        }
    }
}

impl<R> fmt::Debug for Engine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("resource", &std::any::type_name::<R>())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<R: Resource> Reconciler for Engine<R> {
    type Id = R::Id;
    type Model = R::Model;

    async fn create(&self, desired: R::Model) -> Result<R::Model, ReconcileError> {
        self.resource.validate(&desired)?;
        let desired = self.resource.prepare(desired)?;
        let request = self.resource.create_request(&desired)?;

        let wrap = |source| ReconcileError::Create {
            kind: R::KIND,
            source,
        };

        debug!("creating {}", R::KIND);
        let written = self
            .resource
            .add(self.client.as_ref(), &request)
            .await
            .map_err(|source| wrap(Self::transport(RemoteOperation::Add, None, source)))?;
        let live = self
            .settle(written, RemoteOperation::Add, None)
            .await
            .map_err(|e| e.within(wrap))?;

        info!("created {}", R::KIND);
        Ok(live)
    }

    async fn read(&self, id: &R::Id) -> Result<R::Model, ReconcileError> {
        self.fetch(id.as_ref()).await
    }

    async fn update(&self, id: &R::Id, desired: R::Model) -> Result<R::Model, ReconcileError> {
        self.resource.validate(&desired)?;
        let id = id.as_ref();
        let request = self.resource.update_request(&desired);

        let wrap = |source| ReconcileError::Update {
            kind: R::KIND,
            id: id.to_string(),
            source,
        };

        debug!("updating {} {}", R::KIND, id);
        let written = self
            .resource
            .edit(self.client.as_ref(), id, &request)
            .await
            .map_err(|source| wrap(Self::transport(RemoteOperation::Edit, Some(id), source)))?;
        let live = self
            .settle(written, RemoteOperation::Edit, Some(id))
            .await
            .map_err(|e| e.within(wrap))?;

        self.resource.check_drift(&desired, &live);
        info!("updated {} {}", R::KIND, id);
        Ok(live)
    }

    async fn delete(&self, id: &R::Id) -> Result<(), ReconcileError> {
        let id = id.as_ref();
        debug!("deleting {} {}", R::KIND, id);

        match self.resource.remove(self.client.as_ref(), id).await {
            Ok(()) => {
                info!("deleted {} {}", R::KIND, id);
                Ok(())
            }
            Err(RemoteError::NotFound) => {
                warn!("{} {} was already gone", R::KIND, id);
                Ok(())
            }
            Err(source) => Err(ReconcileError::Delete {
                kind: R::KIND,
                id: id.to_string(),
                source: Self::transport(RemoteOperation::Delete, Some(id), source),
            }),
        }
    }
}
