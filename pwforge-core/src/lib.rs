//! # pwforge Core
//!
//! Reconciliation layer between declared vaults, folders and password
//! entries and a Passwork-style secret-management service.
//!
//! This crate provides:
//! - The canonical model and its wire payloads
//! - A secret codec (base64 transport encoding and random generation)
//! - Pure converters between model and wire shapes
//! - Lifecycle engines (create, read, update, delete, import) per resource kind
//! - The [`RemoteClient`] trait and an in-memory implementation for tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use pwforge_core::{FolderModel, Provider, Reconciler, VaultModel};
//!
//! async fn bootstrap(client: Arc<dyn pwforge_core::RemoteClient>) -> Result<(), pwforge_core::ReconcileError> {
//!     let provider = Provider::new(client);
//!     let vault = provider.vaults().create(VaultModel::new("ops")).await?;
//!     let vault_id = vault.id.expect("created vaults carry an id");
//!     provider.folders().create(FolderModel::new("project-x", vault_id)).await?;
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod convert;
pub mod engine;
pub mod error;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod remote;
pub mod secret;
pub mod wire;

// Re-export commonly used types at crate root
pub use model::{
    FolderId,
    FolderModel,
    PasswordId,
    PasswordModel,
    ResourceKind,
    VaultId,
    VaultModel,
};

pub use secret::Secret;

pub use codec::{CodecError, GENERATED_SECRET_LENGTH};

pub use convert::ConvertError;

pub use engine::{
    Engine,
    FolderEngine,
    PasswordEngine,
    Reconciler,
    Resource,
    VaultEngine,
    Written,
};

pub use error::{
    ReconcileError,
    RemoteOperation,
    TransportError,
};

pub use lookup::{
    PasswordLookup,
    PasswordQuery,
};

pub use provider::Provider;

pub use remote::{
    MemoryRemote,
    RecordedCall,
    RemoteClient,
    RemoteError,
};
