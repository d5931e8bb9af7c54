//! Remote service abstraction.
//!
//! This module provides:
//! - [`RemoteClient`] - Trait for the CRUD operations of the remote service
//! - [`RemoteError`] - Transport and API failures reported by a client
//! - [`MemoryRemote`] - In-memory implementation for testing
//!
//! The reconciliation engines only consume this trait. An HTTP implementation
//! lives in the `pwforge-client` crate.

use async_trait::async_trait;
use thiserror::Error;

use crate::wire::{
    FolderAddRequest, FolderEditRequest, FolderResponse, PasswordAddRequest,
    PasswordEditRequest, PasswordResponse, PasswordSearchRequest, PasswordSearchResponse,
    VaultAddRequest, VaultEditRequest, VaultOperationResponse, VaultResponse,
};

mod memory;

pub use memory::{MemoryRemote, RecordedCall};

/// Error type for remote operations.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The target entity does not exist.
    #[error("entity not found")]
    NotFound,

    /// The service answered with a non-success status.
    #[error("request rejected with status '{status}' (code: {})", .code.as_deref().unwrap_or("none"))]
    Rejected {
        status: String,
        code: Option<String>,
    },

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Login was refused or the session is no longer valid.
    #[error("authentication failed: {message}")]
    Unauthorized { message: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure.
    #[error("network error: {message}")]
    Network { message: String },

    /// The response body could not be understood.
    #[error("malformed response: {message}")]
    Malformed { message: String },
}

/// CRUD operations of the remote secret-management service.
///
/// Every method performs exactly one remote call. Implementations must not
/// retry, cache, or interpret statuses beyond mapping transport failures to
/// [`RemoteError`]; non-success envelopes are returned as-is to the caller.
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Create a vault. The response carries only the new vault ID.
    async fn add_vault(&self, request: &VaultAddRequest)
        -> Result<VaultOperationResponse, RemoteError>;

    async fn get_vault(&self, id: &str) -> Result<VaultResponse, RemoteError>;

    /// Rename a vault. The response carries only the vault ID.
    async fn edit_vault(
        &self,
        id: &str,
        request: &VaultEditRequest,
    ) -> Result<VaultOperationResponse, RemoteError>;

    async fn delete_vault(&self, id: &str) -> Result<(), RemoteError>;

    async fn add_folder(&self, request: &FolderAddRequest) -> Result<FolderResponse, RemoteError>;

    async fn get_folder(&self, id: &str) -> Result<FolderResponse, RemoteError>;

    async fn edit_folder(
        &self,
        id: &str,
        request: &FolderEditRequest,
    ) -> Result<FolderResponse, RemoteError>;

    async fn delete_folder(&self, id: &str) -> Result<(), RemoteError>;

    async fn add_password(
        &self,
        request: &PasswordAddRequest,
    ) -> Result<PasswordResponse, RemoteError>;

    async fn get_password(&self, id: &str) -> Result<PasswordResponse, RemoteError>;

    async fn edit_password(
        &self,
        id: &str,
        request: &PasswordEditRequest,
    ) -> Result<PasswordResponse, RemoteError>;

    async fn delete_password(&self, id: &str) -> Result<(), RemoteError>;

    /// Search entries by name, optionally within one vault.
    ///
    /// Results do not include the encoded secret.
    async fn search_passwords(
        &self,
        request: &PasswordSearchRequest,
    ) -> Result<PasswordSearchResponse, RemoteError>;
}
