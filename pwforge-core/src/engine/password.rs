//! Password entry lifecycle.

use async_trait::async_trait;
use tracing::warn;

use super::{Engine, Resource, Written};
use crate::convert::{self, ConvertError};
use crate::error::ReconcileError;
use crate::model::{PasswordId, PasswordModel, ResourceKind};
use crate::remote::{RemoteClient, RemoteError};
use crate::wire::{Envelope, PasswordAddRequest, PasswordData, PasswordEditRequest};

/// Engine for password entries.
pub type PasswordEngine = Engine<PasswordResource>;

/// Password-specific lifecycle hooks.
///
/// Every attribute except the owning vault can be edited. Undeclared
/// attributes are left out of writes so the remote values are untouched.
#[derive(Debug, Clone, Default)]
pub struct PasswordResource;

#[async_trait]
impl Resource for PasswordResource {
    type Id = PasswordId;
    type Model = PasswordModel;
    type Data = PasswordData;
    type CreateRequest = PasswordAddRequest;
    type UpdateRequest = PasswordEditRequest;

    const KIND: ResourceKind = ResourceKind::Password;

    fn validate(&self, desired: &PasswordModel) -> Result<(), ReconcileError> {
        if desired.name.is_empty() {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "name must not be empty".to_string(),
            });
        }
        if desired.vault_id.as_str().is_empty() {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "vault_id must not be empty".to_string(),
            });
        }
        // The service stores an empty secret as "no secret".
        if desired.password.as_ref().is_some_and(|p| p.expose().is_empty()) {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "password must not be empty; leave it unset instead".to_string(),
            });
        }
        Ok(())
    }

    fn create_request(&self, desired: &PasswordModel) -> Result<PasswordAddRequest, ReconcileError> {
        Ok(convert::password::to_create_request(desired))
    }

    fn update_request(&self, desired: &PasswordModel) -> PasswordEditRequest {
        convert::password::to_update_request(desired)
    }

    async fn add(
        &self,
        client: &dyn RemoteClient,
        request: &PasswordAddRequest,
    ) -> Result<Written<PasswordData>, RemoteError> {
        client.add_password(request).await.map(Written::Full)
    }

    async fn get(
        &self,
        client: &dyn RemoteClient,
        id: &str,
    ) -> Result<Envelope<PasswordData>, RemoteError> {
        client.get_password(id).await
    }

    async fn edit(
        &self,
        client: &dyn RemoteClient,
        id: &str,
        request: &PasswordEditRequest,
    ) -> Result<Written<PasswordData>, RemoteError> {
        client.edit_password(id, request).await.map(Written::Full)
    }

    async fn remove(&self, client: &dyn RemoteClient, id: &str) -> Result<(), RemoteError> {
        client.delete_password(id).await
    }

    fn normalize(&self, data: PasswordData) -> Result<PasswordModel, ConvertError> {
        convert::password::from_response(data)
    }

    fn check_drift(&self, desired: &PasswordModel, live: &PasswordModel) {
        if desired.vault_id != live.vault_id {
            warn!(
                "password {} cannot move from vault {} to {}",
                live.name, live.vault_id, desired.vault_id
            );
        }
    }
}
