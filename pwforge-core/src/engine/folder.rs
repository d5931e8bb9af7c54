//! Folder lifecycle.

use async_trait::async_trait;
use tracing::warn;

use super::{Engine, Resource, Written};
use crate::convert::{self, ConvertError};
use crate::error::ReconcileError;
use crate::model::{FolderId, FolderModel, ResourceKind};
use crate::remote::{RemoteClient, RemoteError};
use crate::wire::{Envelope, FolderAddRequest, FolderData, FolderEditRequest};

/// Engine for folders.
pub type FolderEngine = Engine<FolderResource>;

/// Folder-specific lifecycle hooks. Only the name can be edited.
#[derive(Debug, Clone, Default)]
pub struct FolderResource;

#[async_trait]
impl Resource for FolderResource {
    type Id = FolderId;
    type Model = FolderModel;
    type Data = FolderData;
    type CreateRequest = FolderAddRequest;
    type UpdateRequest = FolderEditRequest;

    const KIND: ResourceKind = ResourceKind::Folder;

    fn validate(&self, desired: &FolderModel) -> Result<(), ReconcileError> {
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
        if desired.id.is_some() && desired.id == desired.parent_id {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "a folder cannot be its own parent".to_string(),
            });
        }
        Ok(())
    }

    fn create_request(&self, desired: &FolderModel) -> Result<FolderAddRequest, ReconcileError> {
        Ok(convert::folder::to_create_request(desired))
    }

    fn update_request(&self, desired: &FolderModel) -> FolderEditRequest {
        convert::folder::to_update_request(desired)
    }

    async fn add(
        &self,
        client: &dyn RemoteClient,
        request: &FolderAddRequest,
    ) -> Result<Written<FolderData>, RemoteError> {
        client.add_folder(request).await.map(Written::Full)
    }

    async fn get(
        &self,
        client: &dyn RemoteClient,
        id: &str,
    ) -> Result<Envelope<FolderData>, RemoteError> {
        client.get_folder(id).await
    }

    async fn edit(
        &self,
        client: &dyn RemoteClient,
        id: &str,
        request: &FolderEditRequest,
    ) -> Result<Written<FolderData>, RemoteError> {
        client.edit_folder(id, request).await.map(Written::Full)
    }

    async fn remove(&self, client: &dyn RemoteClient, id: &str) -> Result<(), RemoteError> {
        client.delete_folder(id).await
    }

    fn normalize(&self, data: FolderData) -> Result<FolderModel, ConvertError> {
        Ok(convert::folder::from_response(data))
    }

    fn check_drift(&self, desired: &FolderModel, live: &FolderModel) {
        if desired.vault_id != live.vault_id {
            warn!(
                "folder {} cannot move from vault {} to {}",
                live.name, live.vault_id, desired.vault_id
            );
        }
        if desired.parent_id != live.parent_id {
            warn!(
                "folder {} parent cannot change after creation; keeping {:?}",
                live.name,
                live.parent_id.as_ref().map(FolderId::as_str)
            );
        }
    }
}
