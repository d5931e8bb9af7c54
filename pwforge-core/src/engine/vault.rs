//! Vault lifecycle.

use async_trait::async_trait;
use tracing::{debug, warn};

use super::{Engine, Resource, Written};
use crate::codec::{self, GENERATED_SECRET_LENGTH};
use crate::convert::{self, ConvertError, VaultKeys};
use crate::error::ReconcileError;
use crate::model::{ResourceKind, VaultId, VaultModel};
use crate::remote::{RemoteClient, RemoteError};
use crate::secret::Secret;
use crate::wire::{Envelope, VaultAddRequest, VaultData, VaultEditRequest};

/// Engine for vaults.
pub type VaultEngine = Engine<VaultResource>;

/// Vault-specific lifecycle hooks.
///
/// Creation generates a master password when none is declared, plus the
/// throwaway salt and hash the API insists on. The generated master password
/// ends up in the returned state and is never generated again.
#[derive(Debug, Clone, Default)]
pub struct VaultResource;

fn generate(kind: ResourceKind) -> Result<Secret, ReconcileError> {
    codec::generate_random(GENERATED_SECRET_LENGTH)
        .map_err(|source| ReconcileError::Generate { kind, source })
}

#[async_trait]
impl Resource for VaultResource {
    type Id = VaultId;
    type Model = VaultModel;
    type Data = VaultData;
    type CreateRequest = VaultAddRequest;
    type UpdateRequest = VaultEditRequest;

    const KIND: ResourceKind = ResourceKind::Vault;

    fn validate(&self, desired: &VaultModel) -> Result<(), ReconcileError> {
        if desired.name.is_empty() {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "name must not be empty".to_string(),
            });
        }
        if desired
            .master_password
            .as_ref()
            .is_some_and(|p| p.expose().is_empty())
        {
            return Err(ReconcileError::Validation {
                kind: Self::KIND,
                message: "master_password must not be empty".to_string(),
            });
        }
        Ok(())
    }

    fn prepare(&self, mut desired: VaultModel) -> Result<VaultModel, ReconcileError> {
        if desired.master_password.is_none() {
            debug!("no master password declared, generating one");
            desired.master_password = Some(generate(Self::KIND)?);
        }
        Ok(desired)
    }

    fn create_request(&self, desired: &VaultModel) -> Result<VaultAddRequest, ReconcileError> {
        let keys = VaultKeys {
            salt: generate(Self::KIND)?,
            password_hash: generate(Self::KIND)?,
        };
        convert::vault::to_create_request(desired, &keys)
            .map_err(|e| ReconcileError::convert(Self::KIND, e))
    }

    fn update_request(&self, desired: &VaultModel) -> VaultEditRequest {
        convert::vault::to_update_request(desired)
    }

    async fn add(
        &self,
        client: &dyn RemoteClient,
        request: &VaultAddRequest,
    ) -> Result<Written<VaultData>, RemoteError> {
        client.add_vault(request).await.map(Written::Partial)
    }

    async fn get(
        &self,
        client: &dyn RemoteClient,
        id: &str,
    ) -> Result<Envelope<VaultData>, RemoteError> {
        client.get_vault(id).await
    }

    async fn edit(
        &self,
        client: &dyn RemoteClient,
        id: &str,
        request: &VaultEditRequest,
    ) -> Result<Written<VaultData>, RemoteError> {
        client.edit_vault(id, request).await.map(Written::Partial)
    }

    async fn remove(&self, client: &dyn RemoteClient, id: &str) -> Result<(), RemoteError> {
        client.delete_vault(id).await
    }

    fn normalize(&self, data: VaultData) -> Result<VaultModel, ConvertError> {
        convert::vault::from_response(data)
    }

    fn check_drift(&self, desired: &VaultModel, live: &VaultModel) {
        if desired.is_private.is_some() && desired.is_private != live.is_private {
            warn!(
                "vault {} is_private cannot change after creation; keeping {:?}",
                live.name, live.is_private
            );
        }
        if desired.master_password.is_some() && desired.master_password != live.master_password {
            warn!(
                "vault {} master password cannot change after creation; keeping the stored one",
                live.name
            );
        }
    }
}
