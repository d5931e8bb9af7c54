//! Read-only lookup of existing password entries.
//!
//! A lookup never writes. It resolves an entry either by identifier or by
//! searching for its name inside a vault, and returns the full entry
//! (secret included) with the same normalization as the password engine.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{PasswordEngine, Reconciler};
use crate::error::{ReconcileError, RemoteOperation, TransportError};
use crate::model::{PasswordId, PasswordModel, ResourceKind, VaultId};
use crate::remote::RemoteClient;
use crate::wire::{PasswordData, PasswordSearchRequest};

/// What to look up. `id` wins over `name` when both are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordQuery {
    pub id: Option<PasswordId>,
    pub name: Option<String>,
    pub vault_id: VaultId,
}

impl PasswordQuery {
    /// Look up an entry by identifier.
    pub fn by_id(id: impl Into<PasswordId>, vault_id: impl Into<VaultId>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
            vault_id: vault_id.into(),
        }
    }

    /// Look up an entry by name within a vault.
    pub fn by_name(name: impl Into<String>, vault_id: impl Into<VaultId>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            vault_id: vault_id.into(),
        }
    }
}

/// Resolves [`PasswordQuery`] values against the remote service.
pub struct PasswordLookup {
    client: Arc<dyn RemoteClient>,
    passwords: PasswordEngine,
}

impl PasswordLookup {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self {
            passwords: PasswordEngine::new(Arc::clone(&client)),
            client,
        }
    }

    /// Find a single entry.
    ///
    /// # Errors
    ///
    /// - [`ReconcileError::Validation`] when neither id nor name is given
    /// - [`ReconcileError::NotFound`] when nothing matches
    pub async fn find(&self, query: &PasswordQuery) -> Result<PasswordModel, ReconcileError> {
        let id = match (&query.id, &query.name) {
            (Some(id), _) if !id.as_str().is_empty() => id.clone(),
            (_, Some(name)) if !name.is_empty() => self.search(name, &query.vault_id).await?,
            _ => {
                return Err(ReconcileError::Validation {
                    kind: ResourceKind::Password,
                    message: "either id or name must be set".to_string(),
                });
            }
        };
        self.passwords.read(&id).await
    }

    /// Search by name and pick a hit: an exact name match if there is one,
    /// otherwise the first result.
    async fn search(&self, name: &str, vault_id: &VaultId) -> Result<PasswordId, ReconcileError> {
        let request = PasswordSearchRequest {
            query: name.to_string(),
            vault_id: Some(vault_id.as_str().to_string()),
        };
        let transport = |source| {
            TransportError::new(ResourceKind::Password, RemoteOperation::Search, None, source)
        };

        let hits = self
            .client
            .search_passwords(&request)
            .await
            .and_then(|envelope| envelope.into_result())
            .map_err(transport)?;
        debug!("search for '{}' in vault {} returned {} hits", name, vault_id, hits.len());

        pick(hits, name)
            .map(PasswordId::new)
            .ok_or_else(|| ReconcileError::NotFound {
                kind: ResourceKind::Password,
                id: name.to_string(),
            })
    }
}

impl std::fmt::Debug for PasswordLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordLookup").finish_non_exhaustive()
    }
}

fn pick(hits: Vec<PasswordData>, name: &str) -> Option<String> {
    let exact = hits.iter().position(|hit| hit.name == name);
    hits.into_iter().nth(exact.unwrap_or(0)).map(|hit| hit.id)
}
