//! In-memory remote service implementation.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use super::{RemoteClient, RemoteError};
use crate::wire::{
    Envelope, FolderAddRequest, FolderData, FolderEditRequest, FolderResponse,
    PasswordAddRequest, PasswordData, PasswordEditRequest, PasswordResponse,
    PasswordSearchRequest, PasswordSearchResponse, VaultAddRequest, VaultData,
    VaultEditRequest, VaultOperationResponse, VaultResponse,
};

/// A call received by a [`MemoryRemote`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Operation name, e.g. `"add_folder"`.
    pub operation: &'static str,

    /// Target ID for calls addressed to an existing entity.
    pub id: Option<String>,

    /// Request body as it would be sent on the wire.
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct State {
    vaults: BTreeMap<String, VaultData>,
    folders: BTreeMap<String, FolderData>,
    passwords: BTreeMap<String, PasswordData>,
    calls: Vec<RecordedCall>,
    failing: HashSet<&'static str>,
    missing: HashSet<&'static str>,
}

/// In-memory simulation of the remote service for testing and development.
///
/// The simulation reproduces the response shapes of the real service: unset
/// text fields come back as empty strings, an unset color as `0`, and vault
/// writes answer with the bare vault ID. Missing entities are reported with a
/// non-success envelope on reads and [`RemoteError::NotFound`] on deletes.
///
/// Every call is recorded with its JSON body so tests can assert on exactly
/// what would have been sent.
///
/// # Thread Safety
///
/// All state sits behind a single mutex; the store is safe to share across
/// tasks via `Arc`.
pub struct MemoryRemote {
    state: Mutex<State>,
}

impl MemoryRemote {
    /// Create an empty remote.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
        }
    }

    /// Make every subsequent call of `operation` fail with an HTTP 500.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().failing.insert(operation);
    }

    /// Make every subsequent call of `operation` answer
    /// [`RemoteError::NotFound`], as if the entity vanished.
    pub fn missing_on(&self, operation: &'static str) {
        self.state.lock().missing.insert(operation);
    }

    /// Remove all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.failing.clear();
        state.missing.clear();
    }

    /// All calls received so far, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Calls of a single operation, oldest first.
    pub fn calls_for(&self, operation: &str) -> Vec<RecordedCall> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .cloned()
            .collect()
    }

    /// Body of the most recent call of `operation`.
    pub fn last_body(&self, operation: &str) -> Option<serde_json::Value> {
        self.calls_for(operation).pop().and_then(|c| c.body)
    }

    /// Store a vault directly, bypassing the API.
    pub fn insert_vault(&self, vault: VaultData) {
        self.state.lock().vaults.insert(vault.id.clone(), vault);
    }

    /// Store a folder directly, bypassing the API.
    pub fn insert_folder(&self, folder: FolderData) {
        self.state.lock().folders.insert(folder.id.clone(), folder);
    }

    /// Store a password entry directly, bypassing the API.
    pub fn insert_password(&self, password: PasswordData) {
        self.state
            .lock()
            .passwords
            .insert(password.id.clone(), password);
    }

    pub fn vault(&self, id: &str) -> Option<VaultData> {
        self.state.lock().vaults.get(id).cloned()
    }

    pub fn folder(&self, id: &str) -> Option<FolderData> {
        self.state.lock().folders.get(id).cloned()
    }

    pub fn password(&self, id: &str) -> Option<PasswordData> {
        self.state.lock().passwords.get(id).cloned()
    }

    /// Record a call and apply injected failures.
    fn enter<B: Serialize>(
        state: &mut State,
        operation: &'static str,
        id: Option<&str>,
        body: Option<&B>,
    ) -> Result<(), RemoteError> {
        state.calls.push(RecordedCall {
            operation,
            id: id.map(str::to_string),
            body: body.and_then(|b| serde_json::to_value(b).ok()),
        });

        if state.failing.contains(operation) {
            return Err(RemoteError::Http {
                status: 500,
                message: format!("injected failure for {}", operation),
            });
        }
        if state.missing.contains(operation) {
            return Err(RemoteError::NotFound);
        }
        Ok(())
    }
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryRemote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryRemote")
            .field("vaults", &state.vaults.len())
            .field("folders", &state.folders.len())
            .field("passwords", &state.passwords.len())
            .field("calls", &state.calls.len())
            .finish()
    }
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Replace an omitted value with the service's empty sentinel.
fn or_empty(value: &Option<String>) -> Option<String> {
    Some(value.clone().unwrap_or_default())
}

/// Apply an edit: omitted fields keep their value, present ones overwrite.
fn merge<T: Clone>(current: &mut Option<T>, update: &Option<T>) {
    if let Some(value) = update {
        *current = Some(value.clone());
    }
}

#[async_trait]
impl RemoteClient for MemoryRemote {
    async fn add_vault(
        &self,
        request: &VaultAddRequest,
    ) -> Result<VaultOperationResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "add_vault", None, Some(request))?;

        let id = new_id();
        state.vaults.insert(
            id.clone(),
            VaultData {
                id: id.clone(),
                name: request.name.clone(),
                access: Some("admin".to_string()),
                scope: Some("domain".to_string()),
                visible: !request.is_private,
                vault_password_crypted: Some(request.mp_crypted.clone()),
            },
        );
        Ok(Envelope::success(id))
    }

    async fn get_vault(&self, id: &str) -> Result<VaultResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "get_vault", Some(id), None)?;

        Ok(match state.vaults.get(id) {
            Some(vault) => Envelope::success(vault.clone()),
            None => Envelope::failure("vaultNotFound"),
        })
    }

    async fn edit_vault(
        &self,
        id: &str,
        request: &VaultEditRequest,
    ) -> Result<VaultOperationResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "edit_vault", Some(id), Some(request))?;

        Ok(match state.vaults.get_mut(id) {
            Some(vault) => {
                vault.name = request.name.clone();
                Envelope::success(id.to_string())
            }
            None => Envelope::failure("vaultNotFound"),
        })
    }

    async fn delete_vault(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "delete_vault", Some(id), None)?;

        if state.vaults.remove(id).is_none() {
            return Err(RemoteError::NotFound);
        }
        state.folders.retain(|_, f| f.vault_id != id);
        state.passwords.retain(|_, p| p.vault_id != id);
        Ok(())
    }

    async fn add_folder(&self, request: &FolderAddRequest) -> Result<FolderResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "add_folder", None, Some(request))?;

        if !state.vaults.contains_key(&request.vault_id) {
            return Ok(Envelope::failure("vaultNotFound"));
        }
        let parent = request.parent_id.clone().unwrap_or_default();
        if !parent.is_empty() && !state.folders.contains_key(&parent) {
            return Ok(Envelope::failure("parentFolderNotFound"));
        }

        let folder = FolderData {
            id: new_id(),
            name: request.name.clone(),
            vault_id: request.vault_id.clone(),
            parent_id: Some(parent),
        };
        state.folders.insert(folder.id.clone(), folder.clone());
        Ok(Envelope::success(folder))
    }

    async fn get_folder(&self, id: &str) -> Result<FolderResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "get_folder", Some(id), None)?;

        Ok(match state.folders.get(id) {
            Some(folder) => Envelope::success(folder.clone()),
            None => Envelope::failure("folderNotFound"),
        })
    }

    async fn edit_folder(
        &self,
        id: &str,
        request: &FolderEditRequest,
    ) -> Result<FolderResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "edit_folder", Some(id), Some(request))?;

        Ok(match state.folders.get_mut(id) {
            Some(folder) => {
                folder.name = request.name.clone();
                Envelope::success(folder.clone())
            }
            None => Envelope::failure("folderNotFound"),
        })
    }

    async fn delete_folder(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "delete_folder", Some(id), None)?;

        if state.folders.remove(id).is_none() {
            return Err(RemoteError::NotFound);
        }
        state
            .passwords
            .retain(|_, p| p.folder_id.as_deref() != Some(id));
        Ok(())
    }

    async fn add_password(
        &self,
        request: &PasswordAddRequest,
    ) -> Result<PasswordResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "add_password", None, Some(request))?;

        if !state.vaults.contains_key(&request.vault_id) {
            return Ok(Envelope::failure("vaultNotFound"));
        }
        if let Some(folder_id) = request.folder_id.as_deref().filter(|f| !f.is_empty()) {
            if !state.folders.contains_key(folder_id) {
                return Ok(Envelope::failure("folderNotFound"));
            }
        }

        let password = PasswordData {
            id: new_id(),
            name: request.name.clone(),
            vault_id: request.vault_id.clone(),
            folder_id: or_empty(&request.folder_id),
            login: or_empty(&request.login),
            crypted_password: or_empty(&request.crypted_password),
            description: or_empty(&request.description),
            url: or_empty(&request.url),
            color: Some(request.color.unwrap_or(0)),
            tags: Some(request.tags.clone().unwrap_or_default()),
            access: Some("write".to_string()),
            access_code: Some(2),
        };
        state.passwords.insert(password.id.clone(), password.clone());
        Ok(Envelope::success(password))
    }

    async fn get_password(&self, id: &str) -> Result<PasswordResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "get_password", Some(id), None)?;

        Ok(match state.passwords.get(id) {
            Some(password) => Envelope::success(password.clone()),
            None => Envelope::failure("passwordNotFound"),
        })
    }

    async fn edit_password(
        &self,
        id: &str,
        request: &PasswordEditRequest,
    ) -> Result<PasswordResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "edit_password", Some(id), Some(request))?;

        Ok(match state.passwords.get_mut(id) {
            Some(password) => {
                password.name = request.name.clone();
                merge(&mut password.folder_id, &request.folder_id);
                merge(&mut password.login, &request.login);
                merge(&mut password.crypted_password, &request.crypted_password);
                merge(&mut password.description, &request.description);
                merge(&mut password.url, &request.url);
                merge(&mut password.color, &request.color);
                merge(&mut password.tags, &request.tags);
                Envelope::success(password.clone())
            }
            None => Envelope::failure("passwordNotFound"),
        })
    }

    async fn delete_password(&self, id: &str) -> Result<(), RemoteError> {
        let mut state = self.state.lock();
        Self::enter::<()>(&mut state, "delete_password", Some(id), None)?;

        match state.passwords.remove(id) {
            Some(_) => Ok(()),
            None => Err(RemoteError::NotFound),
        }
    }

    async fn search_passwords(
        &self,
        request: &PasswordSearchRequest,
    ) -> Result<PasswordSearchResponse, RemoteError> {
        let mut state = self.state.lock();
        Self::enter(&mut state, "search_passwords", None, Some(request))?;

        let query = request.query.to_lowercase();
        let mut hits: Vec<PasswordData> = state
            .passwords
            .values()
            .filter(|p| p.name.to_lowercase().contains(&query))
            .filter(|p| {
                request
                    .vault_id
                    .as_deref()
                    .is_none_or(|vault| p.vault_id == vault)
            })
            .map(|p| PasswordData {
                crypted_password: None,
                ..p.clone()
            })
            .collect();
        hits.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        Ok(Envelope::success(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_vault_request(name: &str) -> VaultAddRequest {
        VaultAddRequest {
            name: name.to_string(),
            is_private: true,
            password_hash: "aGFzaA==".to_string(),
            salt: "salt".to_string(),
            mp_crypted: "bXA=".to_string(),
        }
    }

    #[tokio::test]
    async fn test_vault_writes_return_bare_id() {
        let remote = MemoryRemote::new();
        let id = remote
            .add_vault(&add_vault_request("ops"))
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let vault = remote.vault(&id).unwrap();
        assert_eq!(vault.name, "ops");
        assert!(!vault.visible);

        let edited = remote
            .edit_vault(&id, &VaultEditRequest { name: "ops2".to_string() })
            .await
            .unwrap();
        assert_eq!(edited.data.as_deref(), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_missing_entities() {
        let remote = MemoryRemote::new();
        let response = remote.get_folder("nope").await.unwrap();
        assert!(!response.is_success());

        let result = remote.delete_password("nope").await;
        assert!(matches!(result, Err(RemoteError::NotFound)));
    }

    #[tokio::test]
    async fn test_folder_sentinels() {
        let remote = MemoryRemote::new();
        let vault_id = remote
            .add_vault(&add_vault_request("ops"))
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let folder = remote
            .add_folder(&FolderAddRequest {
                name: "root".to_string(),
                vault_id,
                parent_id: None,
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(folder.parent_id.as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_injected_failures_and_recording() {
        let remote = MemoryRemote::new();
        remote.fail_on("get_vault");

        let result = remote.get_vault("v1").await;
        assert!(matches!(result, Err(RemoteError::Http { status: 500, .. })));

        remote.clear_failures();
        assert!(remote.get_vault("v1").await.is_ok());

        let calls = remote.calls_for("get_vault");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id.as_deref(), Some("v1"));
        assert_eq!(calls[0].body, None);
    }

    #[tokio::test]
    async fn test_edit_password_keeps_omitted_fields() {
        let remote = MemoryRemote::new();
        let vault_id = remote
            .add_vault(&add_vault_request("ops"))
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let created = remote
            .add_password(&PasswordAddRequest {
                name: "db".to_string(),
                vault_id,
                folder_id: None,
                login: Some("admin".to_string()),
                crypted_password: None,
                description: Some("primary".to_string()),
                url: None,
                color: None,
                tags: None,
            })
            .await
            .unwrap()
            .into_result()
            .unwrap();

        let edited = remote
            .edit_password(
                &created.id,
                &PasswordEditRequest {
                    name: "db".to_string(),
                    folder_id: None,
                    login: None,
                    crypted_password: None,
                    description: Some(String::new()),
                    url: None,
                    color: None,
                    tags: None,
                },
            )
            .await
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(edited.login.as_deref(), Some("admin"));
        assert_eq!(edited.description.as_deref(), Some(""));
    }
}
