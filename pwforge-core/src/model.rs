//! Canonical declarative model for managed resources.
//!
//! This module defines the types the reconciliation engines accept and return:
//! - [`VaultId`], [`FolderId`], [`PasswordId`] - identifiers assigned by the remote service
//! - [`VaultModel`] - a top-level container of folders and entries
//! - [`FolderModel`] - an organizational node inside a vault
//! - [`PasswordModel`] - a password entry
//!
//! Every optional attribute is an `Option`. `None` means "not declared" (or
//! "unset" on the remote side); `Some("")` is an explicitly empty value. The
//! remote service conflates the two, so only the converters ever look at its
//! sentinels.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::secret::Secret;

/// Identifier of a vault, assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultId(String);

impl VaultId {
    /// Create a new vault ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the vault ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VaultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for VaultId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VaultId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for VaultId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier of a folder, assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(String);

impl FolderId {
    /// Create a new folder ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the folder ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for FolderId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FolderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FolderId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Identifier of a password entry, assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordId(String);

impl PasswordId {
    /// Create a new password entry ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the password entry ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PasswordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PasswordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PasswordId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for PasswordId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Kind of managed resource, used for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Vault,
    Folder,
    Password,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vault => "vault",
            Self::Folder => "folder",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A vault: the top-level container for folders and password entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultModel {
    /// Remote identifier; `None` until created.
    pub id: Option<VaultId>,

    /// Display name.
    pub name: String,

    /// Whether only the creating user can see the vault. Treated as `true`
    /// when unset at creation.
    pub is_private: Option<bool>,

    /// Access level of the current user (remote-computed).
    pub access: Option<String>,

    /// Vault scope (remote-computed).
    pub scope: Option<String>,

    /// Master password. Generated at creation when not declared.
    pub master_password: Option<Secret>,
}

impl VaultModel {
    /// Create a desired vault with only a name declared.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            is_private: None,
            access: None,
            scope: None,
            master_password: None,
        }
    }

    /// Declare the private flag.
    pub fn private(mut self, is_private: bool) -> Self {
        self.is_private = Some(is_private);
        self
    }

    /// Declare the master password.
    pub fn with_master_password(mut self, password: impl Into<Secret>) -> Self {
        self.master_password = Some(password.into());
        self
    }
}

/// A folder inside a vault, optionally nested under another folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderModel {
    /// Remote identifier; `None` until created.
    pub id: Option<FolderId>,

    /// Display name.
    pub name: String,

    /// Owning vault. Immutable after creation.
    pub vault_id: VaultId,

    /// Parent folder; `None` for a top-level folder.
    pub parent_id: Option<FolderId>,
}

impl FolderModel {
    /// Create a desired top-level folder.
    pub fn new(name: impl Into<String>, vault_id: impl Into<VaultId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            vault_id: vault_id.into(),
            parent_id: None,
        }
    }

    /// Nest the folder under a parent folder.
    pub fn with_parent(mut self, parent_id: impl Into<FolderId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// A password entry owned by a vault and optionally a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordModel {
    /// Remote identifier; `None` until created.
    pub id: Option<PasswordId>,

    /// Display name.
    pub name: String,

    /// Owning vault. Immutable after creation.
    pub vault_id: VaultId,

    /// Containing folder; `None` when stored at the vault root.
    pub folder_id: Option<FolderId>,

    pub login: Option<String>,

    pub url: Option<String>,

    pub description: Option<String>,

    /// Color tag. The remote service uses 0 for "no color".
    pub color: Option<u32>,

    /// Tags in declaration order.
    pub tags: Option<Vec<String>>,

    /// The secret value. Absent on search results.
    pub password: Option<Secret>,

    /// Access level of the current user (remote-computed).
    pub access: Option<String>,

    /// Numeric access code (remote-computed).
    pub access_code: Option<i64>,
}

impl PasswordModel {
    /// Create a desired entry with only the required attributes declared.
    pub fn new(name: impl Into<String>, vault_id: impl Into<VaultId>) -> Self {
        Self {
            id: None,
            name: name.into(),
            vault_id: vault_id.into(),
            folder_id: None,
            login: None,
            url: None,
            description: None,
            color: None,
            tags: None,
            password: None,
            access: None,
            access_code: None,
        }
    }

    /// Place the entry in a folder.
    pub fn in_folder(mut self, folder_id: impl Into<FolderId>) -> Self {
        self.folder_id = Some(folder_id.into());
        self
    }

    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<Secret>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = Some(color);
        self
    }

    /// Declare tags, keeping their order.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_verbatim() {
        assert_eq!(VaultId::new("ABC").to_string(), "ABC");
        assert_eq!(FolderId::from("f-1").as_str(), "f-1");
        assert_eq!(PasswordId::from(String::from("p-1")).as_str(), "p-1");
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Vault.to_string(), "vault");
        assert_eq!(ResourceKind::Password.as_str(), "password");
    }

    #[test]
    fn test_password_builder_keeps_tag_order() {
        let model = PasswordModel::new("db", "v1").with_tags(["b", "a", "c"]);
        assert_eq!(model.tags.unwrap(), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_state_serialization_keeps_secret() {
        let vault = VaultModel::new("ops").with_master_password("s3cret");
        let json = serde_json::to_value(&vault).unwrap();
        assert_eq!(json["master_password"], "s3cret");
        assert_eq!(json["is_private"], serde_json::Value::Null);

        let back: VaultModel = serde_json::from_value(json).unwrap();
        assert_eq!(back, vault);
    }
}
