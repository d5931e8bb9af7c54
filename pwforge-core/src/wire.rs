//! Request and response payloads of the Passwork v4 API.
//!
//! These structs mirror the JSON bodies exchanged with the remote service.
//! They keep its quirks on purpose: absent parents and folders come back as
//! empty strings, "no color" is `0`, and vault writes answer with a bare
//! identifier. Normalization into the canonical model happens in
//! [`crate::convert`], never here.

use serde::{Deserialize, Serialize};

use crate::remote::RemoteError;

/// Status value the remote service uses for successful calls.
pub const STATUS_SUCCESS: &str = "success";

/// Envelope wrapping every response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// `"success"` or an error status.
    pub status: String,

    /// Error code reported with a non-success status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Payload of a successful call. A missing key reads as `None`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Wrap a payload in a successful envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            code: None,
            data: Some(data),
        }
    }

    /// Build a non-success envelope with an error code.
    pub fn failure(code: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: Some(code.into()),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Take the payload of a successful envelope.
    ///
    /// A non-success status becomes [`RemoteError::Rejected`]; a successful
    /// envelope without a payload is [`RemoteError::Malformed`].
    pub fn into_result(self) -> Result<T, RemoteError> {
        if !self.is_success() {
            return Err(RemoteError::Rejected {
                status: self.status,
                code: self.code,
            });
        }
        self.data.ok_or_else(|| RemoteError::Malformed {
            message: "successful response carried no data".to_string(),
        })
    }
}

/// Body of `POST /vaults`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultAddRequest {
    pub name: String,
    pub is_private: bool,
    /// Base64 of a throwaway hash; required by the API, never read back.
    pub password_hash: String,
    /// Throwaway salt; required by the API, never read back.
    pub salt: String,
    /// Base64 of the master password.
    pub mp_crypted: String,
}

/// Body of `PUT /vaults/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEditRequest {
    pub name: String,
}

/// Vault as returned by `GET /vaults/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    /// Shared vaults are visible; private ones are not.
    #[serde(default)]
    pub visible: bool,
    #[serde(default)]
    pub vault_password_crypted: Option<String>,
}

/// Response of `GET /vaults/{id}`.
pub type VaultResponse = Envelope<VaultData>;

/// Response of vault writes, which only carry the vault identifier.
pub type VaultOperationResponse = Envelope<String>;

/// Body of `POST /folders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderAddRequest {
    pub name: String,
    pub vault_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

/// Body of `PUT /folders/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEditRequest {
    pub name: String,
}

/// Folder as returned by the folder endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderData {
    pub id: String,
    pub name: String,
    pub vault_id: String,
    /// Empty string for top-level folders.
    #[serde(default)]
    pub parent_id: Option<String>,
}

/// Response of the folder endpoints.
pub type FolderResponse = Envelope<FolderData>;

/// Body of `POST /passwords`.
///
/// Undeclared attributes are omitted from the body rather than sent empty:
/// the API treats an empty value as "clear this field".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordAddRequest {
    pub name: String,
    pub vault_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Body of `PUT /passwords/{id}`. Same as creation minus the owning vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordEditRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypted_password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Password entry as returned by the password endpoints.
///
/// Search results leave out `crypted_password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordData {
    pub id: String,
    pub name: String,
    pub vault_id: String,
    #[serde(default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub crypted_password: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub color: Option<u32>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub access_code: Option<i64>,
}

/// Response of the single-entry password endpoints.
pub type PasswordResponse = Envelope<PasswordData>;

/// Body of `POST /passwords/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSearchRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<String>,
}

/// Response of `POST /passwords/search`.
pub type PasswordSearchResponse = Envelope<Vec<PasswordData>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_into_result() {
        let ok: Envelope<String> = Envelope::success("v1".to_string());
        assert_eq!(ok.into_result().unwrap(), "v1");

        let failed: Envelope<String> = Envelope::failure("notFound");
        assert!(matches!(
            failed.into_result(),
            Err(RemoteError::Rejected { code: Some(code), .. }) if code == "notFound"
        ));

        let empty: Envelope<String> = Envelope {
            status: STATUS_SUCCESS.to_string(),
            code: None,
            data: None,
        };
        assert!(matches!(empty.into_result(), Err(RemoteError::Malformed { .. })));
    }

    #[test]
    fn test_error_envelope_without_data() {
        let envelope: Envelope<VaultData> = serde_json::from_value(json!({
            "status": "error",
            "code": "vaultNotFound"
        }))
        .unwrap();
        assert!(!envelope.is_success());
        assert_eq!(envelope.code.as_deref(), Some("vaultNotFound"));
        assert!(envelope.data.is_none());

        let empty: Envelope<FolderData> =
            serde_json::from_value(json!({ "status": "success" })).unwrap();
        assert!(matches!(empty.into_result(), Err(RemoteError::Malformed { .. })));
    }

    #[test]
    fn test_folder_request_omits_absent_parent() {
        let request = FolderAddRequest {
            name: "project-x".to_string(),
            vault_id: "v1".to_string(),
            parent_id: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({ "name": "project-x", "vaultId": "v1" }));
    }

    #[test]
    fn test_password_data_tolerates_missing_fields() {
        let data: PasswordData = serde_json::from_value(json!({
            "id": "p1",
            "name": "db",
            "vaultId": "v1",
            "color": 0,
            "tags": []
        }))
        .unwrap();
        assert_eq!(data.crypted_password, None);
        assert_eq!(data.color, Some(0));
    }

    #[test]
    fn test_vault_data_camel_case() {
        let data: VaultData = serde_json::from_value(json!({
            "id": "v1",
            "name": "ops",
            "access": "admin",
            "scope": "domain",
            "visible": false,
            "vaultPasswordCrypted": "c2VjcmV0"
        }))
        .unwrap();
        assert_eq!(data.vault_password_crypted.as_deref(), Some("c2VjcmV0"));
        assert!(!data.visible);
    }
}
