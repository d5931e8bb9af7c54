//! Vault conversions.

use super::{non_empty, ConvertError};
use crate::codec;
use crate::model::{VaultId, VaultModel};
use crate::secret::Secret;
use crate::wire::{VaultAddRequest, VaultData, VaultEditRequest};

/// Set-and-forget key material the API requires when creating a vault.
///
/// It is never returned by the service and never tracked in state.
#[derive(Debug, Clone)]
pub struct VaultKeys {
    pub salt: Secret,
    pub password_hash: Secret,
}

/// Build the creation payload.
///
/// The master password must already be present on the model; this function
/// only encodes it. An unset private flag creates a private vault.
pub fn to_create_request(
    model: &VaultModel,
    keys: &VaultKeys,
) -> Result<VaultAddRequest, ConvertError> {
    let master_password = model
        .master_password
        .as_ref()
        .ok_or(ConvertError::Missing {
            field: "master_password",
        })?;

    Ok(VaultAddRequest {
        name: model.name.clone(),
        is_private: model.is_private.unwrap_or(true),
        password_hash: codec::encode(keys.password_hash.expose()),
        salt: keys.salt.expose().to_string(),
        mp_crypted: codec::encode(master_password.expose()),
    })
}

/// Build the edit payload. Only the name can change.
pub fn to_update_request(model: &VaultModel) -> VaultEditRequest {
    VaultEditRequest {
        name: model.name.clone(),
    }
}

/// Normalize a vault payload.
///
/// The master password is mandatory in the payload and must decode.
pub fn from_response(data: VaultData) -> Result<VaultModel, ConvertError> {
    let wire = data.vault_password_crypted.ok_or(ConvertError::Missing {
        field: "vault_password_crypted",
    })?;
    let master_password = codec::decode(&wire).map_err(|source| ConvertError::Decode {
        field: "master_password",
        source,
    })?;

    Ok(VaultModel {
        id: Some(VaultId::new(data.id)),
        name: data.name,
        is_private: Some(!data.visible),
        access: non_empty(data.access),
        scope: non_empty(data.scope),
        master_password: Some(master_password),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> VaultKeys {
        VaultKeys {
            salt: Secret::new("saltsaltsalt"),
            password_hash: Secret::new("hashhashhash"),
        }
    }

    /// What the service stores for a creation request.
    fn echo(id: &str, request: &VaultAddRequest) -> VaultData {
        VaultData {
            id: id.to_string(),
            name: request.name.clone(),
            access: Some(String::new()),
            scope: Some(String::new()),
            visible: !request.is_private,
            vault_password_crypted: Some(request.mp_crypted.clone()),
        }
    }

    #[test]
    fn test_create_request_requires_master_password() {
        let result = to_create_request(&VaultModel::new("ops"), &keys());
        assert!(matches!(
            result,
            Err(ConvertError::Missing { field: "master_password" })
        ));
    }

    #[test]
    fn test_create_request_defaults_to_private() {
        let model = VaultModel::new("ops").with_master_password("mp");
        let request = to_create_request(&model, &keys()).unwrap();
        assert!(request.is_private);
        assert_eq!(request.mp_crypted, codec::encode("mp"));
        assert_eq!(request.salt, "saltsaltsalt");
        assert_eq!(request.password_hash, codec::encode("hashhashhash"));
    }

    #[test]
    fn test_roundtrip_through_echo() {
        let model = VaultModel::new("shared")
            .private(false)
            .with_master_password("correct horse");
        let request = to_create_request(&model, &keys()).unwrap();
        let live = from_response(echo("v1", &request)).unwrap();

        assert_eq!(live.id, Some(VaultId::new("v1")));
        assert_eq!(live.name, "shared");
        assert_eq!(live.is_private, Some(false));
        assert_eq!(live.master_password, model.master_password);
        assert_eq!(live.access, None);
        assert_eq!(live.scope, None);
    }

    #[test]
    fn test_update_request_only_name() {
        let model = VaultModel::new("renamed").private(false).with_master_password("x");
        let body = serde_json::to_value(to_update_request(&model)).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "renamed" }));
    }

    #[test]
    fn test_from_response_rejects_bad_master_password() {
        let data = VaultData {
            id: "v1".to_string(),
            name: "ops".to_string(),
            access: None,
            scope: None,
            visible: false,
            vault_password_crypted: Some("***".to_string()),
        };
        assert!(matches!(
            from_response(data),
            Err(ConvertError::Decode { field: "master_password", .. })
        ));
    }

    #[test]
    fn test_from_response_requires_master_password() {
        let data = VaultData {
            id: "v1".to_string(),
            name: "ops".to_string(),
            access: Some("admin".to_string()),
            scope: Some("domain".to_string()),
            visible: true,
            vault_password_crypted: None,
        };
        assert!(matches!(from_response(data), Err(ConvertError::Missing { .. })));
    }
}
