//! Password entry conversions.

use super::{decode_optional, non_empty, ConvertError};
use crate::codec;
use crate::model::{FolderId, PasswordId, PasswordModel, VaultId};
use crate::wire::{PasswordAddRequest, PasswordData, PasswordEditRequest};

fn folder_id(model: &PasswordModel) -> Option<String> {
    model.folder_id.as_ref().map(|f| f.as_str().to_string())
}

fn crypted_password(model: &PasswordModel) -> Option<String> {
    model.password.as_ref().map(|p| codec::encode(p.expose()))
}

/// Build the creation payload.
///
/// Undeclared attributes stay `None` and are omitted from the body; a
/// declared empty string is sent as-is.
pub fn to_create_request(model: &PasswordModel) -> PasswordAddRequest {
    PasswordAddRequest {
        name: model.name.clone(),
        vault_id: model.vault_id.as_str().to_string(),
        folder_id: folder_id(model),
        login: model.login.clone(),
        crypted_password: crypted_password(model),
        description: model.description.clone(),
        url: model.url.clone(),
        color: model.color,
        tags: model.tags.clone(),
    }
}

/// Build the edit payload: every settable attribute except the vault.
pub fn to_update_request(model: &PasswordModel) -> PasswordEditRequest {
    PasswordEditRequest {
        name: model.name.clone(),
        folder_id: folder_id(model),
        login: model.login.clone(),
        crypted_password: crypted_password(model),
        description: model.description.clone(),
        url: model.url.clone(),
        color: model.color,
        tags: model.tags.clone(),
    }
}

/// Normalize a password payload.
///
/// Each text field maps `""` to `None` independently, color `0` and an empty
/// tag list become `None`, and a payload without a secret (search results)
/// yields `password: None`.
pub fn from_response(data: PasswordData) -> Result<PasswordModel, ConvertError> {
    let password = decode_optional("password", data.crypted_password)?;

    Ok(PasswordModel {
        id: Some(PasswordId::new(data.id)),
        name: data.name,
        vault_id: VaultId::new(data.vault_id),
        folder_id: non_empty(data.folder_id).map(FolderId::new),
        login: non_empty(data.login),
        url: non_empty(data.url),
        description: non_empty(data.description),
        color: data.color.filter(|c| *c != 0),
        tags: data.tags.filter(|t| !t.is_empty()),
        password,
        access: non_empty(data.access),
        access_code: data.access_code,
    })
}
