//! Folder conversions.

use super::non_empty;
use crate::model::{FolderId, FolderModel, VaultId};
use crate::wire::{FolderAddRequest, FolderData, FolderEditRequest};

/// Build the creation payload. An absent parent is left out of the body.
pub fn to_create_request(model: &FolderModel) -> FolderAddRequest {
    FolderAddRequest {
        name: model.name.clone(),
        vault_id: model.vault_id.as_str().to_string(),
        parent_id: model.parent_id.as_ref().map(|p| p.as_str().to_string()),
    }
}

/// Build the edit payload. The vault and parent are fixed once created.
pub fn to_update_request(model: &FolderModel) -> FolderEditRequest {
    FolderEditRequest {
        name: model.name.clone(),
    }
}

/// Normalize a folder payload; an empty parent means top-level.
pub fn from_response(data: FolderData) -> FolderModel {
    FolderModel {
        id: Some(FolderId::new(data.id)),
        name: data.name,
        vault_id: VaultId::new(data.vault_id),
        parent_id: non_empty(data.parent_id).map(FolderId::new),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(id: &str, request: &FolderAddRequest) -> FolderData {
        FolderData {
            id: id.to_string(),
            name: request.name.clone(),
            vault_id: request.vault_id.clone(),
            parent_id: Some(request.parent_id.clone().unwrap_or_default()),
        }
    }

    #[test]
    fn test_top_level_folder_roundtrip() {
        let model = FolderModel::new("project-x", "v1");
        let request = to_create_request(&model);
        assert_eq!(request.parent_id, None);

        let live = from_response(echo("f1", &request));
        assert_eq!(live.id, Some(FolderId::new("f1")));
        assert_eq!(live.name, "project-x");
        assert_eq!(live.vault_id, VaultId::new("v1"));
        assert_eq!(live.parent_id, None);
    }

    #[test]
    fn test_nested_folder_roundtrip() {
        let model = FolderModel::new("child", "v1").with_parent("f1");
        let live = from_response(echo("f2", &to_create_request(&model)));
        assert_eq!(live.parent_id, Some(FolderId::new("f1")));
    }

    #[test]
    fn test_missing_parent_is_absent() {
        let data = FolderData {
            id: "f1".to_string(),
            name: "n".to_string(),
            vault_id: "v1".to_string(),
            parent_id: None,
        };
        assert_eq!(from_response(data).parent_id, None);
    }

    #[test]
    fn test_update_request_only_name() {
        let model = FolderModel::new("renamed", "v2").with_parent("f9");
        let body = serde_json::to_value(to_update_request(&model)).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "renamed" }));
    }
}
