//! Command handlers.
//!
//! Each handler drives one engine operation through the [`Provider`] and
//! returns what should be printed. Renames and updates read the current
//! state first and change only what was given on the command line.

use anyhow::Result;
use pwforge_core::{
    FolderId, FolderModel, PasswordId, PasswordModel, PasswordQuery, Provider, Reconciler,
    VaultId, VaultModel,
};

use crate::output::Output;
use crate::{Commands, EntryFields, FolderCommand, Kind, PasswordCommand, VaultCommand};

pub async fn run(provider: &Provider, command: Commands) -> Result<Output> {
    match command {
        Commands::Vault(command) => vault(provider, command).await,
        Commands::Folder(command) => folder(provider, command).await,
        Commands::Password(command) => password(provider, command).await,
        Commands::Import { kind, id } => import(provider, kind, id).await,
    }
}

async fn vault(provider: &Provider, command: VaultCommand) -> Result<Output> {
    let engine = provider.vaults();
    match command {
        VaultCommand::Get { id } => Output::state(&engine.read(&VaultId::new(id)).await?),
        VaultCommand::Create {
            name,
            shared,
            master_password,
        } => {
            let mut desired = VaultModel::new(name).private(!shared);
            if let Some(master_password) = master_password {
                desired = desired.with_master_password(master_password);
            }
            Output::state(&engine.create(desired).await?)
        }
        VaultCommand::Rename { id, name } => {
            let id = VaultId::new(id);
            let mut desired = engine.read(&id).await?;
            desired.name = name;
            Output::state(&engine.update(&id, desired).await?)
        }
        VaultCommand::Delete { id } => {
            engine.delete(&VaultId::new(id.as_str())).await?;
            Ok(Output::message(format!("deleted vault {}", id)))
        }
    }
}

async fn folder(provider: &Provider, command: FolderCommand) -> Result<Output> {
    let engine = provider.folders();
    match command {
        FolderCommand::Get { id } => Output::state(&engine.read(&FolderId::new(id)).await?),
        FolderCommand::Create {
            name,
            vault,
            parent,
        } => {
            let mut desired = FolderModel::new(name, vault);
            if let Some(parent) = parent {
                desired = desired.with_parent(parent);
            }
            Output::state(&engine.create(desired).await?)
        }
        FolderCommand::Rename { id, name } => {
            let id = FolderId::new(id);
            let mut desired = engine.read(&id).await?;
            desired.name = name;
            Output::state(&engine.update(&id, desired).await?)
        }
        FolderCommand::Delete { id } => {
            engine.delete(&FolderId::new(id.as_str())).await?;
            Ok(Output::message(format!("deleted folder {}", id)))
        }
    }
}

async fn password(provider: &Provider, command: PasswordCommand) -> Result<Output> {
    let engine = provider.passwords();
    match command {
        PasswordCommand::Get { id } => Output::state(&engine.read(&PasswordId::new(id)).await?),
        PasswordCommand::Create {
            name,
            vault,
            fields,
        } => {
            let desired = apply(PasswordModel::new(name, vault), fields);
            Output::state(&engine.create(desired).await?)
        }
        PasswordCommand::Update { id, name, fields } => {
            let id = PasswordId::new(id);
            let mut desired = apply(engine.read(&id).await?, fields);
            if let Some(name) = name {
                desired.name = name;
            }
            Output::state(&engine.update(&id, desired).await?)
        }
        PasswordCommand::Delete { id } => {
            engine.delete(&PasswordId::new(id.as_str())).await?;
            Ok(Output::message(format!("deleted password {}", id)))
        }
        PasswordCommand::Find { vault, id, name } => {
            let query = PasswordQuery {
                id: id.map(PasswordId::new),
                name,
                vault_id: VaultId::new(vault),
            };
            Output::state(&provider.lookup().find(&query).await?)
        }
    }
}

async fn import(provider: &Provider, kind: Kind, id: String) -> Result<Output> {
    match kind {
        Kind::Vault => Output::state(&provider.vaults().import(&VaultId::new(id)).await?),
        Kind::Folder => Output::state(&provider.folders().import(&FolderId::new(id)).await?),
        Kind::Password => Output::state(&provider.passwords().import(&PasswordId::new(id)).await?),
    }
}

/// Overlay the attributes given on the command line.
fn apply(mut model: PasswordModel, fields: EntryFields) -> PasswordModel {
    if let Some(folder) = fields.folder {
        model.folder_id = Some(FolderId::new(folder));
    }
    if let Some(login) = fields.login {
        model.login = Some(login);
    }
    if let Some(password) = fields.password {
        model = model.with_password(password);
    }
    if let Some(url) = fields.url {
        model.url = Some(url);
    }
    if let Some(description) = fields.description {
        model.description = Some(description);
    }
    if let Some(color) = fields.color {
        model.color = Some(color);
    }
    if !fields.tags.is_empty() {
        model.tags = Some(fields.tags);
    }
    model
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwforge_core::{MemoryRemote, ReconcileError};
    use std::sync::Arc;

    fn provider() -> (Arc<MemoryRemote>, Provider) {
        let remote = Arc::new(MemoryRemote::new());
        let provider = Provider::new(remote.clone());
        (remote, provider)
    }

    fn state(output: Output) -> serde_json::Value {
        match output {
            Output::State(value) => value,
            Output::Message(text) => panic!("expected state, got message: {text}"),
        }
    }

    async fn create_vault(provider: &Provider) -> String {
        let created = run(
            provider,
            Commands::Vault(VaultCommand::Create {
                name: "ops".to_string(),
                shared: false,
                master_password: None,
            }),
        )
        .await
        .unwrap();
        state(created)["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_vault_create_and_rename() {
        let (remote, provider) = provider();
        let id = create_vault(&provider).await;
        assert!(remote.vault(&id).is_some());

        let renamed = run(
            &provider,
            Commands::Vault(VaultCommand::Rename {
                id: id.clone(),
                name: "ops-2".to_string(),
            }),
        )
        .await
        .unwrap();
        let renamed = state(renamed);
        assert_eq!(renamed["name"], "ops-2");
        assert_eq!(renamed["is_private"], true);
    }

    #[tokio::test]
    async fn test_folder_create_with_parent() {
        let (_remote, provider) = provider();
        let vault = create_vault(&provider).await;

        let parent = state(
            run(
                &provider,
                Commands::Folder(FolderCommand::Create {
                    name: "parent".to_string(),
                    vault: vault.clone(),
                    parent: None,
                }),
            )
            .await
            .unwrap(),
        );
        assert_eq!(parent["parent_id"], serde_json::Value::Null);

        let parent_id = parent["id"].as_str().unwrap().to_string();
        let child = state(
            run(
                &provider,
                Commands::Folder(FolderCommand::Create {
                    name: "child".to_string(),
                    vault,
                    parent: Some(parent_id.clone()),
                }),
            )
            .await
            .unwrap(),
        );
        assert_eq!(child["parent_id"], parent_id.as_str());
    }

    #[tokio::test]
    async fn test_password_create_update_find() {
        let (_remote, provider) = provider();
        let vault = create_vault(&provider).await;

        let created = state(
            run(
                &provider,
                Commands::Password(PasswordCommand::Create {
                    name: "db".to_string(),
                    vault: vault.clone(),
                    fields: EntryFields {
                        login: Some("root".to_string()),
                        password: Some("s3cret".to_string()),
                        tags: vec!["b".to_string(), "a".to_string()],
                        ..EntryFields::default()
                    },
                }),
            )
            .await
            .unwrap(),
        );
        assert_eq!(created["tags"], serde_json::json!(["b", "a"]));
        assert_eq!(created["color"], serde_json::Value::Null);
        let id = created["id"].as_str().unwrap().to_string();

        let updated = state(
            run(
                &provider,
                Commands::Password(PasswordCommand::Update {
                    id: id.clone(),
                    name: None,
                    fields: EntryFields {
                        url: Some("https://db.internal".to_string()),
                        ..EntryFields::default()
                    },
                }),
            )
            .await
            .unwrap(),
        );
        assert_eq!(updated["url"], "https://db.internal");
        assert_eq!(updated["login"], "root");
        assert_eq!(updated["password"], "s3cret");

        let found = state(
            run(
                &provider,
                Commands::Password(PasswordCommand::Find {
                    vault,
                    id: None,
                    name: Some("db".to_string()),
                }),
            )
            .await
            .unwrap(),
        );
        assert_eq!(found["id"], id.as_str());
    }

    #[tokio::test]
    async fn test_find_requires_id_or_name() {
        let (_remote, provider) = provider();

        let err = run(
            &provider,
            Commands::Password(PasswordCommand::Find {
                vault: "v1".to_string(),
                id: None,
                name: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ReconcileError>(),
            Some(ReconcileError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_and_import() {
        let (_remote, provider) = provider();
        let vault = create_vault(&provider).await;

        let imported = state(
            run(
                &provider,
                Commands::Import {
                    kind: Kind::Vault,
                    id: vault.clone(),
                },
            )
            .await
            .unwrap(),
        );
        assert_eq!(imported["name"], "ops");

        let deleted = run(
            &provider,
            Commands::Vault(VaultCommand::Delete { id: vault.clone() }),
        )
        .await
        .unwrap();
        assert_eq!(
            deleted.render(false).unwrap(),
            format!("deleted vault {}", vault)
        );

        let err = run(
            &provider,
            Commands::Import {
                kind: Kind::Vault,
                id: vault,
            },
        )
        .await
        .unwrap_err();
        assert!(err
            .downcast_ref::<ReconcileError>()
            .is_some_and(ReconcileError::is_not_found));
    }
}
