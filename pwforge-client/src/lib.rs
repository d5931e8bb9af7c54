//! pwforge Client Library
//!
//! HTTP implementation of [`pwforge_core::RemoteClient`] for the Passwork v4
//! REST API, plus the configuration needed to reach it.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pwforge_client::{ClientConfig, PassworkClient};
//! use pwforge_core::{Provider, Reconciler, VaultModel};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads PASSWORK_HOST and PASSWORK_API_KEY
//!     let config = ClientConfig::from_env()?;
//!     let client = PassworkClient::connect(&config).await?;
//!
//!     let provider = Provider::new(Arc::new(client));
//!     let vault = provider.vaults().create(VaultModel::new("ops")).await?;
//!     println!("created vault {:?}", vault.id);
//!     Ok(())
//! }
//! ```
//!
//! # Feature Flags
//!
//! - `config-file` (default): Load settings from a TOML file in the platform
//!   config directory

mod client;
pub mod config;

pub use client::{PassworkClient, AUTH_HEADER};
pub use config::{ClientConfig, ConfigError, FileConfig};

#[cfg(feature = "config-file")]
pub use config::default_config_path;
