//! Provider handle bundling the engines around one remote client.
//!
//! The host configures a [`RemoteClient`] once and builds a [`Provider`]
//! from it; every engine and lookup handed out shares that client.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pwforge_core::{MemoryRemote, Provider, Reconciler, VaultModel};
//!
//! # tokio_test_block(async {
//! let provider = Provider::new(Arc::new(MemoryRemote::new()));
//! let vault = provider.vaults().create(VaultModel::new("ops")).await.unwrap();
//! assert!(vault.id.is_some());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::engine::{FolderEngine, PasswordEngine, VaultEngine};
use crate::lookup::PasswordLookup;
use crate::remote::RemoteClient;

/// Shared entry point for all resource kinds.
#[derive(Clone)]
pub struct Provider {
    client: Arc<dyn RemoteClient>,
}

impl Provider {
    pub fn new(client: Arc<dyn RemoteClient>) -> Self {
        Self { client }
    }

    /// The injected remote client.
    pub fn client(&self) -> Arc<dyn RemoteClient> {
        Arc::clone(&self.client)
    }

    pub fn vaults(&self) -> VaultEngine {
        VaultEngine::new(self.client())
    }

    pub fn folders(&self) -> FolderEngine {
        FolderEngine::new(self.client())
    }

    pub fn passwords(&self) -> PasswordEngine {
        PasswordEngine::new(self.client())
    }

    pub fn lookup(&self) -> PasswordLookup {
        PasswordLookup::new(self.client())
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Provider").finish_non_exhaustive()
    }
}
