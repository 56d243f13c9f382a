//! Client facade over a revisioned key-value store
//!
//! [`Client`] wraps any [`Store`] and adds:
//! - typed reads ([`Client::get_string`], [`Client::get_int`])
//! - long-poll change notification ([`Client::watch`])
//! - structured config binding ([`Client::load_into`])
//! - service registration and discovery pass-throughs
//!
//! # Basic Usage
//! ```no_run
//! use std::sync::Arc;
//!
//! use kvfacade::{impl_bindable, Client, ClientConfig, MemStore};
//!
//! #[derive(Default)]
//! struct Server {
//!     port: isize,
//!     host: String,
//! }
//!
//! impl_bindable!(Server {
//!     scalar port = "default:8080",
//!     scalar host,
//! });
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let config = ClientConfig::new().unwrap();
//!     let store = Arc::new(MemStore::new(&config.store));
//!     let client = Client::new(store, config).unwrap();
//!
//!     client.put("app/server/host", "0.0.0.0").await.unwrap();
//!
//!     let mut watch = client.watch("app/server/host").unwrap();
//!
//!     let mut server = Server::default();
//!     client.load_into("app/server", &mut server).await.unwrap();
//!
//!     while let Some(entry) = watch.recv().await {
//!         println!("changed: {:?}", entry);
//!     }
//! }
//! ```

mod kv;
mod service;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::ClientConfig;
use crate::IndexTracker;
use crate::Result;
use crate::Store;

/// Entry point for key-value, watch, binding and service operations.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct Client<S: Store> {
    store: Arc<S>,
    tracker: Arc<IndexTracker>,
    config: ClientConfig,
    /// Parent of every watch token
    cancel: CancellationToken,
}

impl<S: Store> Client<S> {
    /// Builds a client over `store`.
    ///
    /// # Errors
    /// - [`crate::Error::Config`] when `config` fails [`ClientConfig::validate`]
    pub fn new(
        store: Arc<S>,
        config: ClientConfig,
    ) -> Result<Self> {
        let config = config.validate()?;
        Ok(Self::with_validated_config(store, config))
    }

    /// Builds a client with [`ClientConfig::default`].
    pub fn with_default_config(store: Arc<S>) -> Self {
        Self::with_validated_config(store, ClientConfig::default())
    }

    fn with_validated_config(
        store: Arc<S>,
        config: ClientConfig,
    ) -> Self {
        Self {
            store,
            tracker: Arc::new(IndexTracker::new()),
            config,
            cancel: CancellationToken::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Last observed response index per key, shared with running watches
    pub fn tracker(&self) -> &Arc<IndexTracker> {
        &self.tracker
    }

    /// Cancels every watch started from this client.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}
