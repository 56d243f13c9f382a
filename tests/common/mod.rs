use std::sync::Arc;

use kvfacade::Client;
use kvfacade::ClientConfig;
use kvfacade::MemStore;
use kvfacade::StoreConfig;
use nanoid::nanoid;

/// Long-poll timeout used by tests that rely on timeouts firing
pub const SHORT_MAX_WAIT_MS: u64 = 100;

pub fn test_client() -> Client<MemStore> {
    client_with_store_config(StoreConfig::default())
}

pub fn short_poll_client() -> Client<MemStore> {
    client_with_store_config(StoreConfig {
        max_wait_ms: SHORT_MAX_WAIT_MS,
    })
}

fn client_with_store_config(store: StoreConfig) -> Client<MemStore> {
    let config = ClientConfig {
        store,
        ..Default::default()
    };
    Client::new(Arc::new(MemStore::new(&config.store)), config).expect("valid test config")
}

/// Unique key prefix so tests never observe each other's writes
pub fn random_prefix() -> String {
    format!("test-{}", nanoid!(8))
}
