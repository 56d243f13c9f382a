//! Boundary to the external revisioned key-value store.
//!
//! The store's transport and wire protocol live behind [`Store`]. Everything
//! above this module only sees revisioned [`Entry`] values and the index
//! metadata returned with every query.

mod mem_store;
pub use mem_store::*;


use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;

use crate::Result;

/// One revisioned key-value pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value: Bytes,
    /// Store revision of the last write to this key
    pub index: u64,
}

impl Entry {
    pub fn new(
        key: impl Into<String>,
        value: impl Into<Bytes>,
        index: u64,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            index,
        }
    }
}

/// Metadata returned with every read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryMeta {
    /// Revision to pass as the next wait index
    pub last_index: u64,
}

/// Metadata returned with every write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteMeta {
    pub index: u64,
}

/// TTL check registered alongside a service instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCheck {
    pub ttl: Duration,
    pub deregister_critical_after: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    pub id: String,
    pub name: String,
    pub address: String,
    pub port: u16,
    pub tags: Vec<String>,
    pub check: ServiceCheck,
}

/// A service instance that passes its health checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEntry {
    pub id: String,
    pub service: String,
    pub address: String,
    pub port: u16,
    pub tags: Vec<String>,
}

/// Client side of the remote store.
///
/// Every call is a single request/response exchange; implementations never
/// retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Reads `key`.
    ///
    /// With `wait_index = Some(i)` the call blocks until the key's revision
    /// moves past `i` or the store's own wait timeout elapses. With `None` it
    /// answers immediately. An absent key is `Ok((None, meta))`.
    async fn fetch(
        &self,
        key: &str,
        wait_index: Option<u64>,
    ) -> Result<(Option<Entry>, QueryMeta)>;

    async fn write(
        &self,
        key: &str,
        value: Bytes,
    ) -> Result<WriteMeta>;

    /// Registers a service instance with the local agent
    async fn register_service(
        &self,
        registration: ServiceRegistration,
    ) -> Result<()>;

    async fn deregister_service(
        &self,
        id: &str,
    ) -> Result<()>;

    /// Instances of `service` passing their health checks, optionally
    /// filtered by `tag` (empty tag means no filter). An empty list is not an
    /// error at this layer.
    async fn healthy_instances(
        &self,
        service: &str,
        tag: &str,
    ) -> Result<(Vec<ServiceEntry>, QueryMeta)>;
}
