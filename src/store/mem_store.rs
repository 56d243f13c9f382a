use std::collections::BTreeMap;
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::timeout_at;
use tokio::time::Instant;
use tracing::debug;
use tracing::trace;

use super::Entry;
use super::QueryMeta;
use super::ServiceEntry;
use super::ServiceRegistration;
use super::Store;
use super::WriteMeta;
use crate::Result;
use crate::StoreConfig;
use crate::StoreError;

/// In-process revisioned store with blocking-query semantics.
///
/// Every write bumps a store-wide revision counter and stamps the written
/// entry with it. A blocking fetch suspends until the key's own revision
/// moves past the wait index, or until `max_wait` elapses.
#[derive(Debug)]
pub struct MemStore {
    state: Mutex<MemState>,
    /// Broadcasts the latest revision to suspended fetches
    revision_tx: watch::Sender<u64>,
    max_wait: Duration,
}

#[derive(Debug, Default)]
struct MemState {
    revision: u64,
    entries: HashMap<String, Entry>,
    /// Revision of the last write or delete per key, kept after deletion
    key_revisions: HashMap<String, u64>,
    services: BTreeMap<String, MemService>,
    registry_revision: u64,
    fail_next: Option<StoreError>,
}

#[derive(Debug)]
struct MemService {
    registration: ServiceRegistration,
    passing: bool,
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new(&StoreConfig::default())
    }
}

impl MemStore {
    pub fn new(config: &StoreConfig) -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            state: Mutex::new(MemState::default()),
            revision_tx,
            max_wait: config.max_wait(),
        }
    }

    /// Removes `key`; blocked fetches on it wake up and see it absent.
    pub fn delete(
        &self,
        key: &str,
    ) -> WriteMeta {
        let revision = {
            let mut state = self.state.lock();
            state.revision += 1;
            let revision = state.revision;
            state.entries.remove(key);
            state.key_revisions.insert(key.to_string(), revision);
            revision
        };
        self.revision_tx.send_replace(revision);
        WriteMeta { index: revision }
    }

    /// Flips an instance to critical so it drops out of healthy queries.
    pub fn mark_critical(
        &self,
        id: &str,
    ) -> bool {
        let mut state = self.state.lock();
        let found = match state.services.get_mut(id) {
            Some(service) => {
                service.passing = false;
                true
            }
            None => false,
        };
        if found {
            state.registry_revision += 1;
        }
        found
    }

    /// Makes the next store call of any kind fail with `error`.
    pub fn fail_next(
        &self,
        error: StoreError,
    ) {
        self.state.lock().fail_next = Some(error);
    }

    /// Current store-wide revision
    pub fn revision(&self) -> u64 {
        self.state.lock().revision
    }

    fn take_failure(&self) -> Result<()> {
        match self.state.lock().fail_next.take() {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    fn snapshot(
        &self,
        key: &str,
    ) -> (Option<Entry>, QueryMeta) {
        let state = self.state.lock();
        let last_index = state.key_revisions.get(key).copied().unwrap_or(0);
        (state.entries.get(key).cloned(), QueryMeta { last_index })
    }
}

#[async_trait]
impl Store for MemStore {
    async fn fetch(
        &self,
        key: &str,
        wait_index: Option<u64>,
    ) -> Result<(Option<Entry>, QueryMeta)> {
        self.take_failure()?;

        let Some(wait_index) = wait_index else {
            return Ok(self.snapshot(key));
        };

        let deadline = Instant::now() + self.max_wait;
        // Subscribe before inspecting state so no write slips between the
        // check and the wait.
        let mut revision_rx = self.revision_tx.subscribe();
        loop {
            let (entry, meta) = self.snapshot(key);
            if meta.last_index > wait_index {
                trace!(key, wait_index, last_index = meta.last_index, "blocking fetch satisfied");
                return Ok((entry, meta));
            }

            match timeout_at(deadline, revision_rx.changed()).await {
                Ok(Ok(())) => continue,
                // Sender lives as long as the store
                Ok(Err(_)) => return Ok(self.snapshot(key)),
                Err(_) => {
                    debug!(key, wait_index, "blocking fetch timed out without change");
                    return Ok(self.snapshot(key));
                }
            }
        }
    }

    async fn write(
        &self,
        key: &str,
        value: Bytes,
    ) -> Result<WriteMeta> {
        self.take_failure()?;

        let revision = {
            let mut state = self.state.lock();
            state.revision += 1;
            let revision = state.revision;
            state
                .entries
                .insert(key.to_string(), Entry::new(key, value, revision));
            state.key_revisions.insert(key.to_string(), revision);
            revision
        };
        self.revision_tx.send_replace(revision);

        trace!(key, revision, "mem store write");
        Ok(WriteMeta { index: revision })
    }

    async fn register_service(
        &self,
        registration: ServiceRegistration,
    ) -> Result<()> {
        self.take_failure()?;

        let mut state = self.state.lock();
        state.registry_revision += 1;
        state.services.insert(
            registration.id.clone(),
            MemService {
                registration,
                passing: true,
            },
        );
        Ok(())
    }

    async fn deregister_service(
        &self,
        id: &str,
    ) -> Result<()> {
        self.take_failure()?;

        let mut state = self.state.lock();
        if state.services.remove(id).is_some() {
            state.registry_revision += 1;
        }
        Ok(())
    }

    async fn healthy_instances(
        &self,
        service: &str,
        tag: &str,
    ) -> Result<(Vec<ServiceEntry>, QueryMeta)> {
        self.take_failure()?;

        let state = self.state.lock();
        let instances = state
            .services
            .values()
            .filter(|s| s.passing && s.registration.name == service)
            .filter(|s| tag.is_empty() || s.registration.tags.iter().any(|t| t == tag))
            .map(|s| ServiceEntry {
                id: s.registration.id.clone(),
                service: s.registration.name.clone(),
                address: s.registration.address.clone(),
                port: s.registration.port,
                tags: s.registration.tags.clone(),
            })
            .collect();

        Ok((
            instances,
            QueryMeta {
                last_index: state.registry_revision,
            },
        ))
    }
}
