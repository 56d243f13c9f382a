use async_trait::async_trait;
use autometrics::autometrics;
use bytes::Bytes;
use tracing::debug;

use super::Client;
use crate::binding::coerce_int;
use crate::binding::decode_text;
use crate::Bindable;
use crate::ChangeWatcher;
use crate::ConfigBinder;
use crate::Entry;
use crate::Error;
use crate::Lookup;
use crate::QueryMeta;
use crate::Result;
use crate::Store;
use crate::WatchHandle;
use crate::WriteMeta;
use crate::API_SLO;

impl<S: Store> Client<S> {
    /// Reads the current value of `key` without blocking.
    ///
    /// Records the response index so a later [`Client::watch`] on the same
    /// key resumes from it.
    ///
    /// # Errors
    /// - [`Error::NotFound`] when the key does not exist
    /// - store errors verbatim
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    pub async fn get(
        &self,
        key: &str,
    ) -> Result<(Entry, QueryMeta)> {
        let (entry, meta) = self.store.fetch(key, None).await?;
        let Some(entry) = entry else {
            debug!(key, "kv not found");
            return Err(Error::NotFound {
                key: key.to_string(),
            });
        };

        self.tracker.set(key, meta.last_index);
        Ok((entry, meta))
    }

    /// Value of `key` as text; invalid UTF-8 is replaced, never rejected
    pub async fn get_string(
        &self,
        key: &str,
    ) -> Result<String> {
        let (entry, _) = self.get(key).await?;
        Ok(decode_text(&entry.value))
    }

    /// Value of `key` parsed as a platform integer; surrounding whitespace
    /// is ignored.
    pub async fn get_int(
        &self,
        key: &str,
    ) -> Result<isize> {
        let (entry, _) = self.get(key).await?;
        coerce_int(&entry.value)
    }

    /// Stores `value` under `key`.
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    pub async fn put(
        &self,
        key: &str,
        value: impl AsRef<[u8]>,
    ) -> Result<WriteMeta> {
        let value = Bytes::copy_from_slice(value.as_ref());
        self.store.write(key, value).await
    }

    /// Starts a background watch on `key`.
    ///
    /// Must be called inside a Tokio runtime. The watch runs until the
    /// handle is cancelled or dropped, the client shuts down, or the store
    /// reports an error.
    pub fn watch(
        &self,
        key: &str,
    ) -> Result<WatchHandle> {
        debug!(key, "starting watch");
        let watcher = ChangeWatcher::new(
            self.store.clone(),
            self.tracker.clone(),
            key,
            &self.config.watch,
            self.cancel.child_token(),
        )?;
        Ok(watcher.spawn())
    }

    /// Populates `record` from the keys under `parent`.
    ///
    /// Stops at the first error; fields assigned before it keep their new
    /// values.
    #[cfg_attr(not(doc), autometrics(objective = API_SLO))]
    pub async fn load_into(
        &self,
        parent: &str,
        record: &mut dyn Bindable,
    ) -> Result<()> {
        ConfigBinder::new(self).load(parent, record).await
    }
}

#[async_trait]
impl<S: Store> Lookup for Client<S> {
    async fn lookup(
        &self,
        path: &str,
    ) -> Result<Entry> {
        self.get(path).await.map(|(entry, _)| entry)
    }
}
