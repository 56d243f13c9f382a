use std::collections::HashSet;

use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use futures::FutureExt;
#[cfg(test)]
use mockall::automock;
use tracing::debug;
use tracing::trace;

use super::coerce;
use super::Bindable;
use super::FieldMut;
use super::FieldShape;
use super::FieldSpec;
use super::TagOptions;
use crate::metrics::record_bind_failure;
use crate::BindError;
use crate::Entry;
use crate::Result;

/// Single-shot key lookup used by the binder.
///
/// An absent key must surface as [`crate::Error::NotFound`]; every other
/// error aborts the bind.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(
        &self,
        path: &str,
    ) -> Result<Entry>;
}

/// Populates a [`Bindable`] record from the namespace rooted at a parent
/// path.
///
/// Fields are resolved depth-first in declaration order. The first failure
/// aborts the whole bind and leaves already-assigned fields in place: a
/// failed bind is not rolled back.
pub struct ConfigBinder<'a, L: Lookup + ?Sized> {
    lookup: &'a L,
}

impl<'a, L: Lookup + ?Sized> ConfigBinder<'a, L> {
    pub fn new(lookup: &'a L) -> Self {
        Self { lookup }
    }

    pub async fn load(
        &self,
        parent: &str,
        record: &mut dyn Bindable,
    ) -> Result<()> {
        let result = self.load_record(parent.to_string(), record).await;
        if let Err(e) = &result {
            debug!(parent, "config bind aborted: {:?}", e);
            record_bind_failure(e);
        }
        result
    }

    fn load_record<'b>(
        &'b self,
        parent: String,
        record: &'b mut dyn Bindable,
    ) -> BoxFuture<'b, Result<()>> {
        async move {
            let mut segments = HashSet::new();

            for spec in record.fields() {
                let options = TagOptions::parse(spec.tag)?;
                let segment = match options.name() {
                    Some(name) => name.to_string(),
                    None => spec.name.to_lowercase(),
                };
                let path = format!("{parent}/{segment}");

                if spec.shape == FieldShape::Opaque {
                    trace!(%path, "skipping opaque field");
                    continue;
                }
                if !segments.insert(segment) {
                    return Err(BindError::DuplicatePathSegment { path }.into());
                }

                match spec.shape {
                    FieldShape::Nested => {
                        let Some(FieldMut::Nested(nested)) = record.field_mut(spec.name) else {
                            return Err(missing_accessor(spec));
                        };
                        self.load_record(path, nested).await?;
                    }
                    FieldShape::Scalar => {
                        let payload = self.fetch_payload(&path, &options).await?;
                        let Some(FieldMut::Scalar(slot)) = record.field_mut(spec.name) else {
                            return Err(missing_accessor(spec));
                        };
                        let value = coerce(slot.kind(), &payload)?;
                        trace!(%path, ?value, "assigning field");
                        slot.assign(value)?;
                    }
                    FieldShape::Opaque => {}
                }
            }

            Ok(())
        }
        .boxed()
    }

    /// Stored value, else the tag default, else an empty payload.
    async fn fetch_payload(
        &self,
        path: &str,
        options: &TagOptions,
    ) -> Result<Bytes> {
        match self.lookup.lookup(path).await {
            Ok(entry) => Ok(entry.value),
            Err(e) if e.is_not_found() => {
                trace!(path, default = ?options.default_value(), "key absent");
                Ok(options
                    .default_value()
                    .map(|d| Bytes::copy_from_slice(d.as_bytes()))
                    .unwrap_or_default())
            }
            Err(e) => Err(e),
        }
    }
}

fn missing_accessor(spec: &FieldSpec) -> crate::Error {
    BindError::MissingAccessor { field: spec.name }.into()
}
