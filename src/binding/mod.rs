//! Structured config binding
//!
//! Materializes a typed, possibly nested record from a namespace of flat
//! key-value entries:
//! - [`coerce`] turns raw payloads into scalar values
//! - [`TagOptions`] parses per-field `key:value` metadata
//! - [`Bindable`] describes a record's fields as a static table
//! - [`ConfigBinder`] walks that table depth-first and fills the record

mod binder;
mod coerce;
mod record;
mod tag;

pub use binder::*;
pub use coerce::*;
pub use record::*;
pub use tag::*;
