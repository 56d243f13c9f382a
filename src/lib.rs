//! Client facade over a remote hierarchical key-value store.
//!
//! Adds three things on top of plain get/put:
//! - [`Client::watch`]: a background long-poll loop streaming every change
//!   of a key
//! - [`Client::load_into`]: recursive population of a [`Bindable`] record
//!   from the keys under a parent path, with per-field tag defaults
//! - service registration and healthy-instance discovery
//!
//! The store itself sits behind the [`Store`] trait; [`MemStore`] is the
//! in-process implementation.

mod binding;
mod client;
mod config;
pub mod constants;
mod errors;
mod metrics;
mod store;
pub mod utils;
mod watch;

pub use binding::*;
pub use client::*;
pub use errors::*;
pub use metrics::*;
pub use store::*;
pub use utils::*;
pub use watch::*;

pub use self::config::*;

//-----------------------------------------------------------
// Autometrics
/// autometrics: https://docs.autometrics.dev/rust/adding-alerts-and-slos
use autometrics::objectives::Objective;
use autometrics::objectives::ObjectiveLatency;
use autometrics::objectives::ObjectivePercentile;
const API_SLO: Objective = Objective::new("api")
    .success_rate(ObjectivePercentile::P99_9)
    .latency(ObjectiveLatency::Ms10, ObjectivePercentile::P99);
