mod net;

pub use net::*;
