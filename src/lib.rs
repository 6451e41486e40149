//! Settings assembly for a Superset deployment.
//!
//! [`config::Settings`] is built once at startup from compiled-in defaults,
//! an optional YAML overlay and the process environment, then handed by
//! reference to the bootstrap. [`audit`] reviews a snapshot for
//! production safety.

pub mod audit;
pub mod config;
