//! GNT admin daemon: serves the admin shell behind the idle gate

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod server;

pub use config::Settings;
pub use error::{DaemonError, Result};
pub use server::ServerBuilder;
