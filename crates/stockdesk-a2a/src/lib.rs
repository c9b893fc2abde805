//! Per-specialist HTTP servers speaking a small agent-to-agent protocol,
//! the supervisor that runs all of them, and a client for talking to one.

pub mod cards;
pub mod client;
pub mod envelope;
pub mod error;
pub mod server;
pub mod supervisor;

pub use client::A2aClient;
pub use error::A2aError;
pub use server::{create_app, serve, AppState};
pub use supervisor::{Exited, ManagedServer, Supervisor};
