//! Request/response plumbing against a debug adapter.

pub mod client;

pub use client::{DapClient, DebugSession};
