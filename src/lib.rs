//! Concurrent reconciliation of a system transaction ledger against bank statements

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod prelude;
pub mod storage;
pub mod streaming;
