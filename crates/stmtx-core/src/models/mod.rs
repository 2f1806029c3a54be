//! Data models for statements, transactions and configuration.

pub mod config;
pub mod transaction;

pub use config::StmtxConfig;
pub use transaction::{StatementFile, TransactionRecord};
