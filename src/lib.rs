//! Record-store file organization simulator.
//!
//! Models how the physical organization of records (unordered heap, key-ordered
//! with an extension area, static hash) changes the number of block accesses a
//! workload costs. Blocks live in memory and are sized with a textual length
//! proxy; nothing is persisted.

#![warn(missing_docs)]

pub mod cli;
pub mod data_generator;
/// Crate error type and `Result` alias.
pub mod error;
pub mod sim;
pub mod storage;
pub mod types;

pub use error::{FileOrgError, Result};
pub use types::{Key, Record};
