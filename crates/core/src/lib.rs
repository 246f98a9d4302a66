//! Domain rules for the DreamTales story service.
//!
//! Everything in this crate is pure: enums for the persisted lookup values,
//! tier and quota rules, prompt assembly, completion parsing, and
//! illustration planning. I/O lives in `dreamtales-db`, `dreamtales-ai`
//! and `dreamtales-api`.

pub mod error;
pub mod illustration;
pub mod pagination;
pub mod parsing;
pub mod prompt;
pub mod speech;
pub mod status;
pub mod story;
pub mod tier;
pub mod types;
