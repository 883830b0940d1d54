//! labelaudit core library.
//!
//! This crate exposes programmatic APIs for auditing issue and pull request
//! labels against a configurable labeling workflow. It is read-only: records
//! come from an already-fetched dump and reports go to a sink.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `input`: Reading record dumps (array, pages, NDJSON).
//! - `models`: Input records, raw payload normalization, rule settings, and
//!   report structs.
//! - `labels`: Facts derived from a record's labels.
//! - `audit`: Rule evaluation and the batch driver.
//! - `output`: Human/JSON/NDJSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod labels;
pub mod models;
pub mod output;
pub mod utils;
