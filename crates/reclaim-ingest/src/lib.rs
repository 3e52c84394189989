//! Record ingestion for truncated record recovery.
//!
//! This crate loads the two input collections of a recovery run and writes
//! its output artifacts.
//!
//! # Features
//!
//! - **Reference loading**: read the trusted collection from CSV with
//!   configurable column names
//! - **Incomplete loading**: read truncated records from a JSON array,
//!   preserving fields the model does not know about
//! - **Artifact writing**: replace output files without leaving partial writes
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use reclaim_ingest::{ReferenceColumns, load_incomplete_json, load_reference_csv, write_json};
//!
//! let reference = load_reference_csv(Path::new("reference.csv"), &ReferenceColumns::default())?;
//! let incomplete = load_incomplete_json(Path::new("unfixed_questions.json"))?;
//! write_json(Path::new("unmatched_records.json"), &incomplete)?;
//! ```

mod error;
mod incomplete;
mod output;
mod reference;

// === Error Types ===
pub use error::{IngestError, Result};

// === Loading ===
pub use incomplete::load_incomplete_json;
pub use reference::{ReferenceColumns, load_reference_csv};

// === Writing ===
pub use output::{StagedFile, stage_json, write_json};
