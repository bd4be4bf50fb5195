// src/lib.rs

//! Crawl database conversion tool
//!
//! Rewrites the records of a crawl database from the obsolete legacy key
//! encoding to the current text encoding, optionally rewriting embedded
//! metadata keys as well, then atomically installs the converted store as
//! the new current generation.
//!
//! # Architecture
//!
//! - Tagged keys: legacy-vs-text is an enum tag on the key, not a runtime
//!   type check
//! - Streaming pass: records flow read -> convert -> append; the sorted
//!   source keeps the output sorted, and the writer verifies it
//! - Generations: `current/` is the live store, `old/` the previous one;
//!   install is a rename-based pointer swap under a lock file
//! - Checksummed frames: every on-disk record carries a CRC32, so
//!   corruption fails the pass instead of propagating

pub mod convert;
pub mod datum;
mod error;
pub mod job;
pub mod key;
pub mod store;

pub use convert::{ConvertOptions, RecordKeyConverter};
pub use datum::{CrawlDatum, FetchStatus, MetadataMap};
pub use error::{Error, Result};
pub use job::{ConversionJob, JobSummary};
pub use key::{KeyEncoding, MetaKey, MetaKeyKind, RecordKey};
