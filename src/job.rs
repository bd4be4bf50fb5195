// src/job.rs
//! Conversion job orchestration
//!
//! The job wires the legacy store, a temporary output location, and the
//! final install path together and runs the batch pass once: stream every
//! record through the converter into a sorted map file, then atomically
//! promote it to the destination's current generation.

use crate::convert::{ConvertOptions, RecordKeyConverter};
use crate::error::{Error, Result};
use crate::key::MetaKeyKind;
use crate::store::generation;
use crate::store::mapfile::MapFileWriter;
use crate::store::sequence::SequenceReader;
use crate::store::DATA_FILE;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Outcome of a completed conversion pass.
#[derive(Debug, Clone, Copy)]
pub struct JobSummary {
    /// Records read, converted, and written.
    pub records: u64,
    /// Legacy-encoded metadata keys rewritten (zero unless metadata
    /// conversion was requested).
    pub metadata_keys_rewritten: u64,
    pub elapsed: Duration,
}

/// A single batch conversion pass over one crawl database.
#[derive(Debug)]
pub struct ConversionJob {
    old_db: PathBuf,
    new_db: PathBuf,
    options: ConvertOptions,
}

impl ConversionJob {
    pub fn new(old_db: impl Into<PathBuf>, new_db: impl Into<PathBuf>, options: ConvertOptions) -> Self {
        Self {
            old_db: old_db.into(),
            new_db: new_db.into(),
            options,
        }
    }

    /// Run the pass. All-or-nothing: on any error the destination database
    /// is untouched and the temporary output directory, if one was
    /// created, is left behind for inspection.
    pub fn run(&self) -> Result<JobSummary> {
        let start = Instant::now();

        let source = generation::current_dir(&self.old_db);
        if !source.is_dir() {
            return Err(Error::MissingGeneration(self.old_db.clone()));
        }

        // A fresh unique name each run, nested under the legacy path like
        // the stores themselves, so a rerun never clobbers the output of a
        // previous attempt.
        let tmp = self.old_db.join(format!("convert-{}", Uuid::new_v4().simple()));
        debug!("writing converted store to {}", tmp.display());

        let reader = SequenceReader::open(source.join(DATA_FILE))?;
        let mut writer = MapFileWriter::create(&tmp)?;
        let mut converter = RecordKeyConverter::new(self.options);

        let mut rewritten = 0u64;
        for entry in reader {
            let (key, datum) = entry?;
            if self.options.convert_metadata {
                rewritten += datum
                    .metadata
                    .iter()
                    .filter(|(k, _)| k.kind == MetaKeyKind::LegacyUtf8)
                    .count() as u64;
            }
            let (new_key, datum) = converter.convert(&key, datum);
            writer.append(new_key, &datum)?;
        }
        let records = writer.finish()?;

        generation::install(&tmp, &self.new_db)?;
        info!(
            "installed converted generation at {}",
            generation::current_dir(&self.new_db).display()
        );

        Ok(JobSummary {
            records,
            metadata_keys_rewritten: rewritten,
            elapsed: start.elapsed(),
        })
    }

    pub fn old_db(&self) -> &Path {
        &self.old_db
    }

    pub fn new_db(&self) -> &Path {
        &self.new_db
    }
}
