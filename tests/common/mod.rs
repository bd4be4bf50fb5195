// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

use crawldb::store::generation;
use crawldb::store::{MapFileReader, SequenceWriter, DATA_FILE};
use crawldb::{CrawlDatum, FetchStatus, RecordKey};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a legacy-encoded crawl database under a scratch directory.
///
/// Records must be given in ascending key order, matching the sorted store
/// convention. Returns (TempDir, db_path) - keep the TempDir alive to
/// prevent cleanup.
pub fn seed_legacy_db(records: &[(&str, CrawlDatum)]) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let db = temp_dir.path().join("crawldb");
    write_generation(&generation::current_dir(&db), records, true);
    (temp_dir, db)
}

/// Write a generation directory containing a `data` sequence file.
pub fn write_generation(dir: &Path, records: &[(&str, CrawlDatum)], legacy_keys: bool) {
    fs::create_dir_all(dir).unwrap();
    let mut writer = SequenceWriter::create(dir.join(DATA_FILE)).unwrap();
    for (key, datum) in records {
        let key = if legacy_keys {
            RecordKey::legacy(*key)
        } else {
            RecordKey::text(*key)
        };
        writer.append(&key, datum).unwrap();
    }
    writer.finish().unwrap();
}

/// Read every record of a database's current generation, in store order.
pub fn read_current(db: &Path) -> Vec<(RecordKey, CrawlDatum)> {
    MapFileReader::open(generation::current_dir(db))
        .unwrap()
        .iter()
        .unwrap()
        .collect::<crawldb::Result<Vec<_>>>()
        .unwrap()
}

/// A fetched datum with distinctive payload fields.
pub fn fetched_datum(score: f32) -> CrawlDatum {
    let mut datum = CrawlDatum::new(FetchStatus::Fetched, 2_592_000);
    datum.fetch_time = 1_700_000_000_000;
    datum.score = score;
    datum.signature = Some(vec![0xDE, 0xAD, 0xBE, 0xEF]);
    datum
}
