// src/store/mapfile.rs
//! Sorted, indexed record stores
//!
//! A map file is a directory holding a `data` sequence file whose records
//! are in ascending key order, plus a sparse `index` file mapping every
//! Nth key to the byte offset of its frame. Point lookups binary-search
//! the in-memory index and scan at most one interval of the data file.
//!
//! The writer verifies the ordering invariant on every append; an unsorted
//! source surfaces as an error instead of a store with a useless index.

use crate::datum::CrawlDatum;
use crate::error::{Error, Result};
use crate::key::RecordKey;
use crate::store::sequence::{
    read_frame, read_header, write_frame, write_header, SequenceReader, SequenceWriter,
    HEADER_LEN, INDEX_MAGIC,
};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

/// Data component of a map file directory.
pub const DATA_FILE: &str = "data";
/// Index component of a map file directory.
pub const INDEX_FILE: &str = "index";

/// One index entry per this many records.
const INDEX_INTERVAL: u64 = 128;

/// Writes a sorted map file into a directory.
pub struct MapFileWriter {
    data: SequenceWriter,
    index: BufWriter<File>,
    last_key: Option<String>,
    count: u64,
}

impl MapFileWriter {
    /// Create `dir` (and parents) and open empty `data` and `index` files
    /// inside it.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let data = SequenceWriter::create(dir.join(DATA_FILE))?;
        let mut index = BufWriter::new(File::create_new(dir.join(INDEX_FILE))?);
        write_header(&mut index, &INDEX_MAGIC)?;

        Ok(Self {
            data,
            index,
            last_key: None,
            count: 0,
        })
    }

    /// Append one record. Keys must arrive in strictly ascending byte
    /// order; duplicates and regressions are rejected.
    pub fn append(&mut self, key: &RecordKey, datum: &CrawlDatum) -> Result<()> {
        if let Some(previous) = &self.last_key {
            if key.value.as_bytes() <= previous.as_bytes() {
                return Err(Error::OutOfOrderKey {
                    key: key.value.clone(),
                    previous: previous.clone(),
                });
            }
        }

        let offset = self.data.append(key, datum)?;
        if self.count % INDEX_INTERVAL == 0 {
            let mut payload = Vec::new();
            ciborium::into_writer(&(key.as_str(), offset), &mut payload)?;
            write_frame(&mut self.index, &payload)?;
        }

        match &mut self.last_key {
            Some(previous) => {
                previous.clear();
                previous.push_str(key.as_str());
            }
            None => self.last_key = Some(key.value.clone()),
        }
        self.count += 1;
        Ok(())
    }

    /// Flush and fsync both components; returns the record count.
    pub fn finish(self) -> Result<u64> {
        use std::io::Write;

        self.data.finish()?;
        let mut index = self.index;
        index.flush()?;
        index.get_ref().sync_all()?;
        Ok(self.count)
    }
}

/// Reads a map file directory: full scans and index-assisted lookups.
pub struct MapFileReader {
    dir: PathBuf,
    index: Vec<(String, u64)>,
}

impl MapFileReader {
    /// Open `dir`, loading the sparse index into memory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let index_path = dir.join(INDEX_FILE);
        let mut reader = BufReader::new(File::open(&index_path)?);
        read_header(&mut reader, &INDEX_MAGIC, &index_path)?;

        let mut index = Vec::new();
        while let Some(payload) = read_frame(&mut reader, &index_path)? {
            let entry: (String, u64) = ciborium::from_reader(payload.as_slice())?;
            index.push(entry);
        }

        Ok(Self { dir, index })
    }

    /// A fresh streaming reader over the data component.
    pub fn iter(&self) -> Result<SequenceReader> {
        SequenceReader::open(self.dir.join(DATA_FILE))
    }

    /// Look up a record by key content. Seeks to the nearest preceding
    /// index entry and scans forward at most one interval.
    pub fn get(&self, key: &str) -> Result<Option<(RecordKey, CrawlDatum)>> {
        let start = match self.index.partition_point(|(k, _)| k.as_str() <= key) {
            0 => HEADER_LEN,
            n => self.index[n - 1].1,
        };

        let mut reader = self.iter()?;
        reader.seek(start)?;
        for record in reader {
            let (record_key, datum) = record?;
            match record_key.as_str().cmp(key) {
                std::cmp::Ordering::Less => continue,
                std::cmp::Ordering::Equal => return Ok(Some((record_key, datum))),
                std::cmp::Ordering::Greater => return Ok(None),
            }
        }
        Ok(None)
    }
}
