// src/store/mod.rs
//! On-disk store formats and generation management

pub mod generation;
pub mod mapfile;
pub mod sequence;

pub use generation::{install, CURRENT_NAME, LOCK_NAME, OLD_NAME};
pub use mapfile::{MapFileReader, MapFileWriter, DATA_FILE, INDEX_FILE};
pub use sequence::{SequenceReader, SequenceWriter};
