// src/store/sequence.rs
//! Framed record files
//!
//! The sequence file is the base on-disk format for crawl database
//! generations: a short magic/version header followed by length-prefixed
//! CBOR frames, one `(RecordKey, CrawlDatum)` pair per frame. Each frame
//! carries a CRC32 checksum so torn writes and bit rot surface as a
//! corrupt-store error instead of a silently wrong record.
//!
//! Frame layout: `{len: u32 le}{crc32: u32 le}{payload: len bytes}`.

use crate::datum::CrawlDatum;
use crate::error::{Error, Result};
use crate::key::RecordKey;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub(crate) const SEQUENCE_MAGIC: [u8; 4] = *b"CDBS";
pub(crate) const INDEX_MAGIC: [u8; 4] = *b"CDBI";
pub(crate) const FORMAT_VERSION: u8 = 1;

/// Byte offset of the first frame in any framed file.
pub(crate) const HEADER_LEN: u64 = 5;

/// Upper bound on a single frame; a length field beyond this is treated as
/// corruption rather than an allocation request.
const MAX_FRAME_LEN: u32 = 1 << 26;

pub(crate) fn write_header<W: Write>(writer: &mut W, magic: &[u8; 4]) -> Result<()> {
    writer.write_all(magic)?;
    writer.write_all(&[FORMAT_VERSION])?;
    Ok(())
}

pub(crate) fn read_header<R: Read>(reader: &mut R, magic: &[u8; 4], path: &Path) -> Result<()> {
    let mut header = [0u8; HEADER_LEN as usize];
    reader
        .read_exact(&mut header)
        .map_err(|_| Error::corrupt(path, "missing file header"))?;
    if header[..4] != magic[..] {
        return Err(Error::corrupt(path, "bad magic"));
    }
    if header[4] != FORMAT_VERSION {
        return Err(Error::corrupt(
            path,
            format!("unsupported format version {}", header[4]),
        ));
    }
    Ok(())
}

/// Write one checksummed frame; returns the number of bytes written.
pub(crate) fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<u64> {
    writer.write_all(&(payload.len() as u32).to_le_bytes())?;
    writer.write_all(&crc32fast::hash(payload).to_le_bytes())?;
    writer.write_all(payload)?;
    Ok(8 + payload.len() as u64)
}

/// Read one frame, verifying its checksum. `Ok(None)` at a clean EOF;
/// anything truncated or mismatched is a corrupt-store error.
pub(crate) fn read_frame<R: Read>(reader: &mut R, path: &Path) -> Result<Option<Vec<u8>>> {
    let mut len_buf = [0u8; 4];
    match read_fully(reader, &mut len_buf)? {
        0 => return Ok(None),
        4 => {}
        _ => return Err(Error::corrupt(path, "truncated frame header")),
    }
    let len = u32::from_le_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(Error::corrupt(path, format!("frame length {len} out of range")));
    }

    let mut crc_buf = [0u8; 4];
    reader
        .read_exact(&mut crc_buf)
        .map_err(|_| Error::corrupt(path, "truncated frame header"))?;
    let expected = u32::from_le_bytes(crc_buf);

    let mut payload = vec![0u8; len as usize];
    reader
        .read_exact(&mut payload)
        .map_err(|_| Error::corrupt(path, "truncated frame payload"))?;

    if crc32fast::hash(&payload) != expected {
        return Err(Error::corrupt(path, "frame checksum mismatch"));
    }
    Ok(Some(payload))
}

fn read_fully<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

/// Appends `(RecordKey, CrawlDatum)` frames to a new sequence file.
pub struct SequenceWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    offset: u64,
}

impl SequenceWriter {
    /// Create the file and write its header. Fails if the file exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create_new(&path)?;
        let mut writer = BufWriter::new(file);
        write_header(&mut writer, &SEQUENCE_MAGIC)?;
        Ok(Self {
            writer,
            path,
            offset: HEADER_LEN,
        })
    }

    /// Append one record; returns the byte offset of its frame.
    pub fn append(&mut self, key: &RecordKey, datum: &CrawlDatum) -> Result<u64> {
        let mut payload = Vec::new();
        ciborium::into_writer(&(key, datum), &mut payload)?;
        let start = self.offset;
        self.offset += write_frame(&mut self.writer, &payload)?;
        Ok(start)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush and fsync. Must be called before the file is published; a
    /// dropped writer loses buffered frames.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }
}

/// Streams `(RecordKey, CrawlDatum)` pairs out of a sequence file.
pub struct SequenceReader {
    reader: BufReader<File>,
    path: PathBuf,
}

impl SequenceReader {
    /// Open the file and validate its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        read_header(&mut reader, &SEQUENCE_MAGIC, &path)?;
        Ok(Self { reader, path })
    }

    /// Reposition to a frame offset previously returned by
    /// [`SequenceWriter::append`].
    pub fn seek(&mut self, offset: u64) -> Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_record(&mut self) -> Result<Option<(RecordKey, CrawlDatum)>> {
        match read_frame(&mut self.reader, &self.path)? {
            None => Ok(None),
            Some(payload) => {
                let record = ciborium::from_reader(payload.as_slice())?;
                Ok(Some(record))
            }
        }
    }
}

impl Iterator for SequenceReader {
    type Item = Result<(RecordKey, CrawlDatum)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_record().transpose()
    }
}
