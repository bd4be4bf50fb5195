// src/convert.rs
//! The record-mapping function at the heart of the conversion pass
//!
//! `RecordKeyConverter` is applied once per record: it re-tags the primary
//! key with the text encoding and, when enabled, rewrites legacy-encoded
//! metadata keys in the datum's sidecar map. Key content and values are
//! never altered.

use crate::datum::CrawlDatum;
use crate::key::{KeyEncoding, RecordKey};

/// Options carried through a conversion job.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvertOptions {
    /// Also rewrite legacy-encoded metadata keys to the text encoding.
    pub convert_metadata: bool,
}

/// Rewrites record keys from the legacy encoding to the text encoding.
///
/// The converter owns a single output-key buffer that is reused across
/// calls; `convert` returns a borrow of it. A caller that wants to keep the
/// key past the next call must clone it — the borrow checker enforces this.
#[derive(Debug)]
pub struct RecordKeyConverter {
    convert_metadata: bool,
    new_key: RecordKey,
}

impl RecordKeyConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            convert_metadata: options.convert_metadata,
            new_key: RecordKey::text(String::new()),
        }
    }

    /// Map one record. Total over well-formed records: no error conditions.
    ///
    /// The returned key is always text-encoded with the input key's exact
    /// string content, regardless of the input encoding. When metadata
    /// conversion is on and the map is non-empty, the map is rebuilt with
    /// every legacy key rewritten to text; text and foreign keys pass
    /// through unchanged, and values are untouched.
    pub fn convert(&mut self, key: &RecordKey, mut datum: CrawlDatum) -> (&RecordKey, CrawlDatum) {
        self.new_key.encoding = KeyEncoding::Text;
        self.new_key.value.clear();
        self.new_key.value.push_str(key.as_str());

        if self.convert_metadata && !datum.metadata.is_empty() {
            let meta = std::mem::take(&mut datum.metadata);
            datum.metadata = meta
                .into_iter()
                .map(|(k, v)| (k.into_text(), v))
                .collect();
        }

        (&self.new_key, datum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::{FetchStatus, MetadataMap};
    use crate::key::MetaKey;

    fn datum_with_meta(entries: &[(MetaKey, &[u8])]) -> CrawlDatum {
        let mut datum = CrawlDatum::new(FetchStatus::Fetched, 86_400);
        datum.score = 1.5;
        for (key, value) in entries {
            datum.metadata.insert(key.clone(), value.to_vec());
        }
        datum
    }

    #[test]
    fn test_key_is_retagged_with_content_preserved() {
        let mut converter = RecordKeyConverter::new(ConvertOptions::default());
        let datum = CrawlDatum::default();

        let (new_key, _) = converter.convert(&RecordKey::legacy("http://example.com/"), datum);
        assert_eq!(new_key.encoding, KeyEncoding::Text);
        assert_eq!(new_key.as_str(), "http://example.com/");
    }

    #[test]
    fn test_text_keys_are_also_retagged_to_text() {
        let mut converter = RecordKeyConverter::new(ConvertOptions::default());
        let (new_key, _) = converter.convert(&RecordKey::text("x"), CrawlDatum::default());
        assert_eq!(*new_key, RecordKey::text("x"));
    }

    #[test]
    fn test_metadata_untouched_when_disabled() {
        let mut converter = RecordKeyConverter::new(ConvertOptions {
            convert_metadata: false,
        });
        let datum = datum_with_meta(&[(MetaKey::legacy("lang"), b"en")]);
        let expected = datum.clone();

        let (_, out) = converter.convert(&RecordKey::legacy("x"), datum);
        assert_eq!(out, expected);
        assert!(out.metadata.contains_key(&MetaKey::legacy("lang")));
    }

    #[test]
    fn test_metadata_legacy_keys_rewritten() {
        let mut converter = RecordKeyConverter::new(ConvertOptions {
            convert_metadata: true,
        });
        let datum = datum_with_meta(&[
            (MetaKey::legacy("lang"), b"en"),
            (MetaKey::text("score"), b"5"),
        ]);

        let (_, out) = converter.convert(&RecordKey::legacy("x"), datum);
        assert_eq!(out.metadata.len(), 2);
        assert_eq!(out.metadata.get(&MetaKey::text("lang")), Some(b"en".as_slice()));
        assert_eq!(out.metadata.get(&MetaKey::text("score")), Some(b"5".as_slice()));
        assert!(!out.metadata.contains_key(&MetaKey::legacy("lang")));
    }

    #[test]
    fn test_foreign_metadata_keys_preserved() {
        let mut converter = RecordKeyConverter::new(ConvertOptions {
            convert_metadata: true,
        });
        let datum = datum_with_meta(&[
            (MetaKey::legacy("lang"), b"en"),
            (MetaKey::foreign("segment"), b"\x00\x01"),
        ]);

        let (_, out) = converter.convert(&RecordKey::legacy("x"), datum);
        assert_eq!(out.metadata.len(), 2);
        assert_eq!(
            out.metadata.get(&MetaKey::foreign("segment")),
            Some(b"\x00\x01".as_slice())
        );
    }

    #[test]
    fn test_payload_fields_pass_through() {
        let mut converter = RecordKeyConverter::new(ConvertOptions {
            convert_metadata: true,
        });
        let mut datum = datum_with_meta(&[(MetaKey::legacy("lang"), b"en")]);
        datum.fetch_time = 1_700_000_000_000;
        datum.retries_since_fetch = 3;
        datum.signature = Some(vec![0xAB, 0xCD]);

        let (_, out) = converter.convert(&RecordKey::legacy("x"), datum);
        assert_eq!(out.status, FetchStatus::Fetched);
        assert_eq!(out.fetch_time, 1_700_000_000_000);
        assert_eq!(out.retries_since_fetch, 3);
        assert_eq!(out.fetch_interval, 86_400);
        assert_eq!(out.score, 1.5);
        assert_eq!(out.signature, Some(vec![0xAB, 0xCD]));
    }

    #[test]
    fn test_output_key_buffer_is_reused() {
        let mut converter = RecordKeyConverter::new(ConvertOptions::default());

        let (first, _) = converter.convert(&RecordKey::legacy("aaa"), CrawlDatum::default());
        let first = first.clone();
        let (second, _) = converter.convert(&RecordKey::legacy("b"), CrawlDatum::default());

        assert_eq!(first, RecordKey::text("aaa"));
        assert_eq!(*second, RecordKey::text("b"));
    }

    #[test]
    fn test_colliding_legacy_and_text_keys_collapse() {
        let mut converter = RecordKeyConverter::new(ConvertOptions {
            convert_metadata: true,
        });
        let datum = datum_with_meta(&[
            (MetaKey::legacy("lang"), b"en"),
            (MetaKey::text("lang"), b"de"),
        ]);

        let (_, out) = converter.convert(&RecordKey::legacy("x"), datum);
        // Both map to text("lang"); the rebuilt map keeps a single entry.
        assert_eq!(out.metadata.len(), 1);
        assert!(out.metadata.contains_key(&MetaKey::text("lang")));
    }
}
