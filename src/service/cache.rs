use std::collections::HashMap;

use crate::record::ExtractedFields;

/// Exact-text memo of extraction results.
///
/// The same conference is cited by many records, so identical raw strings
/// recur. Only exact matches are reused: near-duplicates may be distinct
/// events. Entries live as long as the cache; nothing is evicted.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    entries: HashMap<String, ExtractedFields>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// An owned copy of the cached value; callers may mutate it freely.
    pub fn get(&self, raw: &str) -> Option<ExtractedFields> {
        self.entries.get(raw).cloned()
    }

    pub fn insert(&mut self, raw: &str, fields: ExtractedFields) {
        self.entries.insert(raw.to_string(), fields);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
