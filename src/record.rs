use serde::{Deserialize, Serialize};

/// One name-occurrence row from the bibliographic store.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawConferenceEntry {
    #[serde(rename = "pid")]
    pub record_id: i64,
    #[serde(rename = "name_seq")]
    pub sequence_index: i64,
    #[serde(rename = "conference")]
    pub raw_text: Option<String>,
}

pub const NOTE_NO_JSON: &str = "fallback: could not parse JSON";
pub const NOTE_BAD_JSON: &str = "fallback: JSON decode error";
pub const NOTE_SKIPPED: &str = "no date detected or skipped by heuristic";

/// Name, place and dates as text, plus a diagnostic note.
///
/// `note` is empty on a clean extraction and carries one of the `NOTE_*`
/// tags when a fallback produced the value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub conf_name: String,
    pub conf_place: String,
    pub conf_dates: String,
    pub note: String,
}

impl ExtractedFields {
    /// The record kept when the service answer could not be used: the raw
    /// string becomes the name and nothing else is claimed.
    pub fn fallback(raw: &str, note: &str) -> Self {
        Self {
            conf_name: raw.to_string(),
            note: note.to_string(),
            ..Self::default()
        }
    }
}

/// A calendar date at whatever precision the source gave. `None` means the
/// component was absent, never zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateParts {
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<u32>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    pub begin: DateParts,
    pub end: DateParts,
}

impl DateRange {
    /// Begin then end, each as day, month, year.
    pub fn to_columns(&self) -> [Option<u32>; 6] {
        [
            self.begin.day,
            self.begin.month,
            self.begin.year,
            self.end.day,
            self.end.month,
            self.end.year,
        ]
    }
}

/// One output row: identity, extracted text and derived numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedConferenceRecord {
    pub entry: RawConferenceEntry,
    pub fields: ExtractedFields,
    pub dates: DateRange,
    pub conf_order: Option<u32>,
}

/// Flat persisted form of [`ParsedConferenceRecord`], in column order.
#[derive(Debug, Serialize)]
pub struct OutputRow<'a> {
    pub pid: i64,
    pub name_seq: i64,
    pub raw_conference: Option<&'a str>,
    pub conf_name: &'a str,
    pub conf_place: &'a str,
    pub conf_dates: &'a str,
    pub conf_begin_date_day: Option<u32>,
    pub conf_begin_date_month: Option<u32>,
    pub conf_begin_date_year: Option<u32>,
    pub conf_end_date_day: Option<u32>,
    pub conf_end_date_month: Option<u32>,
    pub conf_end_date_year: Option<u32>,
    pub conf_order: Option<u32>,
    pub note: &'a str,
}

impl<'a> From<&'a ParsedConferenceRecord> for OutputRow<'a> {
    fn from(rec: &'a ParsedConferenceRecord) -> Self {
        let [bd, bm, by, ed, em, ey] = rec.dates.to_columns();
        OutputRow {
            pid: rec.entry.record_id,
            name_seq: rec.entry.sequence_index,
            raw_conference: rec.entry.raw_text.as_deref(),
            conf_name: &rec.fields.conf_name,
            conf_place: &rec.fields.conf_place,
            conf_dates: &rec.fields.conf_dates,
            conf_begin_date_day: bd,
            conf_begin_date_month: bm,
            conf_begin_date_year: by,
            conf_end_date_day: ed,
            conf_end_date_month: em,
            conf_end_date_year: ey,
            conf_order: rec.conf_order,
            note: &rec.fields.note,
        }
    }
}
