use std::io::Write;

use anyhow::Context;

use crate::{
    gate::should_extract,
    normalize::normalize_name,
    parse::{derive_date_range, extract_order},
    record::{ExtractedFields, NOTE_SKIPPED, ParsedConferenceRecord, RawConferenceEntry},
    service::{Extractor, Generator, extractor::Provenance},
};

/// Per-run tally of how each entry was resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub extracted: usize,
    pub cached: usize,
    pub fallback: usize,
    pub skipped: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.extracted + self.cached + self.fallback + self.skipped
    }

    fn count(&mut self, provenance: Option<Provenance>) {
        match provenance {
            Some(Provenance::Service) => self.extracted += 1,
            Some(Provenance::Cache) => self.cached += 1,
            Some(Provenance::Fallback) => self.fallback += 1,
            Some(Provenance::Empty) | None => self.skipped += 1,
        }
    }
}

/// Drives entries through the gate, the extractor and the numeric parsers,
/// one at a time and in input order.
pub struct Pipeline<G> {
    extractor: Extractor<G>,
    /// Stream every Nth service answer to the display; 0 never does.
    show_every: usize,
    display: Box<dyn Write>,
    display_failed: bool,
    summary: RunSummary,
}

impl<G: Generator> Pipeline<G> {
    pub fn new(extractor: Extractor<G>) -> Self {
        Self {
            extractor,
            show_every: 0,
            display: Box::new(std::io::sink()),
            display_failed: false,
            summary: RunSummary::default(),
        }
    }

    /// Echo streamed answers to `display` for every `show_every`-th entry.
    pub fn with_display(mut self, show_every: usize, display: Box<dyn Write>) -> Self {
        self.show_every = show_every;
        self.display = display;
        self
    }

    pub fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Process every entry; the first service failure aborts the run.
    pub fn run<I>(&mut self, entries: I) -> anyhow::Result<Vec<ParsedConferenceRecord>>
    where
        I: IntoIterator<Item = RawConferenceEntry>,
    {
        let mut out = Vec::new();
        for (i, entry) in entries.into_iter().enumerate() {
            let show_stream = self.show_every > 0 && (i + 1) % self.show_every == 0;
            let record = self.process(entry, show_stream)?;
            out.push(record);
        }
        let cache = self.extractor.cache();
        if !cache.is_empty() {
            tracing::debug!(entries = cache.len(), "extraction cache size at end of run");
        }
        Ok(out)
    }

    pub fn process(
        &mut self,
        entry: RawConferenceEntry,
        show_stream: bool,
    ) -> anyhow::Result<ParsedConferenceRecord> {
        let raw = entry.raw_text.as_deref();
        tracing::info!(
            pid = entry.record_id,
            name_seq = entry.sequence_index,
            raw = raw.unwrap_or(""),
            "parsing conference"
        );

        let (fields, provenance) = if should_extract(raw) {
            let display = &mut self.display;
            let display_failed = &mut self.display_failed;
            let mut echo = |fragment: &str| {
                if show_stream {
                    let shown = write!(display, "{fragment}").and_then(|_| display.flush());
                    note_display_error(display_failed, shown);
                }
            };
            let (fields, provenance) = self
                .extractor
                .extract(raw, &mut echo)
                .with_context(|| {
                    format!(
                        "extraction failed for pid {} name_seq {}",
                        entry.record_id, entry.sequence_index
                    )
                })?;
            if show_stream && provenance != Provenance::Cache {
                let shown = writeln!(self.display);
                note_display_error(&mut self.display_failed, shown);
            }
            (fields, Some(provenance))
        } else {
            (skipped(raw), None)
        };
        self.summary.count(provenance);

        let dates = derive_date_range(&fields.conf_dates);
        let conf_order = extract_order(&fields.conf_name);

        tracing::info!(
            name = %fields.conf_name,
            place = %fields.conf_place,
            dates = %fields.conf_dates,
            order = ?conf_order,
            "parsed"
        );
        if !fields.note.is_empty() {
            tracing::info!(note = %fields.note, "note");
        }

        Ok(ParsedConferenceRecord {
            entry,
            fields,
            dates,
            conf_order,
        })
    }
}

/// The display is best effort: a failed write never stops the run, and only
/// the first failure is logged.
fn note_display_error(failed: &mut bool, result: std::io::Result<()>) {
    if let Err(error) = result {
        if !*failed {
            tracing::debug!(%error, "stream display stopped accepting output");
            *failed = true;
        }
    }
}

/// The fast path for entries the gate turned away.
fn skipped(raw: Option<&str>) -> ExtractedFields {
    ExtractedFields {
        conf_name: normalize_name(raw.unwrap_or("")),
        note: NOTE_SKIPPED.to_string(),
        ..ExtractedFields::default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        record::DateParts,
        service::{
            ExtractionCache,
            scripted::{FailingGenerator, ScriptedGenerator},
        },
    };

    fn entry(pid: i64, raw: Option<&str>) -> RawConferenceEntry {
        RawConferenceEntry {
            record_id: pid,
            sequence_index: 1,
            raw_text: raw.map(str::to_string),
        }
    }

    const ROBOTICS: &str = "5th Intl. CONFERENCE on Robotics, Stockholm, 2024-06-10/2024-06-12";
    const ROBOTICS_ANSWER: &str = r#"Here you go: {"conf_name": "5th Intl. Conference on Robotics", "conf_place": "Stockholm", "conf_dates": "2024-06-10/2024-06-12", "note": ""}"#;

    #[test]
    fn end_to_end_extraction() {
        let generator = ScriptedGenerator::answering(ROBOTICS_ANSWER);
        let mut pipeline = Pipeline::new(Extractor::new(&generator, ExtractionCache::new()));
        let rec = pipeline.process(entry(7, Some(ROBOTICS)), false).unwrap();

        assert_eq!(rec.entry.record_id, 7);
        assert_eq!(rec.conf_order, Some(5));
        assert_eq!(rec.fields.conf_place, "Stockholm");
        assert_eq!(
            rec.dates.begin,
            DateParts { day: Some(10), month: Some(6), year: Some(2024) }
        );
        assert_eq!(
            rec.dates.end,
            DateParts { day: Some(12), month: Some(6), year: Some(2024) }
        );
        assert_eq!(rec.fields.note, "");
    }

    #[test]
    fn gated_entries_take_the_fast_path() {
        let generator = ScriptedGenerator::answering(ROBOTICS_ANSWER);
        let mut pipeline = Pipeline::new(Extractor::new(&generator, ExtractionCache::new()));

        let undated = pipeline
            .process(entry(1, Some("third international WORKSHOP on flows")), false)
            .unwrap();
        assert_eq!(undated.fields.conf_name, "Third International WORKSHOP on Flows");
        assert_eq!(undated.fields.note, NOTE_SKIPPED);
        assert_eq!(undated.conf_order, Some(3));
        assert_eq!(undated.dates.to_columns(), [None; 6]);

        let absent = pipeline.process(entry(2, None), false).unwrap();
        assert_eq!(absent.fields.conf_name, "");
        assert_eq!(absent.fields.note, NOTE_SKIPPED);

        assert_eq!(generator.calls.get(), 0);
        assert_eq!(pipeline.summary().skipped, 2);
    }

    #[test]
    fn run_keeps_order_and_duplicates() {
        let generator = ScriptedGenerator::answering(ROBOTICS_ANSWER);
        let mut pipeline = Pipeline::new(Extractor::new(&generator, ExtractionCache::new()));
        let records = pipeline
            .run(vec![
                entry(3, Some(ROBOTICS)),
                entry(1, Some("short")),
                entry(2, Some(ROBOTICS)),
            ])
            .unwrap();

        let pids: Vec<i64> = records.iter().map(|r| r.entry.record_id).collect();
        assert_eq!(pids, vec![3, 1, 2]);
        assert_eq!(records[0].fields, records[2].fields);
        assert_eq!(generator.calls.get(), 1);
        assert_eq!(
            pipeline.summary(),
            RunSummary { extracted: 1, cached: 1, fallback: 0, skipped: 1 }
        );
        assert_eq!(pipeline.summary().total(), 3);
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn display_follows_show_every() {
        let generator = ScriptedGenerator::new(&["{\"conf_name\":", " \"A\"}"]);
        let buf = SharedBuf::default();
        let mut pipeline = Pipeline::new(Extractor::new(&generator, ExtractionCache::new()))
            .with_display(2, Box::new(buf.clone()));
        pipeline
            .run(vec![
                entry(1, Some("Meeting one, May 2004")),
                entry(2, Some("Meeting two, May 2004")),
                entry(3, Some("Meeting three, May 2004")),
            ])
            .unwrap();

        let shown = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(shown, "{\"conf_name\": \"A\"}\n");
        assert_eq!(generator.calls.get(), 3);
    }

    struct BrokenDisplay;

    impl Write for BrokenDisplay {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn broken_display_does_not_stop_the_run() {
        let generator = ScriptedGenerator::answering(ROBOTICS_ANSWER);
        let mut pipeline = Pipeline::new(Extractor::new(&generator, ExtractionCache::new()))
            .with_display(1, Box::new(BrokenDisplay));
        let records = pipeline
            .run(vec![entry(1, Some(ROBOTICS)), entry(2, Some("Meeting two, May 2004"))])
            .unwrap();
        assert_eq!(records.len(), 2);
        assert!(pipeline.display_failed);
        assert_eq!(generator.calls.get(), 2);
    }

    #[test]
    fn display_error_is_noted_once() {
        let mut failed = false;
        note_display_error(&mut failed, Ok(()));
        assert!(!failed);
        note_display_error(&mut failed, Err(std::io::ErrorKind::BrokenPipe.into()));
        note_display_error(&mut failed, Err(std::io::ErrorKind::BrokenPipe.into()));
        assert!(failed);
    }

    #[test]
    fn service_failure_aborts_the_run() {
        let mut pipeline = Pipeline::new(Extractor::new(FailingGenerator, ExtractionCache::new()));
        let err = pipeline
            .run(vec![entry(9, Some("ICAS 2004, Yokohama, Japan"))])
            .unwrap_err();
        assert!(err.to_string().contains("pid 9"));
        assert!(err.chain().any(|c| c.to_string().contains("status 503")));
    }
}
