use crate::{
    normalize::{normalize_name, normalize_place},
    record::{ExtractedFields, NOTE_BAD_JSON, NOTE_NO_JSON},
    service::{
        ExtractionCache, Generator, ServiceError,
        prompt::build_prompt,
        recover::{Recovery, field_text, recover},
    },
};

/// Where an extraction result came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    Service,
    Cache,
    Fallback,
    Empty,
}

/// Memoized structured extraction on top of a [`Generator`].
pub struct Extractor<G> {
    generator: G,
    cache: ExtractionCache,
}

impl<G: Generator> Extractor<G> {
    pub fn new(generator: G, cache: ExtractionCache) -> Self {
        Self { generator, cache }
    }

    pub fn cache(&self) -> &ExtractionCache {
        &self.cache
    }

    /// Extract name, place and dates from `raw`, along with where the result
    /// came from.
    ///
    /// Cache hits never reach the service and never invoke `on_fragment`.
    /// Answers without a usable JSON object are replaced by a fallback record
    /// that is cached too, so a string the model cannot handle costs one call.
    pub fn extract(
        &mut self,
        raw: Option<&str>,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<(ExtractedFields, Provenance), ServiceError> {
        let Some(raw) = raw else {
            return Ok((ExtractedFields::default(), Provenance::Empty));
        };

        if let Some(hit) = self.cache.get(raw) {
            tracing::debug!(raw, "extraction cache hit");
            return Ok((hit, Provenance::Cache));
        }

        let answer = self.generator.generate(&build_prompt(raw), on_fragment)?;

        let (fields, provenance) = match recover(&answer) {
            Recovery::Parsed(obj) => (
                ExtractedFields {
                    conf_name: normalize_name(&field_text(&obj, "conf_name")),
                    conf_place: normalize_place(&field_text(&obj, "conf_place")),
                    conf_dates: field_text(&obj, "conf_dates"),
                    note: field_text(&obj, "note"),
                },
                Provenance::Service,
            ),
            Recovery::NoCandidate => {
                tracing::warn!(raw, "no JSON object in extraction answer");
                (ExtractedFields::fallback(raw, NOTE_NO_JSON), Provenance::Fallback)
            }
            Recovery::Malformed(error) => {
                tracing::warn!(raw, %error, "extraction answer is not valid JSON");
                (ExtractedFields::fallback(raw, NOTE_BAD_JSON), Provenance::Fallback)
            }
        };

        self.cache.insert(raw, fields.clone());
        Ok((fields, provenance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::scripted::{FailingGenerator, ScriptedGenerator};

    const ANSWER: &str = r#"{"conf_name": "5th intl. conference on robotics", "conf_place": "STOCKHOLM, SWEDEN", "conf_dates": "2024-06-10 / 2024-06-12", "note": null}"#;

    #[test]
    fn parsed_answer_is_normalized() {
        let generator = ScriptedGenerator::answering(ANSWER);
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let (fields, _) = extractor.extract(Some("raw"), &mut |_| {}).unwrap();
        assert_eq!(
            fields,
            ExtractedFields {
                conf_name: "5th Intl. Conference on Robotics".into(),
                conf_place: "Stockholm, Sweden".into(),
                conf_dates: "2024-06-10 / 2024-06-12".into(),
                note: String::new(),
            }
        );
        let prompt = generator.last_prompt.borrow().clone().unwrap();
        assert!(prompt.contains("Raw conference string:\nraw\n"));
    }

    #[test]
    fn absent_input_is_empty_and_uncached() {
        let generator = ScriptedGenerator::answering(ANSWER);
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let (fields, provenance) = extractor.extract(None, &mut |_| {}).unwrap();
        assert_eq!(fields, ExtractedFields::default());
        assert_eq!(provenance, Provenance::Empty);
        assert_eq!(generator.calls.get(), 0);
        assert!(extractor.cache().is_empty());
    }

    #[test]
    fn repeated_input_calls_the_service_once() {
        let generator = ScriptedGenerator::new(&["{\"conf_name\": \"icas\",", " \"note\": \"ok\"}"]);
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let mut shown = Vec::new();

        let (first, _) = extractor
            .extract(Some("ICAS 2004"), &mut |f| shown.push(f.to_string()))
            .unwrap();
        let (mut second, _) = extractor
            .extract(Some("ICAS 2004"), &mut |f| shown.push(f.to_string()))
            .unwrap();
        assert_eq!(generator.calls.get(), 1);
        assert_eq!(first, second);
        assert_eq!(shown.len(), 2, "cache hit must not replay the stream");

        second.conf_name.clear();
        second.note.push_str(" (edited)");
        let (third, _) = extractor.extract(Some("ICAS 2004"), &mut |_| {}).unwrap();
        assert_eq!(third, first);
        assert_eq!(third.conf_name, "Icas");
    }

    #[test]
    fn answer_without_braces_falls_back_to_raw() {
        let generator = ScriptedGenerator::answering("I cannot help with that.");
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let raw = "  weird RAW text, 2004 ";
        let (fields, _) = extractor.extract(Some(raw), &mut |_| {}).unwrap();
        assert_eq!(fields.conf_name, raw);
        assert_eq!(fields.conf_place, "");
        assert_eq!(fields.conf_dates, "");
        assert_eq!(fields.note, NOTE_NO_JSON);

        extractor.extract(Some(raw), &mut |_| {}).unwrap();
        assert_eq!(generator.calls.get(), 1, "fallbacks are cached");
    }

    #[test]
    fn broken_json_has_its_own_tag() {
        let generator = ScriptedGenerator::answering("{\"conf_name\": \"X\",}");
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let (fields, provenance) = extractor
            .extract(Some("X 2004"), &mut |_| {})
            .unwrap();
        assert_eq!(fields.note, NOTE_BAD_JSON);
        assert_eq!(fields.conf_name, "X 2004");
        assert_eq!(provenance, Provenance::Fallback);
        assert_eq!(extractor.cache().len(), 1);
    }

    #[test]
    fn provenance_of_hits() {
        let generator = ScriptedGenerator::answering(ANSWER);
        let mut extractor = Extractor::new(&generator, ExtractionCache::new());
        let (_, p1) = extractor.extract(Some("a"), &mut |_| {}).unwrap();
        let (_, p2) = extractor.extract(Some("a"), &mut |_| {}).unwrap();
        assert_eq!((p1, p2), (Provenance::Service, Provenance::Cache));
    }

    #[test]
    fn transport_failure_propagates_and_is_not_cached() {
        let mut extractor = Extractor::new(FailingGenerator, ExtractionCache::new());
        let err = extractor.extract(Some("ICAS 2004"), &mut |_| {}).unwrap_err();
        assert!(matches!(err, ServiceError::Status { status: 503 }));
        assert!(extractor.cache().is_empty());
    }
}
