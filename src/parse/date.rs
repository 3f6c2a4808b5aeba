use crate::{
    pattern::ISO_RANGE,
    record::{DateParts, DateRange},
};

/// Parse a `YYYY[-MM[-DD]]` fragment.
///
/// The year must be numeric or nothing is returned; month and day are filled
/// only when present.
pub fn parse_date_components(fragment: &str) -> DateParts {
    let mut parts = fragment.split('-');
    let Some(year) = parts.next().and_then(|y| y.trim().parse().ok()) else {
        return DateParts::default();
    };
    let month = parts.next().and_then(|m| m.trim().parse().ok());
    let day = parts.next().and_then(|d| d.trim().parse().ok());
    DateParts {
        day,
        month,
        year: Some(year),
    }
}

/// Turn a normalized `conf_dates` value into begin and end parts.
///
/// A single date is a one-day event, so the end mirrors the begin. The two
/// sides of a range are parsed independently: `2024-06-10/2024-07` yields an
/// end without a day rather than borrowing one from the begin.
pub fn derive_date_range(conf_dates: &str) -> DateRange {
    let text = conf_dates.trim();
    if text.is_empty() {
        return DateRange::default();
    }
    let Some(caps) = ISO_RANGE.captures(text) else {
        return DateRange::default();
    };
    let Some(start) = caps.name("start") else {
        return DateRange::default();
    };
    let end = caps.name("end").unwrap_or(start);

    DateRange {
        begin: parse_date_components(start.as_str()),
        end: parse_date_components(end.as_str()),
    }
}
