const INSTRUCTION: &str = r#"You clean up conference metadata taken from a library catalogue.

Each input is one raw conference string mixing a name, a place and dates, for example:
"38th Annual ACM Symposium on User Interface Software and Technology, UIST 2025, Busan, Korea, September 28 - October 1, 2025"

Names and years:
- Some names legitimately contain an acronym with a year, such as "ECCOMAS 2004" or "(FCP 2003)". Keep those inside conf_name.
- When no explicit date range is given, such a year may serve as both begin and end year.

conf_name:
- Keep acronyms in uppercase exactly as written (AIAA, IEEE, IFAC).
- Title-case the remaining words. Keep and, or, of, on, in, for, to, the, a, an, at, by, with lowercase unless they come first or follow a colon.

conf_place:
- City or region plus country when present. No ALL CAPS: "Strasbourg, France", not "STRASBOURG, FRANCE".
- Use local diacritics only when certain ("Goteborg" -> "Göteborg"); otherwise keep plain ASCII.

conf_dates, always ISO-like:
- full range: "YYYY-MM-DD / YYYY-MM-DD" ("APR 27-29, 2004" -> "2004-04-27 / 2004-04-29")
- single day: "YYYY-MM-DD"
- month and year only: "YYYY-MM / YYYY-MM"
- year only, including a year that appears only in the name: "YYYY / YYYY"
- never invent a month or a day; use "" when nothing is known.

note: at most 20 words on how you read the string.

Answer with one JSON object and nothing else:
{
  "conf_name": "...",
  "conf_place": "...",
  "conf_dates": "2004-04-27 / 2004-04-29",
  "note": "..."
}
"#;

pub fn build_prompt(raw: &str) -> String {
    format!("{INSTRUCTION}\n\nRaw conference string:\n{raw}\n\nJSON:")
}
