//! Text-level utilities for SWORD/OSIS source material: markup stripping,
//! Strong's number extraction, and book-name normalization.

use std::sync::LazyLock;

use regex::Regex;

use common::canon::Testament;
use common::error::AppError;

#[allow(clippy::unwrap_used)]
static OSIS_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

#[allow(clippy::unwrap_used)]
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[allow(clippy::unwrap_used)]
static STRONGS_LEMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"lemma="strong:([HG]\d+)""#).unwrap());

/// Old Testament books in normalized (SWORD) naming.
const OT_BOOKS: [&str; 39] = [
    "Genesis",
    "Exodus",
    "Leviticus",
    "Numbers",
    "Deuteronomy",
    "Joshua",
    "Judges",
    "Ruth",
    "1 Samuel",
    "2 Samuel",
    "1 Kings",
    "2 Kings",
    "1 Chronicles",
    "2 Chronicles",
    "Ezra",
    "Nehemiah",
    "Esther",
    "Job",
    "Psalms",
    "Proverbs",
    "Ecclesiastes",
    "Song of Songs",
    "Isaiah",
    "Jeremiah",
    "Lamentations",
    "Ezekiel",
    "Daniel",
    "Hosea",
    "Joel",
    "Amos",
    "Obadiah",
    "Jonah",
    "Micah",
    "Nahum",
    "Habakkuk",
    "Zephaniah",
    "Haggai",
    "Zechariah",
    "Malachi",
];

/// New Testament books in normalized (SWORD) naming.
const NT_BOOKS: [&str; 27] = [
    "Matthew",
    "Mark",
    "Luke",
    "John",
    "Acts",
    "Romans",
    "1 Corinthians",
    "2 Corinthians",
    "Galatians",
    "Ephesians",
    "Philippians",
    "Colossians",
    "1 Thessalonians",
    "2 Thessalonians",
    "1 Timothy",
    "2 Timothy",
    "Titus",
    "Philemon",
    "Hebrews",
    "James",
    "1 Peter",
    "2 Peter",
    "1 John",
    "2 John",
    "3 John",
    "Jude",
    "Revelation",
];

/// Strips OSIS XML markup and collapses whitespace.
pub fn clean_osis_markup(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let stripped = OSIS_TAG.replace_all(text, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

/// Extracts Strong's numbers from OSIS `lemma="strong:H####"` attributes,
/// deduplicated in order of first appearance.
pub fn extract_strongs_numbers(text: &str) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for capture in STRONGS_LEMMA.captures_iter(text) {
        if let Some(number) = capture.get(1) {
            let number = number.as_str();
            if !seen.iter().any(|existing| existing == number) {
                seen.push(number.to_string());
            }
        }
    }
    seen
}

/// Normalizes a canon book name to SWORD form: Roman numerals become
/// arabic, plus a handful of renamed books.
pub fn normalize_book_name(name: &str) -> String {
    match name {
        "Song of Solomon" => return "Song of Songs".to_string(),
        "Revelation of John" => return "Revelation".to_string(),
        "Psalm" => return "Psalms".to_string(),
        _ => {}
    }

    if let Some(rest) = name.strip_prefix("III ") {
        return format!("3 {rest}");
    }
    if let Some(rest) = name.strip_prefix("II ") {
        return format!("2 {rest}");
    }
    if let Some(rest) = name.strip_prefix("I ") {
        return format!("1 {rest}");
    }
    name.to_string()
}

/// Testament of a book name in either canon or SWORD naming; unknown
/// names are a source-data error.
pub fn testament_of(book_name: &str) -> Result<Testament, AppError> {
    let normalized = normalize_book_name(book_name);
    if OT_BOOKS.contains(&normalized.as_str()) {
        Ok(Testament::OT)
    } else if NT_BOOKS.contains(&normalized.as_str()) {
        Ok(Testament::NT)
    } else {
        Err(AppError::SourceData(format!(
            "Unknown book: {book_name} (normalized: {normalized})"
        )))
    }
}
