//! Parser for the scrollmapper Bible CSV format.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::Deserialize;

use common::canon::{book_id, Verse};
use common::error::AppError;

/// Header columns the verses CSV must carry.
const REQUIRED_COLUMNS: [&str; 4] = ["Book", "Chapter", "Verse", "Text"];

#[derive(Debug, Deserialize)]
struct VerseRow {
    #[serde(rename = "Book")]
    book: String,
    #[serde(rename = "Chapter")]
    chapter: u32,
    #[serde(rename = "Verse")]
    verse: u32,
    #[serde(rename = "Text")]
    text: String,
}

/// Parses a verses CSV into canonical order.
///
/// Unknown book names and a malformed header are fatal for the whole file;
/// rows outside `filter_books` are skipped.
pub fn parse_bible_csv(
    verses_path: &Path,
    translation: &str,
    filter_books: Option<&[String]>,
) -> Result<Vec<Verse>, AppError> {
    if !verses_path.exists() {
        return Err(AppError::SourceData(format!(
            "Verses CSV not found: {}",
            verses_path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(verses_path)?;
    check_header(&mut reader, verses_path)?;

    let mut verses: Vec<Verse> = Vec::new();
    let mut unknown_books: BTreeSet<String> = BTreeSet::new();

    for row in reader.deserialize::<VerseRow>() {
        let row = row?;

        if let Some(filter) = filter_books {
            if !filter.iter().any(|name| *name == row.book) {
                continue;
            }
        }

        let Some(id) = book_id(&row.book) else {
            unknown_books.insert(row.book);
            continue;
        };

        verses.push(Verse {
            book_id: id,
            book_name: row.book,
            chapter: row.chapter,
            verse: row.verse,
            text: row.text.trim().to_string(),
        });
    }

    if !unknown_books.is_empty() {
        let names: Vec<String> = unknown_books.into_iter().collect();
        return Err(AppError::SourceData(format!(
            "Unknown books found in {translation} CSV: {}. \
             These books are not in the standard 66-book canon.",
            names.join(", ")
        )));
    }

    if verses.is_empty() {
        return Err(AppError::SourceData(format!(
            "No verses found in {}",
            verses_path.display()
        )));
    }

    verses.sort();
    Ok(verses)
}

fn check_header(reader: &mut csv::Reader<std::fs::File>, path: &Path) -> Result<(), AppError> {
    let headers = reader.headers()?;
    let present: BTreeSet<&str> = headers.iter().collect();
    if REQUIRED_COLUMNS.iter().any(|col| !present.contains(col)) {
        return Err(AppError::SourceData(format!(
            "Invalid CSV format in {}. Expected columns: Book, Chapter, Verse, Text",
            path.display()
        )));
    }
    Ok(())
}

/// Distinct book names present in a verses CSV, sorted.
pub fn get_available_books(verses_path: &Path) -> Result<Vec<String>, AppError> {
    if !verses_path.exists() {
        return Err(AppError::SourceData(format!(
            "Verses CSV not found: {}",
            verses_path.display()
        )));
    }

    let mut reader = csv::Reader::from_path(verses_path)?;
    check_header(&mut reader, verses_path)?;

    let mut books: BTreeSet<String> = BTreeSet::new();
    for row in reader.deserialize::<VerseRow>() {
        books.insert(row?.book);
    }
    Ok(books.into_iter().collect())
}

/// Aggregate view of a parsed corpus, with per-verse issues collected
/// instead of raised.
#[derive(Debug, Clone)]
pub struct VerseIntegrityReport {
    pub total_verses: usize,
    pub books_found: usize,
    pub chapters_found: usize,
    pub books: Vec<String>,
    pub issues: Vec<String>,
}

/// Scans parsed verses for data-quality issues.
pub fn validate_verse_integrity(verses: &[Verse]) -> VerseIntegrityReport {
    let mut issues: Vec<String> = Vec::new();
    let mut chapters_by_book: BTreeMap<&str, BTreeSet<u32>> = BTreeMap::new();

    for verse in verses {
        chapters_by_book
            .entry(verse.book_name.as_str())
            .or_default()
            .insert(verse.chapter);

        if verse.text.trim().is_empty() {
            issues.push(format!("Empty text in {}", verse.reference()));
        }
    }

    VerseIntegrityReport {
        total_verses: verses.len(),
        books_found: chapters_by_book.len(),
        chapters_found: chapters_by_book.values().map(BTreeSet::len).sum(),
        books: chapters_by_book.keys().map(ToString::to_string).collect(),
        issues,
    }
}
