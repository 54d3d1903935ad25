//! Chunk document assembly: title, content, hierarchical path, metadata.

use serde::{Deserialize, Serialize};

use common::canon::{Testament, Verse};
use common::document::CorpusDocument;
use common::error::AppError;

use super::tokenizer::TokenCounter;

/// Fixed provenance block attached to every verse chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceProvenance {
    #[serde(rename = "type")]
    pub kind: String,
    pub origin: String,
    pub url: String,
    pub format: String,
}

impl Default for SourceProvenance {
    fn default() -> Self {
        Self {
            kind: "corpus".to_string(),
            origin: "scrollmapper/bible_databases".to_string(),
            url: "https://github.com/scrollmapper/bible_databases".to_string(),
            format: "csv".to_string(),
        }
    }
}

/// Navigation and sizing facts derived from the chunk itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkStructure {
    pub path: String,
    pub book_number: u8,
    pub total_verses: usize,
    pub token_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub book: String,
    pub book_id: u8,
    pub chapter: u32,
    pub verse_start: u32,
    pub verse_end: u32,
    pub testament: Testament,
    pub translation: String,
    pub language: String,
    pub structure: ChunkStructure,
    pub source: SourceProvenance,
}

/// One or more consecutive same-chapter verses packaged as a retrievable
/// document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkDocument {
    pub title: String,
    pub content: String,
    pub domain: String,
    pub metadata: ChunkMetadata,
}

impl ChunkDocument {
    /// Converts into the uniform wire shape shared by all importers.
    pub fn into_document(self) -> Result<CorpusDocument, AppError> {
        let metadata = serde_json::to_value(&self.metadata)?;
        Ok(CorpusDocument {
            title: self.title,
            content: self.content,
            domain: self.domain,
            metadata,
        })
    }
}

/// Builds a chunk document from a non-empty run of same-chapter verses.
///
/// Empty input is a caller bug, not a data error.
pub fn build_chunk(
    verses: &[&Verse],
    translation: &str,
    counter: &dyn TokenCounter,
) -> Result<ChunkDocument, AppError> {
    let (Some(first), Some(last)) = (verses.first(), verses.last()) else {
        return Err(AppError::Contract(
            "Cannot create chunk from empty verse list".to_string(),
        ));
    };

    let verse_range = if verses.len() == 1 {
        first.verse.to_string()
    } else {
        format!("{}-{}", first.verse, last.verse)
    };
    let title = format!(
        "{} {}:{} ({})",
        first.book_name, first.chapter, verse_range, translation
    );

    let content = verses
        .iter()
        .map(|verse| format!("{} {}", verse.verse, verse.text))
        .collect::<Vec<_>>()
        .join("\n");

    // Recomputed from the assembled content so the stored count always
    // matches what a consumer would measure.
    let token_count = counter.count(&content);

    let path = format!(
        "{} > {} > Chapter {} > Verses {}",
        translation, first.book_name, first.chapter, verse_range
    );

    Ok(ChunkDocument {
        title,
        content,
        domain: format!("bible/{}", translation.to_lowercase()),
        metadata: ChunkMetadata {
            book: first.book_name.clone(),
            book_id: first.book_id,
            chapter: first.chapter,
            verse_start: first.verse,
            verse_end: last.verse,
            testament: first.testament(),
            translation: translation.to_string(),
            language: "en".to_string(),
            structure: ChunkStructure {
                path,
                book_number: first.book_id,
                total_verses: verses.len(),
                token_count,
            },
            source: SourceProvenance::default(),
        },
    })
}
