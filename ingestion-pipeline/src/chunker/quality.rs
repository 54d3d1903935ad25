//! Token-distribution statistics over a full chunking pass.

use serde::Serialize;

use common::canon::Verse;
use common::error::AppError;

use super::{VerseChunker, FILL_THRESHOLD};

#[derive(Debug, Clone, Default, Serialize)]
pub struct TokenStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkingQualityReport {
    pub total_verses: usize,
    pub total_chunks: usize,
    pub verses_per_chunk_avg: f64,
    pub token_stats: TokenStats,
    pub chunks_below_min: usize,
    pub chunks_above_max: usize,
    pub chunks_in_target_range: usize,
}

impl VerseChunker {
    /// Runs the chunker once and aggregates token statistics; an empty
    /// corpus yields zero-valued stats.
    pub fn analyze(
        &self,
        verses: &[Verse],
        translation: &str,
    ) -> Result<ChunkingQualityReport, AppError> {
        let chunks = self.chunk_verses(verses, translation)?;
        let token_counts: Vec<usize> = chunks
            .iter()
            .map(|chunk| chunk.metadata.structure.token_count)
            .collect();

        let config = self.config();
        let target = config.target_chunk_tokens as f64;
        let range_low = target * FILL_THRESHOLD;
        let range_high = target * 1.2;

        let total_chunks = chunks.len();
        let token_sum: usize = token_counts.iter().sum();

        Ok(ChunkingQualityReport {
            total_verses: verses.len(),
            total_chunks,
            verses_per_chunk_avg: if total_chunks == 0 {
                0.0
            } else {
                verses.len() as f64 / total_chunks as f64
            },
            token_stats: TokenStats {
                min: token_counts.iter().copied().min().unwrap_or(0),
                max: token_counts.iter().copied().max().unwrap_or(0),
                avg: if total_chunks == 0 {
                    0.0
                } else {
                    token_sum as f64 / total_chunks as f64
                },
            },
            chunks_below_min: token_counts
                .iter()
                .filter(|count| **count < config.min_chunk_tokens)
                .count(),
            chunks_above_max: token_counts
                .iter()
                .filter(|count| **count > config.max_chunk_tokens)
                .count(),
            chunks_in_target_range: token_counts
                .iter()
                .filter(|count| {
                    let tokens = **count as f64;
                    tokens >= range_low && tokens <= range_high
                })
                .count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::chunker::{ChunkingConfig, TokenCounter};

    struct WordCounter;

    impl TokenCounter for WordCounter {
        fn count(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }
    }

    fn chunker() -> VerseChunker {
        VerseChunker::new(Arc::new(WordCounter), ChunkingConfig::default()).expect("valid config")
    }

    fn verse_with_words(chapter: u32, number: u32, words: usize) -> Verse {
        Verse {
            book_id: 19,
            book_name: "Psalms".to_string(),
            chapter,
            verse: number,
            text: vec!["word"; words].join(" "),
        }
    }

    #[test]
    fn empty_corpus_yields_zeroed_report() {
        let report = chunker().analyze(&[], "KJV").expect("report");

        assert_eq!(report.total_verses, 0);
        assert_eq!(report.total_chunks, 0);
        assert_eq!(report.verses_per_chunk_avg, 0.0);
        assert_eq!(report.token_stats.min, 0);
        assert_eq!(report.token_stats.max, 0);
        assert_eq!(report.token_stats.avg, 0.0);
        assert_eq!(report.chunks_in_target_range, 0);
    }

    #[test]
    fn aggregates_token_distribution() {
        // Two chapters: one tiny (below min), one inside the target band.
        let mut verses = vec![verse_with_words(1, 1, 10)];
        for number in 1..=5 {
            verses.push(verse_with_words(2, number, 60));
        }

        let report = chunker().analyze(&verses, "KJV").expect("report");

        assert_eq!(report.total_verses, 6);
        assert_eq!(report.total_chunks, 2);
        assert_eq!(report.verses_per_chunk_avg, 3.0);
        // Chapter 1 chunk: 10 words + 1 verse-number token.
        assert_eq!(report.token_stats.min, 11);
        // Chapter 2 chunk: 5 * (60 + 1).
        assert_eq!(report.token_stats.max, 305);
        assert_eq!(report.chunks_below_min, 1);
        assert_eq!(report.chunks_above_max, 0);
        // 305 sits inside [280, 420].
        assert_eq!(report.chunks_in_target_range, 1);
    }
}
