//! Adaptive verse chunking for retrieval-sized documents.
//!
//! Verses are grouped per chapter, then packed greedily against a token
//! budget: accumulate toward the target, flush early only once the
//! accumulator is at least 80% full, and emit oversized verses standalone.
//! Chunks never cross chapter boundaries.

mod document;
mod group;
mod quality;
mod tokenizer;

use std::sync::Arc;

pub use document::{build_chunk, ChunkDocument, ChunkMetadata, ChunkStructure, SourceProvenance};
pub use group::group_by_chapter;
pub use quality::{ChunkingQualityReport, TokenStats};
pub use tokenizer::{TiktokenCounter, TokenCounter};

use common::canon::Verse;
use common::error::AppError;
use common::utils::config::AppConfig;

/// Occupancy ratio of the target below which the accumulator keeps growing
/// past the target instead of flushing a too-small chunk.
pub const FILL_THRESHOLD: f64 = 0.8;

/// Token-budget policy for chunk packing.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub target_chunk_tokens: usize,
    pub min_chunk_tokens: usize,
    pub max_chunk_tokens: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            target_chunk_tokens: 350,
            min_chunk_tokens: 50,
            max_chunk_tokens: 500,
        }
    }
}

impl From<&AppConfig> for ChunkingConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            target_chunk_tokens: config.target_chunk_tokens,
            min_chunk_tokens: config.min_chunk_tokens,
            max_chunk_tokens: config.max_chunk_tokens,
        }
    }
}

impl ChunkingConfig {
    /// Budgets must satisfy `min < target < max`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_chunk_tokens < self.target_chunk_tokens
            && self.target_chunk_tokens < self.max_chunk_tokens
        {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "chunk token budgets must satisfy min < target < max, got {} / {} / {}",
                self.min_chunk_tokens, self.target_chunk_tokens, self.max_chunk_tokens
            )))
        }
    }

    fn fill_threshold_reached(&self, current_tokens: usize) -> bool {
        current_tokens as f64 >= self.target_chunk_tokens as f64 * FILL_THRESHOLD
    }
}

/// Packs canonically ordered verses into chunk documents.
pub struct VerseChunker {
    counter: Arc<dyn TokenCounter>,
    config: ChunkingConfig,
}

impl VerseChunker {
    pub fn new(counter: Arc<dyn TokenCounter>, config: ChunkingConfig) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self { counter, config })
    }

    /// Production chunker: cl100k_base tokenizer, default budgets.
    pub fn with_defaults() -> Result<Self, AppError> {
        Self::new(Arc::new(TiktokenCounter::new()?), ChunkingConfig::default())
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Chunks a whole corpus, chapter by chapter, in emission order.
    pub fn chunk_verses(
        &self,
        verses: &[Verse],
        translation: &str,
    ) -> Result<Vec<ChunkDocument>, AppError> {
        let mut chunks = Vec::new();
        for chapter_verses in group_by_chapter(verses) {
            self.chunk_chapter(chapter_verses, translation, &mut chunks)?;
        }
        Ok(chunks)
    }

    /// Packs one chapter. Greedy single pass:
    /// oversized verse -> flush accumulator, emit standalone;
    /// target exceeded -> flush only when the accumulator is >= 80% full,
    /// otherwise grow past the target; trailing accumulator flushes at end.
    fn chunk_chapter(
        &self,
        verses: &[Verse],
        translation: &str,
        chunks: &mut Vec<ChunkDocument>,
    ) -> Result<(), AppError> {
        if verses.is_empty() {
            return Ok(());
        }

        let mut current_chunk: Vec<&Verse> = Vec::new();
        let mut current_tokens = 0usize;

        for verse in verses {
            let verse_tokens = self.counter.count(&verse.text);

            // A verse beyond the hard ceiling becomes its own chunk.
            if verse_tokens > self.config.max_chunk_tokens {
                if !current_chunk.is_empty() {
                    chunks.push(build_chunk(&current_chunk, translation, self.counter())?);
                    current_chunk.clear();
                    current_tokens = 0;
                }
                chunks.push(build_chunk(&[verse], translation, self.counter())?);
                continue;
            }

            if current_tokens + verse_tokens > self.config.target_chunk_tokens {
                if self.config.fill_threshold_reached(current_tokens) {
                    chunks.push(build_chunk(&current_chunk, translation, self.counter())?);
                    current_chunk.clear();
                    current_chunk.push(verse);
                    current_tokens = verse_tokens;
                } else {
                    // Below the fill threshold: growing past the target
                    // beats emitting a fragment.
                    current_chunk.push(verse);
                    current_tokens += verse_tokens;
                }
            } else {
                current_chunk.push(verse);
                current_tokens += verse_tokens;
            }
        }

        if !current_chunk.is_empty() {
            chunks.push(build_chunk(&current_chunk, translation, self.counter())?);
        }

        Ok(())
    }
}
