//! Token counting behind a trait seam so tests can substitute a
//! deterministic counter.

use std::sync::Arc;

use tiktoken_rs::{cl100k_base, CoreBPE};

use common::error::AppError;

/// Counts sub-word tokens in a string. Pure and deterministic; an empty
/// string always counts zero.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// Production counter over the `cl100k_base` vocabulary (GPT-4 family).
///
/// The encoding table is read-only, so one instance can be shared freely.
#[derive(Clone)]
pub struct TiktokenCounter {
    bpe: Arc<CoreBPE>,
}

impl TiktokenCounter {
    pub fn new() -> Result<Self, AppError> {
        let bpe = cl100k_base().map_err(|err| AppError::Tokenizer(err.to_string()))?;
        Ok(Self { bpe: Arc::new(bpe) })
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_ordinary(text).len()
    }
}
