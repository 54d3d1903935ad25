//! Strong's Hebrew and Greek lexicon importer.
//!
//! Source files are JavaScript dictionaries of the form
//! `var strongsGreekDictionary = {...};`; the object literal is extracted
//! with a regex and parsed as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use common::document::CorpusDocument;
use common::error::AppError;

#[allow(clippy::unwrap_used)]
static JS_DICTIONARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)var\s+strongs\w+Dictionary\s*=\s*(\{.+\});").unwrap());

#[allow(clippy::unwrap_used)]
static KJV_USAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\w\-\s]+)\s*\((\d+)\)").unwrap());

/// Which lexicon a dictionary file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexiconLanguage {
    Hebrew,
    Greek,
}

impl LexiconLanguage {
    fn as_str(self) -> &'static str {
        match self {
            LexiconLanguage::Hebrew => "hebrew",
            LexiconLanguage::Greek => "greek",
        }
    }
}

/// One dictionary entry; every field is optional in the source data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LexiconEntry {
    #[serde(default)]
    pub lemma: String,
    #[serde(default)]
    pub xlit: String,
    #[serde(default)]
    pub translit: String,
    #[serde(default)]
    pub pron: String,
    #[serde(default)]
    pub strongs_def: String,
    #[serde(default)]
    pub kjv_def: String,
    #[serde(default)]
    pub derivation: String,
}

impl LexiconEntry {
    fn transliteration(&self, language: LexiconLanguage) -> &str {
        match language {
            LexiconLanguage::Hebrew => &self.xlit,
            LexiconLanguage::Greek => &self.translit,
        }
    }
}

pub struct LexiconImporter {
    hebrew_file: PathBuf,
    greek_file: PathBuf,
}

impl LexiconImporter {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            hebrew_file: data_dir.join("hebrew").join("strongs-hebrew-dictionary.js"),
            greek_file: data_dir.join("greek").join("strongs-greek-dictionary.js"),
        }
    }

    pub fn load_hebrew(&self) -> Result<Vec<CorpusDocument>, AppError> {
        self.load_language(&self.hebrew_file, LexiconLanguage::Hebrew)
    }

    pub fn load_greek(&self) -> Result<Vec<CorpusDocument>, AppError> {
        self.load_language(&self.greek_file, LexiconLanguage::Greek)
    }

    /// Parses both lexicons, Hebrew first.
    pub fn load_all(&self) -> Result<Vec<CorpusDocument>, AppError> {
        let mut documents = self.load_hebrew()?;
        let mut greek = self.load_greek()?;
        let hebrew_count = documents.len();
        documents.append(&mut greek);
        info!(
            total = documents.len(),
            hebrew = hebrew_count,
            greek = documents.len() - hebrew_count,
            "parsed lexicon entries"
        );
        Ok(documents)
    }

    fn load_language(
        &self,
        file: &Path,
        language: LexiconLanguage,
    ) -> Result<Vec<CorpusDocument>, AppError> {
        let dictionary = parse_js_dictionary(file)?;
        let documents = dictionary
            .into_iter()
            .map(|(strong_id, entry)| entry_to_document(&strong_id, &entry, language))
            .collect();
        Ok(documents)
    }
}

/// Extracts and parses the object literal embedded in a dictionary file.
pub fn parse_js_dictionary(js_file: &Path) -> Result<BTreeMap<String, LexiconEntry>, AppError> {
    if !js_file.exists() {
        return Err(AppError::SourceData(format!(
            "Dictionary file not found: {}",
            js_file.display()
        )));
    }

    let content = std::fs::read_to_string(js_file)?;
    let Some(capture) = JS_DICTIONARY.captures(&content).and_then(|c| c.get(1)) else {
        return Err(AppError::SourceData(format!(
            "Could not extract dictionary from {}",
            js_file.display()
        )));
    };

    let dictionary: BTreeMap<String, LexiconEntry> = serde_json::from_str(capture.as_str())
        .map_err(|err| {
            AppError::SourceData(format!(
                "Failed to parse JSON from {}: {err}",
                js_file.display()
            ))
        })?;
    Ok(dictionary)
}

/// Parses a KJV usage string like `"father (1205), chief (2)"` into word
/// counts; `None` when nothing parses.
pub fn parse_kjv_usage(kjv_def: &str) -> Option<BTreeMap<String, u64>> {
    if kjv_def.is_empty() {
        return None;
    }

    let mut usage = BTreeMap::new();
    for capture in KJV_USAGE.captures_iter(kjv_def) {
        if let (Some(word), Some(count)) = (capture.get(1), capture.get(2)) {
            if let Ok(count) = count.as_str().parse::<u64>() {
                usage.insert(word.as_str().trim().to_string(), count);
            }
        }
    }

    if usage.is_empty() {
        None
    } else {
        Some(usage)
    }
}

/// Converts one lexicon entry to the uniform document shape.
pub fn entry_to_document(
    strong_id: &str,
    entry: &LexiconEntry,
    language: LexiconLanguage,
) -> CorpusDocument {
    let transliteration = entry.transliteration(language);

    let title_part = match (transliteration.is_empty(), entry.lemma.is_empty()) {
        (false, false) => format!("{} ({})", transliteration, entry.lemma),
        (false, true) => transliteration.to_string(),
        (true, false) => entry.lemma.clone(),
        (true, true) => strong_id.to_string(),
    };

    let mut parts: Vec<String> = Vec::new();
    if !entry.strongs_def.is_empty() {
        parts.push(format!("Definition: {}", entry.strongs_def));
    }
    if !entry.derivation.is_empty() {
        parts.push(format!("Etymology: {}", entry.derivation));
    }
    if !entry.kjv_def.is_empty() {
        parts.push(format!("KJV translations: {}", entry.kjv_def));
    }
    if language == LexiconLanguage::Hebrew && !entry.pron.is_empty() {
        parts.push(format!("Pronunciation: {}", entry.pron));
    }

    let content = if parts.is_empty() {
        if entry.strongs_def.is_empty() {
            "No definition available.".to_string()
        } else {
            entry.strongs_def.clone()
        }
    } else {
        parts.join("\n\n")
    };

    let mut metadata = serde_json::Map::new();
    metadata.insert("strong_id".to_string(), json!(strong_id));
    metadata.insert("language".to_string(), json!(language.as_str()));
    let mut insert_nonempty = |key: &str, value: &str| {
        if !value.is_empty() {
            metadata.insert(key.to_string(), json!(value));
        }
    };
    insert_nonempty("lemma", &entry.lemma);
    insert_nonempty("transliteration", transliteration);
    if language == LexiconLanguage::Hebrew {
        insert_nonempty("pronunciation", &entry.pron);
    }
    insert_nonempty("definition", &entry.strongs_def);
    insert_nonempty("derivation", &entry.derivation);
    insert_nonempty("kjv_def", &entry.kjv_def);
    if let Some(usage) = parse_kjv_usage(&entry.kjv_def) {
        metadata.insert("kjv_usage".to_string(), json!(usage));
    }

    CorpusDocument {
        title: format!("Strong's {strong_id} - {title_part}"),
        content,
        domain: "lexicon/strongs".to_string(),
        metadata: serde_json::Value::Object(metadata),
    }
}
