//! The uniform wire shape every importer produces.

use serde::{Deserialize, Serialize};

/// A document ready for the Prism corpus import API.
///
/// Domain-specific fields (lexicon usage counts, place coordinates, chunk
/// structure) live inside `metadata`; the four top-level fields are the
/// contract shared by every importer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub title: String,
    pub content: String,
    pub domain: String,
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_flat_top_level_fields() {
        let document = CorpusDocument {
            title: "Genesis 1:1 (KJV)".to_string(),
            content: "1 In the beginning God created the heaven and the earth.".to_string(),
            domain: "bible/kjv".to_string(),
            metadata: serde_json::json!({ "book": "Genesis" }),
        };

        let value = serde_json::to_value(&document).expect("document serializes");
        assert_eq!(value["title"], "Genesis 1:1 (KJV)");
        assert_eq!(value["domain"], "bible/kjv");
        assert_eq!(value["metadata"]["book"], "Genesis");
    }
}
