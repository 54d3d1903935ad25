//! Book-level metadata documents: one per canon book, 66 total.

use serde_json::json;
use tracing::info;

use common::canon::{
    book_category, book_genre, genre_description, Testament, BIBLE_BOOKS, OT_BOOK_COUNT,
};
use common::document::CorpusDocument;

/// Builds metadata documents for all 66 books in canonical order.
pub fn book_documents() -> Vec<CorpusDocument> {
    let documents: Vec<CorpusDocument> = BIBLE_BOOKS
        .iter()
        .enumerate()
        .map(|(idx, book_name)| create_book_document(book_name, idx as u8 + 1))
        .collect();
    info!(count = documents.len(), "generated book metadata documents");
    documents
}

fn create_book_document(book_name: &str, canonical_order: u8) -> CorpusDocument {
    let testament = Testament::of_book(canonical_order);
    let testament_position = match testament {
        Testament::OT => canonical_order,
        Testament::NT => canonical_order - OT_BOOK_COUNT,
    };

    let category = book_category(book_name);
    let genre = book_genre(book_name);

    let mut parts: Vec<String> = Vec::new();
    parts.push(format!(
        "**{book_name}** is a {genre} book in the {testament} ({category})."
    ));
    parts.push(format!(
        "It stands {canonical_order} of 66 in the canon, position {testament_position} \
         within the {testament}."
    ));
    if let Some(description) = genre_description(genre) {
        parts.push(format!("Literary style: {description}."));
    }

    CorpusDocument {
        title: format!("Book of {book_name} - Biblical Scholarship Metadata"),
        content: parts.join(" "),
        domain: "metadata/books".to_string(),
        metadata: json!({
            "book_name": book_name,
            "canonical_order": canonical_order,
            "testament": testament,
            "testament_position": testament_position,
            "category": category,
            "genre": genre,
        }),
    }
}
