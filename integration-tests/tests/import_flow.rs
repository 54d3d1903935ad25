//! End-to-end flow: verses CSV -> chunker -> batch upload.

use std::io::Write;
use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use ingestion_pipeline::chunker::VerseChunker;
use ingestion_pipeline::parser::{parse_bible_csv, validate_verse_integrity};
use prism_client::{import_documents_in_batches, PrismClient, UploadOptions};

const GENESIS_1_SAMPLE: &str = "\
Book,Chapter,Verse,Text
Genesis,1,1,In the beginning God created the heaven and the earth.
Genesis,1,2,And the earth was without form; and void; and darkness was upon the face of the deep.
Genesis,1,3,And God said; Let there be light: and there was light.
Genesis,1,4,And God saw the light; that it was good: and God divided the light from the darkness.
Genesis,1,5,And God called the light Day; and the darkness he called Night.
Genesis,2,1,Thus the heavens and the earth were finished; and all the host of them.
";

fn write_sample_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(GENESIS_1_SAMPLE.as_bytes()).expect("write");
    file
}

#[tokio::test]
async fn csv_to_prism_import_round_trip() {
    let file = write_sample_csv();
    let verses = parse_bible_csv(file.path(), "KJV", None).expect("parse");
    assert_eq!(verses.len(), 6);

    let integrity = validate_verse_integrity(&verses);
    assert!(integrity.issues.is_empty());
    assert_eq!(integrity.chapters_found, 2);

    let chunker = VerseChunker::with_defaults().expect("chunker");
    let chunks = chunker.chunk_verses(&verses, "KJV").expect("chunks");

    // Two chapters means at least two chunks, never a cross-chapter one.
    assert!(chunks.len() >= 2);
    assert!(chunks
        .iter()
        .all(|chunk| chunk.metadata.book == "Genesis"));
    let chapter_2_chunks: Vec<_> = chunks
        .iter()
        .filter(|chunk| chunk.metadata.chapter == 2)
        .collect();
    assert_eq!(chapter_2_chunks.len(), 1);
    assert_eq!(chapter_2_chunks[0].metadata.verse_start, 1);

    let documents: Vec<_> = chunks
        .into_iter()
        .map(|chunk| chunk.into_document().expect("document"))
        .collect();
    let expected_count = documents.len();

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/health");
            then.status(200);
        })
        .await;
    let import = server
        .mock_async(move |when, then| {
            when.method(POST)
                .path("/api/v1/corpus/import")
                .json_body_partial(r#"{"embed": false}"#);
            then.status(200).json_body(json!({
                "total": expected_count,
                "imported": expected_count,
                "failed": 0,
                "results": []
            }));
        })
        .await;

    let client =
        PrismClient::new(&server.base_url(), Duration::from_secs(5)).expect("client");
    let options = UploadOptions {
        batch_size: 100,
        embed: false,
        batch_pause: Duration::ZERO,
    };
    let report = import_documents_in_batches(&client, &documents, &options)
        .await
        .expect("report");

    assert_eq!(import.hits_async().await, 1);
    assert_eq!(report.total_documents, expected_count);
    assert_eq!(report.total_batches, 1);
    assert_eq!(report.success_count, expected_count);
    assert_eq!(report.error_count, 0);
}

#[tokio::test]
async fn uploaded_documents_carry_the_chunk_shape() {
    let file = write_sample_csv();
    let verses = parse_bible_csv(file.path(), "KJV", None).expect("parse");

    let chunker = VerseChunker::with_defaults().expect("chunker");
    let chunks = chunker.chunk_verses(&verses, "KJV").expect("chunks");
    let first = chunks.first().expect("at least one chunk").clone();

    let recount = chunker.counter().count(&first.content);
    let document = first.into_document().expect("document");

    assert!(document.title.starts_with("Genesis 1:"));
    assert!(document.title.ends_with("(KJV)"));
    assert_eq!(document.domain, "bible/kjv");
    assert_eq!(document.metadata["book_id"], 1);
    assert_eq!(document.metadata["testament"], "OT");
    assert_eq!(document.metadata["structure"]["token_count"], recount);
    assert_eq!(
        document.metadata["source"]["url"],
        "https://github.com/scrollmapper/bible_databases"
    );
    let path = document.metadata["structure"]["path"]
        .as_str()
        .expect("path");
    assert!(path.starts_with("KJV > Genesis > Chapter 1 > Verses 1-"));
}
