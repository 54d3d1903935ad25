//! Chunking behavior against the production cl100k_base tokenizer.

use common::canon::Verse;
use ingestion_pipeline::chunker::VerseChunker;

fn psalm_23() -> Vec<Verse> {
    let texts = [
        "The LORD is my shepherd; I shall not want.",
        "He maketh me to lie down in green pastures: he leadeth me beside the still waters.",
        "He restoreth my soul: he leadeth me in the paths of righteousness for his name's sake.",
        "Yea, though I walk through the valley of the shadow of death, I will fear no evil: \
         for thou art with me; thy rod and thy staff they comfort me.",
        "Thou preparest a table before me in the presence of mine enemies: thou anointest \
         my head with oil; my cup runneth over.",
        "Surely goodness and mercy shall follow me all the days of my life: and I will \
         dwell in the house of the LORD for ever.",
    ];

    texts
        .iter()
        .enumerate()
        .map(|(idx, text)| Verse {
            book_id: 19,
            book_name: "Psalms".to_string(),
            chapter: 23,
            verse: idx as u32 + 1,
            text: (*text).to_string(),
        })
        .collect()
}

#[test]
fn psalm_23_chunks_into_a_single_document() {
    let chunker = VerseChunker::with_defaults().expect("chunker");
    let chunks = chunker.chunk_verses(&psalm_23(), "KJV").expect("chunks");

    assert_eq!(chunks.len(), 1);
    let chunk = &chunks[0];
    assert_eq!(chunk.title, "Psalms 23:1-6 (KJV)");
    assert_eq!(chunk.metadata.verse_start, 1);
    assert_eq!(chunk.metadata.verse_end, 6);
    assert_eq!(chunk.domain, "bible/kjv");
    assert_eq!(
        chunk.metadata.structure.path,
        "KJV > Psalms > Chapter 23 > Verses 1-6"
    );

    let token_count = chunk.metadata.structure.token_count;
    assert!(
        (150..250).contains(&token_count),
        "unexpected token count {token_count}"
    );
}

#[test]
fn stored_token_counts_survive_a_recount() {
    let chunker = VerseChunker::with_defaults().expect("chunker");
    let chunks = chunker.chunk_verses(&psalm_23(), "KJV").expect("chunks");

    for chunk in &chunks {
        assert_eq!(
            chunker.counter().count(&chunk.content),
            chunk.metadata.structure.token_count
        );
    }
}

#[test]
fn quality_report_sees_the_whole_corpus() {
    let chunker = VerseChunker::with_defaults().expect("chunker");
    let report = chunker.analyze(&psalm_23(), "KJV").expect("report");

    assert_eq!(report.total_verses, 6);
    assert_eq!(report.total_chunks, 1);
    assert_eq!(report.verses_per_chunk_avg, 6.0);
    assert!(report.token_stats.min > 0);
    assert_eq!(report.token_stats.min, report.token_stats.max);
    assert_eq!(report.chunks_above_max, 0);
}
