//! Chapter grouping over a canonically ordered verse slice.

use common::canon::Verse;

/// Partitions verses into contiguous same-chapter runs.
///
/// Input must already be in canonical `(book_id, chapter, verse)` order;
/// the grouper does not sort. Groups are yielded lazily in a single pass
/// and are never empty; empty input yields nothing.
pub fn group_by_chapter(verses: &[Verse]) -> impl Iterator<Item = &[Verse]> {
    verses.chunk_by(|a, b| a.book_id == b.book_id && a.chapter == b.chapter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verse(book_id: u8, chapter: u32, verse: u32) -> Verse {
        Verse {
            book_id,
            book_name: "Genesis".to_string(),
            chapter,
            verse,
            text: "text".to_string(),
        }
    }

    #[test]
    fn splits_on_chapter_boundaries() {
        let verses = vec![
            verse(1, 1, 1),
            verse(1, 1, 2),
            verse(1, 2, 1),
            verse(2, 1, 1),
        ];

        let groups: Vec<&[Verse]> = group_by_chapter(&verses).collect();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
        assert_eq!(groups[2].len(), 1);
    }

    #[test]
    fn same_chapter_number_in_new_book_starts_a_group() {
        let verses = vec![verse(1, 1, 1), verse(2, 1, 1)];
        let groups: Vec<&[Verse]> = group_by_chapter(&verses).collect();
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_groups() {
        let verses: Vec<Verse> = Vec::new();
        assert_eq!(group_by_chapter(&verses).count(), 0);
    }

    #[test]
    fn groups_are_never_empty() {
        let verses = vec![verse(1, 1, 1), verse(1, 2, 1), verse(1, 3, 1)];
        assert!(group_by_chapter(&verses).all(|group| !group.is_empty()));
    }
}
