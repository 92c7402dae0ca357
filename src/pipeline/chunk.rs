//! Fixed-size text chunking.
//!
//! Sizes are counted in characters (Unicode scalar values), not bytes, and a
//! boundary never falls inside a character. Chunks borrow from the source
//! text and are numbered from 0 in source order.

/// A contiguous slice of the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// 0-based position in the partition.
    pub index: usize,
    pub text: &'a str,
}

impl Chunk<'_> {
    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split `text` into consecutive chunks of at most `max_chars` characters.
///
/// Every chunk but the last holds exactly `max_chars` characters. Empty text
/// yields no chunks; concatenating the chunks in index order gives back
/// `text`.
///
/// A `max_chars` of 0 is treated as 1; [`crate::StudyConfig::validate`]
/// rejects it before the pipeline gets here.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<Chunk<'_>> {
    let max_chars = max_chars.max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (offset, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(Chunk {
                index: chunks.len(),
                text: &text[start..offset],
            });
            start = offset;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(Chunk {
            index: chunks.len(),
            text: &text[start..],
        });
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejoin(chunks: &[Chunk<'_>]) -> String {
        chunks.iter().map(|c| c.text).collect()
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_text("", 5000).is_empty());
    }

    #[test]
    fn twelve_thousand_by_five_thousand() {
        let text = "x".repeat(12_000);
        let chunks = chunk_text(&text, 5000);
        let lens: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
        assert_eq!(lens, vec![5000, 5000, 2000]);
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let text = "ab".repeat(50);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 10);
        assert!(chunks.iter().all(|c| c.char_len() == 10));
    }

    #[test]
    fn shorter_than_max_is_one_chunk() {
        let chunks = chunk_text("hello", 5000);
        assert_eq!(chunks, vec![Chunk { index: 0, text: "hello" }]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        // 'é' is two bytes, '漢' three, '🦀' four.
        let text = "é漢🦀a".repeat(5);
        let chunks = chunk_text(&text, 3);
        assert_eq!(chunks.len(), 7);
        assert!(chunks.iter().all(|c| c.char_len() <= 3));
        assert_eq!(rejoin(&chunks), text);
    }

    #[test]
    fn indices_follow_source_order() {
        let chunks = chunk_text("aaabbbccc", 3);
        let got: Vec<(usize, &str)> = chunks.iter().map(|c| (c.index, c.text)).collect();
        assert_eq!(got, vec![(0, "aaa"), (1, "bbb"), (2, "ccc")]);
    }

    #[test]
    fn partition_properties_hold_across_sizes() {
        let text: String = (0..997u32)
            .map(|i| char::from_u32(0x41 + (i % 26)).unwrap_or('?'))
            .chain("ñü→∑".chars().cycle().take(211))
            .collect();
        let len = text.chars().count();

        for size in [1, 2, 3, 7, 64, 500, 1207, 1208, 5000] {
            let chunks = chunk_text(&text, size);
            assert_eq!(chunks.len(), len.div_ceil(size), "size {size}");
            assert!(chunks.iter().all(|c| c.char_len() <= size && !c.text.is_empty()));
            assert!(chunks.iter().enumerate().all(|(i, c)| c.index == i));
            assert_eq!(rejoin(&chunks), text, "size {size}");
        }
    }

    #[test]
    fn zero_size_splits_per_character() {
        let chunks = chunk_text("abc", 0);
        assert_eq!(chunks, chunk_text("abc", 1));
        assert_eq!(chunks.len(), 3);
    }
}
