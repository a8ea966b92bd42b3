//! Document chunking with overlap for large documents
//!
//! Chunks are measured in characters. A chunk ends at the last paragraph
//! break (`\n\n`) in its second half when there is one, otherwise at the size
//! limit. The next chunk starts `overlap` characters before the previous one
//! ended, so the tail of chunk `i` equals the head of chunk `i + 1`.

/// Splits documents into overlapping chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentChunker {
    max_chunk_chars: usize,
    overlap_chars: usize,
}

impl DocumentChunker {
    /// Create a new chunker
    ///
    /// `overlap_chars` is clamped below `max_chunk_chars` so that every chunk
    /// advances through the document.
    pub fn new(max_chunk_chars: usize, overlap_chars: usize) -> Self {
        let max_chunk_chars = max_chunk_chars.max(1);
        Self {
            max_chunk_chars,
            overlap_chars: overlap_chars.min(max_chunk_chars - 1),
        }
    }

    /// Maximum chunk size in characters
    pub fn max_chunk_chars(&self) -> usize {
        self.max_chunk_chars
    }

    /// Overlap between consecutive chunks in characters
    pub fn overlap_chars(&self) -> usize {
        self.overlap_chars
    }

    /// Chunk the given text
    ///
    /// Text that fits in one chunk is returned whole, including empty text.
    pub fn chunk<'a>(&self, text: &'a str) -> Vec<&'a str> {
        // Byte offset of every char, plus the end of the text
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(text.len()))
            .collect();
        let total = offsets.len() - 1;

        if total <= self.max_chunk_chars {
            return vec![text];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let limit = start + self.max_chunk_chars;
            if limit >= total {
                chunks.push(&text[offsets[start]..]);
                break;
            }

            let end = self.paragraph_boundary(text, &offsets, start, limit).unwrap_or(limit);
            chunks.push(&text[offsets[start]..offsets[end]]);
            start = end - self.overlap_chars;
        }

        chunks
    }

    /// Last paragraph break in the second half of the window, if it leaves
    /// room for the next chunk to advance
    fn paragraph_boundary(&self, text: &str, offsets: &[usize], start: usize, limit: usize) -> Option<usize> {
        let search_from = start + self.max_chunk_chars / 2;
        let window = &text[offsets[search_from]..offsets[limit]];
        let byte = offsets[search_from] + window.rfind("\n\n")?;

        // The break is ASCII, so its byte offset is a char offset in the table
        let boundary = offsets.partition_point(|&offset| offset < byte);
        (boundary > start + self.overlap_chars).then_some(boundary)
    }
}
