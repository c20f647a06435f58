//! Separator-ladder splitter with overlapping character windows.

const DEFAULT_CHUNK_SIZE: usize = 600;
const DEFAULT_CHUNK_OVERLAP: usize = 60;
const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text by recursively descending a separator preference ladder.
///
/// Splitting first attempts paragraph boundaries (`"\n\n"`), then line
/// boundaries, then word boundaries, and finally falls back to raw character
/// slicing, which guarantees termination for separator-free input. Pieces are
/// merged back together greedily up to `chunk_size` characters, and each
/// chunk after the first starts with the trailing `chunk_overlap` characters
/// of its predecessor so context is carried across chunk edges.
///
/// Sizes are counted in Unicode scalar values (`char`s) and all slicing lands
/// on `char` boundaries.
///
/// Guarantees for every input:
/// * chunks are non-empty and in document order;
/// * each chunk is at most `chunk_size` characters;
/// * removing the carried overlap from each chunk after the first and
///   concatenating the remainders reproduces the input exactly.
#[derive(Clone, Debug)]
pub struct RecursiveSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl Default for RecursiveSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl RecursiveSplitter {
    /// Creates a splitter with the default separator ladder.
    ///
    /// # Panics
    ///
    /// Panics if `chunk_overlap >= chunk_size`; the overlap must leave room
    /// for fresh content in every chunk.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        assert!(
            chunk_overlap < chunk_size,
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        );
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Maximum chunk length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Characters of trailing context carried into the next chunk.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits `text` into overlapping chunks.
    ///
    /// Empty input yields no chunks; input no longer than `chunk_size`
    /// yields a single chunk containing exactly the input.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        if char_count(text) <= self.chunk_size {
            return vec![text.to_string()];
        }

        // Pieces are capped below chunk_size by the full overlap so a carry
        // never forces a chunk past the size limit.
        let piece_limit = self.chunk_size - self.chunk_overlap;
        let mut pieces = Vec::new();
        collect_pieces(text, &self.separators, piece_limit, &mut pieces);
        self.merge_pieces(&pieces)
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks: Vec<String> = Vec::new();
        let mut carry = String::new();
        let mut carry_chars = 0usize;
        let mut content = String::new();
        let mut content_chars = 0usize;

        for piece in pieces {
            let piece_chars = char_count(piece);
            if !content.is_empty()
                && carry_chars + content_chars + piece_chars > self.chunk_size
            {
                let chunk = format!("{carry}{content}");
                carry = tail_chars(&chunk, self.chunk_overlap).to_string();
                carry_chars = char_count(&carry);
                chunks.push(chunk);
                content.clear();
                content_chars = 0;
            }
            content.push_str(piece);
            content_chars += piece_chars;
        }

        if !content.is_empty() {
            chunks.push(format!("{carry}{content}"));
        }
        chunks
    }
}

/// Recursively splits `text` into pieces of at most `limit` characters,
/// descending the separator ladder for pieces that are still too long.
fn collect_pieces<'a>(
    text: &'a str,
    separators: &[String],
    limit: usize,
    out: &mut Vec<&'a str>,
) {
    if char_count(text) <= limit {
        out.push(text);
        return;
    }

    let Some((separator, rest)) = separators.split_first() else {
        // Only reachable when the ladder does not end with "".
        out.extend(slice_chars(text, limit));
        return;
    };

    if separator.is_empty() {
        out.extend(slice_chars(text, limit));
        return;
    }

    for piece in split_keeping_separator(text, separator) {
        if char_count(piece) <= limit {
            out.push(piece);
        } else {
            collect_pieces(piece, rest, limit, out);
        }
    }
}

/// Splits on every occurrence of `separator`, leaving the separator attached
/// to the end of the preceding piece so that concatenating the pieces
/// reproduces `text` exactly.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while let Some(found) = text[start..].find(separator) {
        let end = start + found + separator.len();
        pieces.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Cuts `text` into consecutive slices of at most `max_chars` characters.
fn slice_chars(text: &str, max_chars: usize) -> Vec<&str> {
    let mut slices = Vec::new();
    let mut remaining = text;
    while !remaining.is_empty() {
        let split_at = byte_index_of_char(remaining, max_chars);
        let (head, tail) = remaining.split_at(split_at);
        slices.push(head);
        remaining = tail;
    }
    slices
}

fn char_count(text: &str) -> usize {
    text.chars().count()
}

/// Byte offset of the `n`-th character, or `text.len()` when the text is
/// shorter than `n` characters.
fn byte_index_of_char(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

/// The trailing `n` characters of `text` (the whole text when shorter).
fn tail_chars(text: &str, n: usize) -> &str {
    let total = char_count(text);
    let skip = total.saturating_sub(n);
    &text[byte_index_of_char(text, skip)..]
}
