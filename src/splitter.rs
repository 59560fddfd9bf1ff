// Recursive character text splitter for chunking stories into scenes

/// Splits text into chunks of at most `chunk_size` characters, preferring to
/// break at the earliest separator in the list that appears in the text.
/// Adjacent chunks share up to `chunk_overlap` characters of context.
/// All sizes are measured in characters, not bytes.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            // Overlap must leave room for forward progress
            chunk_overlap: chunk_overlap.min(chunk_size / 2),
            separators: ["\n\n", "\n", ". ", " ", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        if char_len(text) <= self.chunk_size {
            let trimmed = text.trim();
            return if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![text.to_string()]
            };
        }

        // First separator that occurs in the text; the final "" always does
        let (index, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (i, sep.clone()))
            .unwrap_or((separators.len() - 1, String::new()));

        if separator.is_empty() {
            return self.cut_fixed(text);
        }

        let remaining = &separators[index + 1..];
        let pieces: Vec<&str> = text.split(separator.as_str()).collect();

        let mut chunks = Vec::new();
        let mut small: Vec<String> = Vec::new();

        for piece in pieces {
            if char_len(piece) <= self.chunk_size {
                small.push(piece.to_string());
            } else {
                if !small.is_empty() {
                    chunks.extend(self.merge(&small, &separator));
                    small.clear();
                }
                chunks.extend(self.split_recursive(piece, remaining));
            }
        }
        if !small.is_empty() {
            chunks.extend(self.merge(&small, &separator));
        }

        chunks
    }

    /// Greedily join pieces with the separator up to the chunk size, keeping
    /// trailing pieces for overlap when a chunk is emitted
    fn merge(&self, pieces: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: Vec<&String> = Vec::new();
        let mut window_len = 0usize;

        let joined_len = |len: usize, count: usize| {
            if count > 1 { len + sep_len * (count - 1) } else { len }
        };

        for piece in pieces {
            let piece_len = char_len(piece);

            if !window.is_empty()
                && joined_len(window_len + piece_len, window.len() + 1) > self.chunk_size
            {
                let chunk = window
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(separator);
                if !chunk.trim().is_empty() {
                    chunks.push(chunk);
                }

                // Drop leading pieces until the retained tail fits the
                // overlap budget and leaves room for the next piece
                while !window.is_empty()
                    && (joined_len(window_len, window.len()) > self.chunk_overlap
                        || joined_len(window_len + piece_len, window.len() + 1) > self.chunk_size)
                {
                    window_len -= char_len(window[0]);
                    window.remove(0);
                }
            }

            window.push(piece);
            window_len += piece_len;
        }

        if !window.is_empty() {
            let chunk = window
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(separator);
            if !chunk.trim().is_empty() {
                chunks.push(chunk);
            }
        }

        chunks
    }

    /// Last resort when no separator applies: hard cut at chunk boundaries
    fn cut_fixed(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = (self.chunk_size - self.chunk_overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }

        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = TextSplitter::new(100, 10);
        let chunks = splitter.split("a short story");
        assert_eq!(chunks, vec!["a short story"]);
    }

    #[test]
    fn test_splits_on_paragraphs_first() {
        let splitter = TextSplitter::new(20, 0);
        let chunks = splitter.split("first paragraph\n\nsecond paragraph");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "first paragraph");
        assert_eq!(chunks[1], "second paragraph");
    }

    #[test]
    fn test_chunks_respect_size_limit() {
        let splitter = TextSplitter::new(30, 5);
        let text = "The fox ran. The dog slept. The owl watched. The cat hid. The end came.";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30, "oversized chunk: {:?}", chunk);
        }
    }

    #[test]
    fn test_all_text_is_covered() {
        let splitter = TextSplitter::new(25, 0);
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let chunks = splitter.split(text);
        for word in text.split_whitespace() {
            assert!(
                chunks.iter().any(|c| c.contains(word)),
                "missing word: {}",
                word
            );
        }
    }

    #[test]
    fn test_overlap_repeats_context() {
        let splitter = TextSplitter::new(20, 8);
        let text = "one two three four five six seven eight nine ten";
        let chunks = splitter.split(text);
        assert!(chunks.len() > 1);
        // At least one word from the end of a chunk reappears in the next
        let repeated = chunks.windows(2).any(|pair| {
            pair[0]
                .split_whitespace()
                .any(|w| pair[1].split_whitespace().any(|v| v == w))
        });
        assert!(repeated);
    }

    #[test]
    fn test_unbreakable_text_is_hard_cut() {
        let splitter = TextSplitter::new(10, 0);
        let text = "x".repeat(35);
        let chunks = splitter.split(&text);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].chars().count(), 10);
        assert_eq!(chunks[3].chars().count(), 5);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let splitter = TextSplitter::new(5, 1);
        let text = "héllo wörld ünïcode tëxt çharacters";
        let chunks = splitter.split(text);
        assert!(!chunks.is_empty());
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5);
        }
    }

    #[test]
    fn test_whitespace_only_text_yields_nothing() {
        let splitter = TextSplitter::new(10, 0);
        assert!(splitter.split("   \n\n   ").is_empty());
    }
}
