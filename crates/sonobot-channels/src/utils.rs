//! Shared utilities for channel implementations.

/// Split a long message into chunks that respect a platform's character limit.
///
/// All slice boundaries are aligned to UTF-8 char boundaries to avoid panics
/// on multi-byte content. Prefers splitting at newline boundaries when possible.
pub fn split_message(text: &str, max_len: usize) -> Vec<&str> {
    if text.len() <= max_len {
        return vec![text];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // max_len smaller than one char: take the whole char.
            end = start + text[start..].chars().next().map_or(1, char::len_utf8);
        }
        let break_at = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .map(|i| start + i + 1)
                .filter(|&b| b > start)
                .unwrap_or(end)
        } else {
            end
        };
        chunks.push(&text[start..break_at]);
        start = break_at;
    }

    chunks
}

const FENCE: &str = "```";

/// Like [`split_message`], but a ```` ``` ```` block cut by a chunk boundary
/// is closed at the end of that chunk and reopened at the start of the next,
/// so each chunk renders on its own.
pub fn split_fenced(text: &str, max_len: usize) -> Vec<String> {
    // Room for "```\n" in front and "\n```" behind.
    let reserve = 2 * (FENCE.len() + 1);
    if text.len() <= max_len || max_len <= reserve {
        return split_message(text, max_len)
            .into_iter()
            .map(str::to_string)
            .collect();
    }

    let mut open = false;
    split_message(text, max_len - reserve)
        .into_iter()
        .map(|chunk| {
            let mut out = String::with_capacity(chunk.len() + reserve);
            if open {
                out.push_str(FENCE);
                out.push('\n');
            }
            out.push_str(chunk);
            if chunk.matches(FENCE).count() % 2 == 1 {
                open = !open;
            }
            if open {
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(FENCE);
            }
            out
        })
        .collect()
}
