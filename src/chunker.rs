/// Telegram refuses text messages longer than this many characters.
pub const MESSAGE_LIMIT: usize = 4096;

/// Splits `text` into parts of at most `limit` characters without breaking lines.
///
/// Lines are trimmed and blank ones are skipped. A single line longer than
/// `limit` is returned as its own part, so callers must be ready for a chunk
/// that still exceeds the limit.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let line_len = line.chars().count();
        if !current.is_empty() && current_len + line_len + 1 > limit {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push('\n');
            current_len += 1;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        parts.push(current);
    }

    parts
}

pub fn is_oversized(chunk: &str, limit: usize) -> bool {
    chunk.chars().count() > limit
}
