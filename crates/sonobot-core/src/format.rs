//! Display helpers for chat replies. Pure functions, no I/O.

/// Format seconds as `mm:ss`, or `hh:mm:ss` once there is at least one hour.
pub fn format_duration(seconds: u64) -> String {
    let hrs = seconds / 3600;
    let mins = (seconds / 60) % 60;
    let secs = seconds % 60;
    if hrs > 0 {
        format!("{hrs:02}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Pad `s` with trailing spaces up to `width` characters. Longer input is returned as is.
pub fn pad_right(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - len))
}

/// Pad `s` with leading spaces up to `width` characters. Longer input is returned as is.
pub fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    format!("{}{s}", " ".repeat(width - len))
}

/// Wrap lines in a triple-backtick block.
pub fn code_block<S: AsRef<str>>(lines: &[S]) -> String {
    let body = lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n");
    format!("```{body}```")
}
