// src/core/sanitize.rs

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Make a value safe to sit inside a Markdown table cell.
pub fn escape_md_cell(s: &str) -> String {
    normalize_ws(s).replace('|', "\\|")
}

/// Split `| a | b \| c | d |` into `["a", "b | c", "d"]`.
/// Leading/trailing pipes are optional; cells are trimmed.
pub fn split_md_row(line: &str) -> Vec<String> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);

    let mut cells = Vec::new();
    let mut cell = s!();
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                chars.next();
                cell.push('|');
            }
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            _ => cell.push(ch),
        }
    }
    // Text after the last pipe only counts if the row wasn't closed.
    let tail = cell.trim();
    if !tail.is_empty() {
        cells.push(tail.to_string());
    }
    cells
}
