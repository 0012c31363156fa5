use scraper::ElementRef;

const MAX_SNIPPET_CHARS: usize = 300;

/// All text below `node`, with any run of whitespace (newlines included)
/// collapsed to a single space.
pub fn extract_text(node: ElementRef) -> String {
    collapse_whitespace(&node.text().collect::<Vec<_>>().join(" "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Cuts diagnostic text down to something that fits in a log line.
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(MAX_SNIPPET_CHARS) {
        Some((end, _)) => format!("{}…", &text[..end]),
        None => text.to_string(),
    }
}
