//! Text escaping for server-rendered HTML and SVG.

/// Escape text for use in element content or a quoted attribute value.
pub fn escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}
