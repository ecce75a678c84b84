//! HTML and CSS escaping and sanitising helpers used when building markup.

/// Escape text for use in element content.
pub fn esc_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape text for use inside a double-quoted attribute.
pub fn esc_attr(text: &str) -> String {
    esc_html(text)
}

/// Escape text for use inside a `<textarea>`.
pub fn esc_textarea(text: &str) -> String {
    esc_html(text)
}

/// Accept only http(s), protocol-relative and site-relative URLs.
///
/// Anything else (including `javascript:`) becomes the empty string.
pub fn esc_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let lower = trimmed.to_ascii_lowercase();
    let allowed = lower.starts_with("http://")
        || lower.starts_with("https://")
        || trimmed.starts_with('/')
        || trimmed.starts_with('#')
        || trimmed.starts_with('?');

    if !allowed {
        return String::new();
    }

    trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .replace('"', "%22")
        .replace('\'', "%27")
        .replace('<', "%3C")
        .replace('>', "%3E")
}

/// Drop characters that would break a widget title attribute.
pub fn strip_title_chars(title: &str) -> String {
    title
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | '&' | '"' | '\u{201D}' | '\'' | '\u{2018}'))
        .collect()
}

/// Whether a setting value can be substituted into a CSS declaration
/// without leaving it.
///
/// Block, statement and tag delimiters, escapes, control characters and
/// unbalanced quotes all make a value unusable.
pub fn is_css_safe(value: &str) -> bool {
    if value
        .chars()
        .any(|c| matches!(c, '{' | '}' | ';' | '<' | '>' | '\\') || c.is_control())
    {
        return false;
    }
    value.matches('"').count() % 2 == 0 && value.matches('\'').count() % 2 == 0
}

/// Percent-encode a URL for use inside `url("...")`.
pub fn css_url(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        match ch {
            '"' | '\'' | '(' | ')' | '<' | '>' | '\\' | '{' | '}' | ';' => {
                out.push_str(&format!("%{:02X}", u32::from(ch)));
            }
            c if c.is_whitespace() || c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Upper-case the first character.
pub fn ucfirst(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
