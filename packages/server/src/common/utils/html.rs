/// Escape text for interpolation into an HTML body
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text and render line breaks as `<br>`
pub fn escape_html_multiline(text: &str) -> String {
    escape_html(text)
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_markup() {
        assert_eq!(
            escape_html(r#"Tom & "Jerry" <script>"#),
            "Tom &amp; &quot;Jerry&quot; &lt;script&gt;"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("Ann Lee"), "Ann Lee");
    }

    #[test]
    fn test_multiline() {
        assert_eq!(
            escape_html_multiline("line one\r\nline two\nO'Neil"),
            "line one<br>line two<br>O&#39;Neil"
        );
    }
}
