//! Shared text helpers: markup stripping and query encoding.

/// Elements whose end (or, for void elements, whose presence) ends a line.
const LINE_BREAKING_TAGS: &[&str] = &[
    "br", "p", "div", "li", "tr", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "pre",
];

/// Elements whose text content is never rendered.
const HIDDEN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// How tags shape the rendered text.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Rendering {
    /// Line breaks at `<br>` and block ends; hidden elements skipped.
    Readable,
    /// Concatenated text nodes only, like the DOM's `textContent`.
    TextContent,
}

/// Render an HTML fragment as plain text.
///
/// Tags are dropped, `<br>` and the end of block elements become newlines,
/// `script`/`style` bodies are skipped and character references are decoded.
/// A `<` that cannot open a tag is kept literally. Trailing newlines produced
/// by a final block element are removed.
///
/// # Returns
/// The text a reader would see, suitable for plain form fields.
pub fn html_to_plain_text(html: &str) -> String {
    let mut out = render(html, Rendering::Readable);
    let trimmed_len = out.trim_end_matches('\n').len();
    out.truncate(trimmed_len);
    out
}

/// The fragment's text nodes joined without separators, with character
/// references decoded. `<p>a</p><p>b</p>` yields `ab`.
pub fn html_text_content(html: &str) -> String {
    render(html, Rendering::TextContent)
}

fn render(html: &str, rendering: Rendering) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut hidden_until: Option<String> = None;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' && opens_tag(&rest[1..]) {
            let Some(end) = rest.find('>') else {
                break;
            };
            let (name, closing) = tag_name(&rest[1..end]);
            rest = &rest[end + 1..];
            if rendering == Rendering::TextContent {
                continue;
            }

            if let Some(hidden) = hidden_until.as_deref() {
                if closing && name == hidden {
                    hidden_until = None;
                }
                continue;
            }
            if !closing && HIDDEN_CONTENT_TAGS.contains(&name.as_str()) {
                hidden_until = Some(name);
                continue;
            }
            let is_break = name == "br" || (closing && LINE_BREAKING_TAGS.contains(&name.as_str()));
            if is_break {
                out.push('\n');
            }
            continue;
        }

        if hidden_until.is_some() {
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        if ch == '&' {
            if let Some((decoded, consumed)) = decode_entity(rest) {
                out.push(decoded);
                rest = &rest[consumed..];
                continue;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

fn opens_tag(after_lt: &str) -> bool {
    after_lt
        .chars()
        .next()
        .map(|next| next.is_ascii_alphabetic() || next == '/' || next == '!')
        .unwrap_or(false)
}

fn tag_name(inner: &str) -> (String, bool) {
    let inner = inner.trim();
    let (closing, body) = match inner.strip_prefix('/') {
        Some(body) => (true, body),
        None => (false, inner),
    };
    let name = body
        .split(|c: char| c.is_whitespace() || c == '/')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    (name, closing)
}

fn decode_entity(input: &str) -> Option<(char, usize)> {
    let semi = input.char_indices().take(12).find(|(_, c)| *c == ';')?.0;
    let body = &input[1..semi];
    let decoded = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        _ => {
            let numeric = body.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => numeric.parse::<u32>().ok()?,
            };
            char::from_u32(code)?
        }
    };
    Some((decoded, semi + 1))
}

/// Percent-encode a value for use in a URL query component.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through; every other
/// byte of the UTF-8 encoding is escaped.
pub fn encode_query_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
    out
}

/// Reverse [`encode_query_component`], also accepting `+` as a space.
///
/// # Returns
/// `None` when an escape is malformed or the bytes are not UTF-8.
pub fn decode_query_component(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'%' => {
                let hex = value.get(index + 1..index + 3)?;
                out.push(u8::from_str_radix(hex, 16).ok()?);
                index += 3;
            }
            b'+' => {
                out.push(b' ');
                index += 1;
            }
            other => {
                out.push(other);
                index += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_joins_blocks_without_line_breaks() {
        assert_eq!(html_text_content("<p>a</p><p>b</p>"), "ab");
        assert_eq!(html_text_content("x<br>y &amp; z"), "xy & z");
        assert_eq!(html_to_plain_text("<p>a</p><p>b</p>"), "a\nb");
    }

    #[test]
    fn html_to_plain_text_strips_inline_markup() {
        assert_eq!(html_to_plain_text("<b>hi</b>"), "hi");
        assert_eq!(
            html_to_plain_text("Say <i>hello</i> to <a href=\"x\">them</a>"),
            "Say hello to them"
        );
    }

    #[test]
    fn html_to_plain_text_breaks_lines_at_blocks() {
        assert_eq!(
            html_to_plain_text("<p>Hello &amp; welcome</p><p>Line<br>two</p>"),
            "Hello & welcome\nLine\ntwo"
        );
        assert_eq!(html_to_plain_text("<div>a</div><div>b<br/></div>"), "a\nb");
    }

    #[test]
    fn html_to_plain_text_decodes_references_and_keeps_bare_lt() {
        assert_eq!(html_to_plain_text("1 &lt; 2 &#38; 3 &#x41;"), "1 < 2 & 3 A");
        assert_eq!(html_to_plain_text("a < b"), "a < b");
        assert_eq!(html_to_plain_text("fish &chips"), "fish &chips");
    }

    #[test]
    fn html_to_plain_text_skips_script_and_style_bodies() {
        assert_eq!(
            html_to_plain_text("<style>p{}</style>ok<script>alert(1)</script>"),
            "ok"
        );
    }

    #[test]
    fn query_component_encoding_escapes_reserved_bytes() {
        assert_eq!(encode_query_component("1712345678901"), "1712345678901");
        assert_eq!(encode_query_component("a b&c=é"), "a%20b%26c%3D%C3%A9");
        assert_eq!(
            decode_query_component("a%20b%26c%3D%C3%A9").as_deref(),
            Some("a b&c=é")
        );
        assert_eq!(decode_query_component("a+b").as_deref(), Some("a b"));
        assert_eq!(decode_query_component("%G1"), None);
    }
}
