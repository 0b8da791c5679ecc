//! Repairs for JSON text that strict decoding rejects.
//!
//! Language models asked for "raw JSON" regularly put literal line breaks and
//! tabs inside string values, and sometimes wrap the whole thing in a Markdown
//! code fence. Both break `serde_json`; both are fixed here without touching
//! anything that already parses.
use std::fmt::Write;

/// Escapes raw control characters that sit inside JSON string literals.
///
/// `\n`, `\r` and `\t` become their two-character escapes; any other character
/// below U+0020 becomes a `\u00XX` escape. Control characters outside string
/// literals are structural whitespace and are left alone, so pretty-printed
/// objects keep parsing after the repair.
///
/// The output contains no raw control characters inside strings, so applying
/// the function twice gives the same text as applying it once.
pub fn escape_control_chars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 8);
    let mut in_string = false;
    let mut escaped = false;

    for ch in raw.chars() {
        if !in_string {
            if ch == '"' {
                in_string = true;
            }
            out.push(ch);
            continue;
        }

        if escaped {
            escaped = false;
            // A raw break after a backslash still becomes an escape; the
            // backslash before it then reads as a literal one.
            if !push_control_escape(&mut out, ch) {
                out.push(ch);
            }
            continue;
        }

        match ch {
            '\\' => {
                escaped = true;
                out.push(ch);
            }
            '"' => {
                in_string = false;
                out.push(ch);
            }
            c => {
                if !push_control_escape(&mut out, c) {
                    out.push(c);
                }
            }
        }
    }

    out
}

/// Writes the JSON escape for a control character. Returns `false`, writing
/// nothing, for any other character.
fn push_control_escape(out: &mut String, ch: char) -> bool {
    match ch {
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        c if (c as u32) < 0x20 => {
            let _ = write!(out, "\\u{:04x}", c as u32);
        }
        _ => return false,
    }
    true
}

/// Removes a surrounding Markdown code fence (```` ``` ```` or ```` ```json ````).
///
/// Returns `None` when the text is not fenced.
pub fn strip_code_fence(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let rest = trimmed.strip_prefix("```")?;
    let rest = match rest.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
        _ => rest,
    };
    let rest = rest.trim_start();
    let body = rest.strip_suffix("```").unwrap_or(rest);
    Some(body.trim())
}
