/*
 * Copyright Stalwart Labs Ltd. See the COPYING
 * file at the top-level directory of this distribution.
 *
 * Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
 * https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
 * <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
 * option. This file may not be copied, modified, or distributed
 * except according to those terms.
 */

use std::{
    borrow::Cow,
    time::{SystemTime, UNIX_EPOCH},
};

use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};

pub const LINE_LENGTH: usize = 76;

/// Returns `true` for non-empty strings made only of ASCII letters,
/// digits, `-`, `.` and spaces.
pub fn is_ascii_safe(text: &str) -> bool {
    !text.is_empty()
        && text
            .bytes()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, b'-' | b'.' | b' '))
}

/// Encodes `text` as an RFC 2047 base64 word unless it is ASCII-safe.
pub fn encode_word(text: &str) -> Cow<'_, str> {
    if is_ascii_safe(text) {
        text.into()
    } else {
        format!("=?UTF-8?B?{}?=", STANDARD.encode(text)).into()
    }
}

/// Renders `Name <addr>`, or `<addr>` when there is no name.
pub fn format_address(email: &str, name: Option<&str>) -> String {
    match name.filter(|name| !name.is_empty()) {
        Some(name) => format!("{} <{}>", encode_word(name), email),
        None => format!("<{}>", email),
    }
}

/// Base64 encodes `bytes` in lines of 76 characters, each one terminated
/// by CRLF.
pub fn base64_lines(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let mut result = String::with_capacity(encoded.len() + (encoded.len() / LINE_LENGTH + 1) * 2);
    for chunk in encoded.as_bytes().chunks(LINE_LENGTH) {
        // Base64 output is ASCII
        result.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        result.push_str("\r\n");
    }
    if encoded.is_empty() {
        result.push_str("\r\n");
    }
    result
}

/// Content-ID for an attachment, stable for a given file name.
pub fn content_id(filename: &str) -> String {
    format!("{:x}", md5::compute(filename.as_bytes()))
}

/// Random multipart boundary token.
pub fn boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let seed = format!("{}{:016x}", nanos, rand::random::<u64>());
    format!("{:x}", md5::compute(seed.as_bytes()))
}

/// RFC 2822 date in GMT.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S +0000").to_string()
}

/// Replaces every occurrence of each file name, ignoring ASCII case, with
/// a `cid:` reference.
pub fn embed_content_ids<'x>(
    html: &str,
    filenames: impl IntoIterator<Item = &'x str>,
) -> String {
    let mut html = html.to_string();
    for filename in filenames {
        if filename.is_empty() {
            continue;
        }
        let replacement = format!("cid:{}", content_id(filename));
        let mut result = String::with_capacity(html.len());
        let mut pos = 0;
        while let Some(found) = find_ignore_ascii_case(&html[pos..], filename) {
            result.push_str(&html[pos..pos + found]);
            result.push_str(&replacement);
            pos += found + filename.len();
        }
        result.push_str(&html[pos..]);
        html = result;
    }
    html
}

fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let needle = needle.as_bytes();
    haystack
        .as_bytes()
        .windows(needle.len())
        .enumerate()
        .find(|(pos, window)| {
            haystack.is_char_boundary(*pos)
                && haystack.is_char_boundary(pos + needle.len())
                && window.eq_ignore_ascii_case(needle)
        })
        .map(|(pos, _)| pos)
}

/// Plain text rendition of an HTML document: tags are dropped and the
/// most common entities are decoded.
pub fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut quote = None;

    for ch in html.chars() {
        match (in_tag, quote, ch) {
            (false, _, '<') => in_tag = true,
            (false, _, _) => text.push(ch),
            (true, None, '"' | '\'') => quote = Some(ch),
            (true, Some(q), _) if q == ch => quote = None,
            (true, None, '>') => in_tag = false,
            _ => (),
        }
    }

    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod test {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn ascii_safe_words() {
        assert_eq!(encode_word("Hello World 2.0 - final"), "Hello World 2.0 - final");
        assert_eq!(encode_word("Hi!"), "=?UTF-8?B?SGkh?=");
        assert_eq!(encode_word("Café"), "=?UTF-8?B?Q2Fmw6k=?=");
        assert_eq!(encode_word("é"), "=?UTF-8?B?w6k=?=");
        assert!(!is_ascii_safe(""));
        assert!(!is_ascii_safe("a_b"));

        let encoded = encode_word("Привет, мир!");
        let data = encoded
            .strip_prefix("=?UTF-8?B?")
            .and_then(|word| word.strip_suffix("?="))
            .unwrap();
        assert_eq!(
            String::from_utf8(STANDARD.decode(data).unwrap()).unwrap(),
            "Привет, мир!"
        );
    }

    #[test]
    fn addresses() {
        assert_eq!(format_address("a@x.com", None), "<a@x.com>");
        assert_eq!(format_address("a@x.com", Some("")), "<a@x.com>");
        assert_eq!(format_address("a@x.com", Some("Alice")), "Alice <a@x.com>");
        assert_eq!(
            format_address("j@x.com", Some("José")),
            "=?UTF-8?B?Sm9zw6k=?= <j@x.com>"
        );
    }

    #[test]
    fn wrapped_base64() {
        let encoded = base64_lines(&[b'x'; 100]);
        let lines = encoded.split_terminator("\r\n").collect::<Vec<_>>();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 76);
        assert!(encoded.ends_with("\r\n"));
        assert_eq!(
            STANDARD.decode(lines.concat()).unwrap(),
            vec![b'x'; 100]
        );
        assert_eq!(base64_lines(b""), "\r\n");
    }

    #[test]
    fn content_ids_and_boundaries() {
        assert_eq!(content_id("logo.png"), content_id("logo.png"));
        assert_ne!(content_id("logo.png"), content_id("logo.gif"));
        assert_eq!(content_id("logo.png").len(), 32);

        let (first, second) = (boundary(), boundary());
        assert_ne!(first, second);
        assert!(first.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn dates() {
        let date = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(format_date(&date), "Tue, 05 Mar 2024 07:08:09 +0000");
    }

    #[test]
    fn embedding() {
        let cid = content_id("logo.png");
        assert_eq!(
            embed_content_ids(r#"<img src="LOGO.png"><img src="logo.png">"#, ["logo.png"]),
            format!(r#"<img src="cid:{cid}"><img src="cid:{cid}">"#)
        );
        assert_eq!(embed_content_ids("<p>none</p>", ["logo.png"]), "<p>none</p>");
    }

    #[test]
    fn tag_stripping() {
        assert_eq!(
            strip_tags(r#"<h1 title="a > b">Hello &amp; welcome</h1><p>Bye</p>"#),
            "Hello & welcomeBye"
        );
    }
}
