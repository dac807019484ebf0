use std::borrow::Cow;

/// Decode HTML character references in upstream `text` and `title` fields.
///
/// Handles the named entities upstream emits plus decimal (`&#39;`) and
/// hexadecimal (`&#x27;`) references. Anything unrecognized is kept verbatim.
#[must_use]
pub fn unescape_html(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match decode_entity(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// `tail` starts with `&`. Returns the decoded char and the bytes consumed.
fn decode_entity(tail: &str) -> Option<(char, usize)> {
    let end = tail.find(';')?;
    // Longest reference we decode is `&#x10FFFF;`.
    if end > 10 {
        return None;
    }
    let name = &tail[1..end];
    let ch = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let numeric = name.strip_prefix('#')?;
            let code = match numeric.strip_prefix(['x', 'X']) {
                Some(hex) if hex.bytes().all(|b| b.is_ascii_hexdigit()) => {
                    u32::from_str_radix(hex, 16).ok()?
                }
                Some(_) => return None,
                None if numeric.bytes().all(|b| b.is_ascii_digit()) => {
                    numeric.parse::<u32>().ok()?
                }
                None => return None,
            };
            // NUL, surrogates and out-of-range code points become U+FFFD.
            char::from_u32(code).filter(|&ch| ch != '\0').unwrap_or(char::REPLACEMENT_CHARACTER)
        }
    };
    Some((ch, end + 1))
}
