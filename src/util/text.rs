use std::borrow::Cow;

/// Longest entity body we will look at between `&` and `;`.
const MAX_ENTITY_LEN: usize = 32;

/// Decodes HTML entities in a captured document before it is persisted.
///
/// Handles the named entities that show up in real bookmark exports plus
/// numeric references (`&#38;`, `&#x26;`). Unknown or malformed entities are
/// left untouched. A single pass only, so `&amp;lt;` decodes to `&lt;`.
pub fn htmldecode(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        match decode_entity(tail) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
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

/// Decodes a single entity at the start of `tail` (which begins with `&`).
/// Returns the replacement text and the number of bytes consumed.
fn decode_entity(tail: &str) -> Option<(String, usize)> {
    let semi = tail[1..]
        .char_indices()
        .take(MAX_ENTITY_LEN)
        .find(|(_, c)| *c == ';')
        .map(|(i, _)| i + 1)?;
    let body = &tail[1..semi];

    let decoded = match body {
        "amp" => '&'.to_string(),
        "lt" => '<'.to_string(),
        "gt" => '>'.to_string(),
        "quot" => '"'.to_string(),
        "apos" => '\''.to_string(),
        "nbsp" => ' '.to_string(),
        _ => {
            let code = body.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse::<u32>().ok()?,
            };
            char::from_u32(value)?.to_string()
        }
    };

    Some((decoded, semi + 1))
}
