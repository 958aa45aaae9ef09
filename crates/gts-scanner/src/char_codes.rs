//! Character classification helpers.

pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

pub fn is_white_space_single_line(ch: char) -> bool {
    matches!(
        ch,
        ' ' | '\t' | '\u{000B}' | '\u{000C}' | '\u{00A0}' | '\u{FEFF}' | '\u{1680}' | '\u{202F}'
            | '\u{205F}' | '\u{3000}'
    ) || ('\u{2000}'..='\u{200A}').contains(&ch)
}

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '$' || ch == '_' || (!ch.is_ascii() && ch.is_alphabetic())
}

pub fn is_identifier_part(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || ch == '$'
        || ch == '_'
        || ch == '\u{200C}'
        || ch == '\u{200D}'
        || (!ch.is_ascii() && ch.is_alphanumeric())
}

/// True if `text` is a valid identifier name.
pub fn is_identifier_text(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_identifier_start(first) => chars.all(is_identifier_part),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_text() {
        assert!(is_identifier_text("__gts_fnArg"));
        assert!(is_identifier_text("$x1"));
        assert!(is_identifier_text("ñame"));
        assert!(!is_identifier_text("1x"));
        assert!(!is_identifier_text("a-b"));
        assert!(!is_identifier_text(""));
    }
}
