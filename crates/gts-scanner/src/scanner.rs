//! The scanner: turns source text into tokens on demand.
//!
//! The parser drives the scanner one token at a time and asks for rescans in
//! the places where a token's meaning depends on the grammar (`/` vs. a
//! regular expression, `}` vs. a template continuation, `>` vs. `>>`).

use crate::char_codes::{
    is_identifier_part, is_identifier_start, is_line_break, is_white_space_single_line,
};
use crate::syntax_kind::{SyntaxKind, text_to_keyword};
use bitflags::bitflags;
use gts_common::CommentRange;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TokenFlags: u8 {
        const PRECEDING_LINE_BREAK = 1 << 0;
        const UNTERMINATED = 1 << 1;
    }
}

/// A lexical error. The scanner keeps going; the parser decides whether to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub message: String,
    pub pos: u32,
    pub end: u32,
}

/// Everything needed to rewind the scanner for speculative parsing.
#[derive(Debug, Clone)]
pub struct ScannerSnapshot {
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    comments_len: usize,
    error: Option<ScanError>,
}

pub struct ScannerState {
    text: String,
    pos: usize,
    full_start: usize,
    token_start: usize,
    token: SyntaxKind,
    token_value: String,
    token_flags: TokenFlags,
    comments: Vec<CommentRange>,
    error: Option<ScanError>,
}

impl ScannerState {
    pub fn new(text: String) -> Self {
        ScannerState {
            text,
            pos: 0,
            full_start: 0,
            token_start: 0,
            token: SyntaxKind::Unknown,
            token_value: String::new(),
            token_flags: TokenFlags::empty(),
            comments: Vec::new(),
            error: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn token(&self) -> SyntaxKind {
        self.token
    }

    /// Start of the current token, after leading trivia.
    pub fn token_pos(&self) -> u32 {
        self.token_start as u32
    }

    pub fn token_end(&self) -> u32 {
        self.pos as u32
    }

    /// Start of the current token's leading trivia.
    pub fn full_start(&self) -> u32 {
        self.full_start as u32
    }

    /// Identifier name, cooked string value, raw template chunk, or literal text.
    pub fn token_value(&self) -> &str {
        &self.token_value
    }

    /// Raw source text of the current token.
    pub fn token_text(&self) -> &str {
        self.text.get(self.token_start..self.pos).unwrap_or("")
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.token_flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }

    pub fn is_unterminated(&self) -> bool {
        self.token_flags.contains(TokenFlags::UNTERMINATED)
    }

    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn comments(&self) -> &[CommentRange] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<CommentRange> {
        std::mem::take(&mut self.comments)
    }

    pub fn save_state(&self) -> ScannerSnapshot {
        ScannerSnapshot {
            pos: self.pos,
            full_start: self.full_start,
            token_start: self.token_start,
            token: self.token,
            token_value: self.token_value.clone(),
            token_flags: self.token_flags,
            comments_len: self.comments.len(),
            error: self.error.clone(),
        }
    }

    pub fn restore_state(&mut self, snapshot: ScannerSnapshot) {
        self.pos = snapshot.pos;
        self.full_start = snapshot.full_start;
        self.token_start = snapshot.token_start;
        self.token = snapshot.token;
        self.token_value = snapshot.token_value;
        self.token_flags = snapshot.token_flags;
        self.comments.truncate(snapshot.comments_len);
        self.error = snapshot.error;
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.text.get(pos..)?.chars().next()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.as_bytes().get(pos).copied()
    }

    fn set_error(&mut self, message: &str, pos: usize, end: usize) {
        if self.error.is_none() {
            self.error = Some(ScanError {
                message: message.to_string(),
                pos: pos as u32,
                end: end as u32,
            });
        }
    }

    fn finish(&mut self, kind: SyntaxKind, len: usize) -> SyntaxKind {
        self.pos += len;
        self.token = kind;
        kind
    }

    /// Scan the next token.
    pub fn scan(&mut self) -> SyntaxKind {
        self.full_start = self.pos;
        self.token_flags = TokenFlags::empty();
        self.token_value.clear();
        self.skip_trivia();
        self.token_start = self.pos;

        let Some(ch) = self.char_at(self.pos) else {
            self.token = SyntaxKind::EndOfFileToken;
            return self.token;
        };
        let next = self.byte_at(self.pos + 1);
        let next2 = self.byte_at(self.pos + 2);

        use SyntaxKind::*;
        match ch {
            '"' | '\'' => self.scan_string(ch),
            '`' => {
                self.pos += 1;
                self.scan_template(true)
            }
            '0'..='9' => self.scan_number(),
            '.' => {
                if next.is_some_and(|b| b.is_ascii_digit()) {
                    self.scan_number()
                } else if next == Some(b'.') && next2 == Some(b'.') {
                    self.finish(DotDotDotToken, 3)
                } else {
                    self.finish(DotToken, 1)
                }
            }
            '{' => self.finish(OpenBraceToken, 1),
            '}' => self.finish(CloseBraceToken, 1),
            '(' => self.finish(OpenParenToken, 1),
            ')' => self.finish(CloseParenToken, 1),
            '[' => self.finish(OpenBracketToken, 1),
            ']' => self.finish(CloseBracketToken, 1),
            ';' => self.finish(SemicolonToken, 1),
            ',' => self.finish(CommaToken, 1),
            ':' => self.finish(ColonToken, 1),
            '~' => self.finish(TildeToken, 1),
            '@' => self.finish(AtToken, 1),
            // `>` is always scanned alone; the parser joins `>>`, `>=`, ... on demand.
            '>' => self.finish(GreaterThanToken, 1),
            '?' => match (next, next2) {
                (Some(b'?'), Some(b'=')) => self.finish(QuestionQuestionEqualsToken, 3),
                (Some(b'?'), _) => self.finish(QuestionQuestionToken, 2),
                (Some(b'.'), d) if !d.is_some_and(|b| b.is_ascii_digit()) => {
                    self.finish(QuestionDotToken, 2)
                }
                _ => self.finish(QuestionToken, 1),
            },
            '<' => match (next, next2) {
                (Some(b'<'), Some(b'=')) => self.finish(LessThanLessThanEqualsToken, 3),
                (Some(b'<'), _) => self.finish(LessThanLessThanToken, 2),
                (Some(b'='), _) => self.finish(LessThanEqualsToken, 2),
                _ => self.finish(LessThanToken, 1),
            },
            '=' => match (next, next2) {
                (Some(b'='), Some(b'=')) => self.finish(EqualsEqualsEqualsToken, 3),
                (Some(b'='), _) => self.finish(EqualsEqualsToken, 2),
                (Some(b'>'), _) => self.finish(EqualsGreaterThanToken, 2),
                _ => self.finish(EqualsToken, 1),
            },
            '!' => match (next, next2) {
                (Some(b'='), Some(b'=')) => self.finish(ExclamationEqualsEqualsToken, 3),
                (Some(b'='), _) => self.finish(ExclamationEqualsToken, 2),
                _ => self.finish(ExclamationToken, 1),
            },
            '+' => match next {
                Some(b'+') => self.finish(PlusPlusToken, 2),
                Some(b'=') => self.finish(PlusEqualsToken, 2),
                _ => self.finish(PlusToken, 1),
            },
            '-' => match next {
                Some(b'-') => self.finish(MinusMinusToken, 2),
                Some(b'=') => self.finish(MinusEqualsToken, 2),
                _ => self.finish(MinusToken, 1),
            },
            '*' => match (next, next2) {
                (Some(b'*'), Some(b'=')) => self.finish(AsteriskAsteriskEqualsToken, 3),
                (Some(b'*'), _) => self.finish(AsteriskAsteriskToken, 2),
                (Some(b'='), _) => self.finish(AsteriskEqualsToken, 2),
                _ => self.finish(AsteriskToken, 1),
            },
            '/' => match next {
                Some(b'=') => self.finish(SlashEqualsToken, 2),
                _ => self.finish(SlashToken, 1),
            },
            '%' => match next {
                Some(b'=') => self.finish(PercentEqualsToken, 2),
                _ => self.finish(PercentToken, 1),
            },
            '&' => match (next, next2) {
                (Some(b'&'), Some(b'=')) => self.finish(AmpersandAmpersandEqualsToken, 3),
                (Some(b'&'), _) => self.finish(AmpersandAmpersandToken, 2),
                (Some(b'='), _) => self.finish(AmpersandEqualsToken, 2),
                _ => self.finish(AmpersandToken, 1),
            },
            '|' => match (next, next2) {
                (Some(b'|'), Some(b'=')) => self.finish(BarBarEqualsToken, 3),
                (Some(b'|'), _) => self.finish(BarBarToken, 2),
                (Some(b'='), _) => self.finish(BarEqualsToken, 2),
                _ => self.finish(BarToken, 1),
            },
            '^' => match next {
                Some(b'=') => self.finish(CaretEqualsToken, 2),
                _ => self.finish(CaretToken, 1),
            },
            '#' => {
                self.pos += 1;
                if self.char_at(self.pos).is_some_and(is_identifier_start) {
                    self.scan_identifier_rest();
                    self.token_value = self.token_text().to_string();
                    self.token = PrivateIdentifier;
                } else {
                    self.set_error("Invalid character.", self.token_start, self.pos);
                    self.token = Unknown;
                }
                self.token
            }
            c if is_identifier_start(c) => {
                self.scan_identifier_rest();
                let text = self.token_text().to_string();
                self.token = text_to_keyword(&text).unwrap_or(Identifier);
                self.token_value = text;
                self.token
            }
            c => {
                self.pos += c.len_utf8();
                self.set_error("Invalid character.", self.token_start, self.pos);
                self.token = Unknown;
                self.token
            }
        }
    }

    fn skip_trivia(&mut self) {
        if self.pos == 0 && self.text.starts_with("#!") {
            while let Some(ch) = self.char_at(self.pos) {
                if is_line_break(ch) {
                    break;
                }
                self.pos += ch.len_utf8();
            }
        }
        while let Some(ch) = self.char_at(self.pos) {
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                self.pos += ch.len_utf8();
            } else if is_white_space_single_line(ch) {
                self.pos += ch.len_utf8();
            } else if ch == '/' && self.byte_at(self.pos + 1) == Some(b'/') {
                let start = self.pos;
                while let Some(c) = self.char_at(self.pos) {
                    if is_line_break(c) {
                        break;
                    }
                    self.pos += c.len_utf8();
                }
                let trailing = self.char_at(self.pos).is_some_and(is_line_break);
                self.comments
                    .push(CommentRange::new(start as u32, self.pos as u32, false, trailing));
            } else if ch == '/' && self.byte_at(self.pos + 1) == Some(b'*') {
                let start = self.pos;
                let body_start = self.pos + 2;
                match self.text[body_start..].find("*/") {
                    Some(rel) => self.pos = body_start + rel + 2,
                    None => {
                        self.pos = self.text.len();
                        self.set_error("Unterminated comment", start, self.pos);
                    }
                }
                let body = &self.text[start..self.pos];
                if body.chars().any(is_line_break) {
                    self.token_flags |= TokenFlags::PRECEDING_LINE_BREAK;
                }
                let trailing = self.char_at(self.pos).is_some_and(is_line_break);
                self.comments
                    .push(CommentRange::new(start as u32, self.pos as u32, true, trailing));
            } else {
                break;
            }
        }
    }

    fn scan_identifier_rest(&mut self) {
        while let Some(ch) = self.char_at(self.pos) {
            if !is_identifier_part(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn scan_hex_digits(&mut self, count: usize) -> Option<u32> {
        let digits = self.text.get(self.pos..self.pos + count)?;
        let value = u32::from_str_radix(digits, 16).ok()?;
        self.pos += count;
        Some(value)
    }

    fn scan_escape(&mut self, out: &mut String) {
        // `self.pos` is just past the backslash.
        let Some(ch) = self.char_at(self.pos) else {
            return;
        };
        self.pos += ch.len_utf8();
        match ch {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'b' => out.push('\u{0008}'),
            'f' => out.push('\u{000C}'),
            'v' => out.push('\u{000B}'),
            '0' if !self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) => out.push('\0'),
            'x' => match self.scan_hex_digits(2).and_then(char::from_u32) {
                Some(c) => out.push(c),
                None => self.set_error("Hexadecimal digit expected.", self.pos, self.pos),
            },
            'u' => {
                let value = if self.byte_at(self.pos) == Some(b'{') {
                    match self.text[self.pos..].find('}') {
                        Some(rel) => {
                            let digits = &self.text[self.pos + 1..self.pos + rel];
                            let value = u32::from_str_radix(digits, 16).ok();
                            self.pos += rel + 1;
                            value
                        }
                        None => None,
                    }
                } else {
                    self.scan_hex_digits(4)
                };
                match value.and_then(char::from_u32) {
                    Some(c) => out.push(c),
                    None => out.push('\u{FFFD}'),
                }
            }
            '\r' => {
                if self.byte_at(self.pos) == Some(b'\n') {
                    self.pos += 1;
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
    }

    fn scan_string(&mut self, quote: char) -> SyntaxKind {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.set_error("Unterminated string constant.", self.token_start, self.pos);
                break;
            };
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\n' || ch == '\r' {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.set_error("Unterminated string constant.", self.token_start, self.pos);
                break;
            }
            self.pos += ch.len_utf8();
            if ch == '\\' {
                self.scan_escape(&mut value);
            } else {
                value.push(ch);
            }
        }
        self.token_value = value;
        self.token = SyntaxKind::StringLiteral;
        self.token
    }

    /// Scan a template chunk starting just past its opening delimiter
    /// (a backtick when `is_head`, otherwise the closing `}` of a substitution).
    fn scan_template(&mut self, is_head: bool) -> SyntaxKind {
        let chunk_start = self.pos;
        let kind = loop {
            let Some(ch) = self.char_at(self.pos) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.set_error("Unterminated template literal.", self.token_start, self.pos);
                break if is_head {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            };
            if ch == '`' {
                self.token_value = self.text[chunk_start..self.pos].to_string();
                self.pos += 1;
                break if is_head {
                    SyntaxKind::NoSubstitutionTemplateLiteral
                } else {
                    SyntaxKind::TemplateTail
                };
            }
            if ch == '$' && self.byte_at(self.pos + 1) == Some(b'{') {
                self.token_value = self.text[chunk_start..self.pos].to_string();
                self.pos += 2;
                break if is_head {
                    SyntaxKind::TemplateHead
                } else {
                    SyntaxKind::TemplateMiddle
                };
            }
            self.pos += ch.len_utf8();
            if ch == '\\' {
                if let Some(escaped) = self.char_at(self.pos) {
                    self.pos += escaped.len_utf8();
                }
            }
        };
        if self.token_flags.contains(TokenFlags::UNTERMINATED) {
            self.token_value = self.text[chunk_start..self.pos].to_string();
        }
        self.token = kind;
        kind
    }

    fn scan_number(&mut self) -> SyntaxKind {
        let start = self.pos;
        let radix_prefix = if self.byte_at(start) == Some(b'0') {
            match self.byte_at(start + 1) {
                Some(b'x' | b'X') => Some(16),
                Some(b'o' | b'O') => Some(8),
                Some(b'b' | b'B') => Some(2),
                _ => None,
            }
        } else {
            None
        };

        let mut is_bigint_candidate = true;
        if let Some(radix) = radix_prefix {
            self.pos += 2;
            while let Some(b) = self.byte_at(self.pos) {
                if b == b'_' || (b as char).is_digit(radix) {
                    self.pos += 1;
                } else {
                    break;
                }
            }
        } else {
            self.skip_decimal_digits();
            if self.byte_at(self.pos) == Some(b'.') {
                is_bigint_candidate = false;
                self.pos += 1;
                self.skip_decimal_digits();
            }
            if matches!(self.byte_at(self.pos), Some(b'e' | b'E')) {
                let save = self.pos;
                self.pos += 1;
                if matches!(self.byte_at(self.pos), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                if self.byte_at(self.pos).is_some_and(|b| b.is_ascii_digit()) {
                    is_bigint_candidate = false;
                    self.skip_decimal_digits();
                } else {
                    self.pos = save;
                }
            }
        }

        let kind = if is_bigint_candidate && self.byte_at(self.pos) == Some(b'n') {
            self.pos += 1;
            SyntaxKind::BigIntLiteral
        } else {
            SyntaxKind::NumericLiteral
        };
        if self.char_at(self.pos).is_some_and(is_identifier_start) {
            self.set_error(
                "An identifier or keyword cannot immediately follow a numeric literal.",
                self.pos,
                self.pos + 1,
            );
        }
        self.token_value = self.text[start..self.pos].to_string();
        self.token = kind;
        kind
    }

    fn skip_decimal_digits(&mut self) {
        while let Some(b) = self.byte_at(self.pos) {
            if b.is_ascii_digit() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Join a scanned `>` with the characters that follow it.
    pub fn re_scan_greater_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::GreaterThanToken {
            return self.token;
        }
        use SyntaxKind::*;
        let kind = match (
            self.byte_at(self.pos),
            self.byte_at(self.pos + 1),
            self.byte_at(self.pos + 2),
        ) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => {
                self.pos += 3;
                GreaterThanGreaterThanGreaterThanEqualsToken
            }
            (Some(b'>'), Some(b'>'), _) => {
                self.pos += 2;
                GreaterThanGreaterThanGreaterThanToken
            }
            (Some(b'>'), Some(b'='), _) => {
                self.pos += 2;
                GreaterThanGreaterThanEqualsToken
            }
            (Some(b'>'), _, _) => {
                self.pos += 1;
                GreaterThanGreaterThanToken
            }
            (Some(b'='), _, _) => {
                self.pos += 1;
                GreaterThanEqualsToken
            }
            _ => GreaterThanToken,
        };
        self.token = kind;
        kind
    }

    /// Rescan a `/` or `/=` token as a regular expression literal.
    pub fn re_scan_slash_token(&mut self) -> SyntaxKind {
        if !matches!(self.token, SyntaxKind::SlashToken | SyntaxKind::SlashEqualsToken) {
            return self.token;
        }
        let mut p = self.token_start + 1;
        let mut in_class = false;
        loop {
            let Some(ch) = self.char_at(p) else {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.set_error(
                    "Unterminated regular expression literal.",
                    self.token_start,
                    p,
                );
                break;
            };
            if is_line_break(ch) {
                self.token_flags |= TokenFlags::UNTERMINATED;
                self.set_error(
                    "Unterminated regular expression literal.",
                    self.token_start,
                    p,
                );
                break;
            }
            p += ch.len_utf8();
            match ch {
                '\\' => {
                    if let Some(escaped) = self.char_at(p)
                        && !is_line_break(escaped)
                    {
                        p += escaped.len_utf8();
                    }
                }
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        self.pos = p;
        self.scan_identifier_rest();
        self.token_value = self.token_text().to_string();
        self.token = SyntaxKind::RegularExpressionLiteral;
        self.token
    }

    /// Rescan a `}` as the continuation of a template literal.
    pub fn re_scan_template_token(&mut self) -> SyntaxKind {
        if self.token != SyntaxKind::CloseBraceToken {
            return self.token;
        }
        self.pos = self.token_start + 1;
        self.scan_template(false)
    }
}
