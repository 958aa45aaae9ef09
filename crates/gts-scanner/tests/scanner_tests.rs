//! Tests for the scanner.

use gts_scanner::{ScannerState, SyntaxKind};

fn scan_all(source: &str) -> Vec<(SyntaxKind, String)> {
    let mut scanner = ScannerState::new(source.to_string());
    let mut tokens = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        tokens.push((kind, scanner.token_text().to_string()));
    }
    tokens
}

#[test]
fn test_define_statement_tokens() {
    let tokens = scan_all("define character { id 1101; hint Cryo, 2 }");
    let kinds: Vec<SyntaxKind> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::OpenBraceToken,
            SyntaxKind::Identifier,
            SyntaxKind::NumericLiteral,
            SyntaxKind::SemicolonToken,
            SyntaxKind::Identifier,
            SyntaxKind::Identifier,
            SyntaxKind::CommaToken,
            SyntaxKind::NumericLiteral,
            SyntaxKind::CloseBraceToken,
        ]
    );
    assert_eq!(tokens[0].1, "define");
}

#[test]
fn test_keywords_and_contextual_words() {
    let tokens = scan_all("if query as typeof");
    assert_eq!(tokens[0].0, SyntaxKind::IfKeyword);
    assert_eq!(tokens[1].0, SyntaxKind::Identifier);
    assert_eq!(tokens[2].0, SyntaxKind::Identifier);
    assert_eq!(tokens[3].0, SyntaxKind::TypeOfKeyword);
}

#[test]
fn test_string_value_is_cooked() {
    let mut scanner = ScannerState::new(r#""a\nbA""#.to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.token_value(), "a\nbA");
    assert_eq!(scanner.token_text(), r#""a\nbA""#);
}

#[test]
fn test_unterminated_string_reports_error() {
    let mut scanner = ScannerState::new("'abc\nx".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert!(scanner.is_unterminated());
    assert!(scanner.error().is_some());
}

#[test]
fn test_line_break_flag_and_comments() {
    let mut scanner = ScannerState::new("a // note\n/* b */ c".to_string());
    scanner.scan();
    assert!(!scanner.has_preceding_line_break());
    scanner.scan();
    assert!(scanner.has_preceding_line_break());
    assert_eq!(scanner.token_value(), "c");
    let comments = scanner.comments();
    assert_eq!(comments.len(), 2);
    assert!(!comments[0].is_multi_line);
    assert!(comments[0].has_trailing_new_line);
    assert!(comments[1].is_multi_line);
}

#[test]
fn test_restore_state_drops_comments_scanned_after_snapshot() {
    let mut scanner = ScannerState::new("a /* x */ b".to_string());
    scanner.scan();
    let snapshot = scanner.save_state();
    scanner.scan();
    assert_eq!(scanner.comments().len(), 1);
    scanner.restore_state(snapshot);
    assert_eq!(scanner.comments().len(), 0);
    assert_eq!(scanner.token_value(), "a");
}

#[test]
fn test_greater_than_rescan() {
    let mut scanner = ScannerState::new("a >>>= b".to_string());
    scanner.scan();
    assert_eq!(scanner.scan(), SyntaxKind::GreaterThanToken);
    assert_eq!(
        scanner.re_scan_greater_token(),
        SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
    );
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
}

#[test]
fn test_regex_rescan() {
    let mut scanner = ScannerState::new("/[/]a\\//gi.x".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(scanner.re_scan_slash_token(), SyntaxKind::RegularExpressionLiteral);
    assert_eq!(scanner.token_text(), "/[/]a\\//gi");
    assert_eq!(scanner.scan(), SyntaxKind::DotToken);
}

#[test]
fn test_template_rescan() {
    let mut scanner = ScannerState::new("`a${b}c${d}e`".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::TemplateHead);
    assert_eq!(scanner.token_value(), "a");
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.scan(), SyntaxKind::CloseBraceToken);
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateMiddle);
    assert_eq!(scanner.token_value(), "c");
    scanner.scan();
    scanner.scan();
    assert_eq!(scanner.re_scan_template_token(), SyntaxKind::TemplateTail);
    assert_eq!(scanner.token_value(), "e");
}

#[test]
fn test_numbers() {
    let tokens = scan_all("0x1F 1_000 .5 1e3 10n 1.5e-2");
    let kinds: Vec<SyntaxKind> = tokens.iter().map(|(k, _)| *k).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::NumericLiteral,
            SyntaxKind::BigIntLiteral,
            SyntaxKind::NumericLiteral,
        ]
    );
    assert_eq!(tokens[5].1, "1.5e-2");
}

#[test]
fn test_optional_chain_vs_conditional_number() {
    let tokens = scan_all("a?.b c?.5:1");
    assert_eq!(tokens[1].0, SyntaxKind::QuestionDotToken);
    assert_eq!(tokens[4].0, SyntaxKind::QuestionToken);
    assert_eq!(tokens[5].1, ".5");
}

#[test]
fn test_private_identifier() {
    let tokens = scan_all("this.#count");
    assert_eq!(tokens[2].0, SyntaxKind::PrivateIdentifier);
    assert_eq!(tokens[2].1, "#count");
}

#[test]
fn test_dummy_placeholder_is_invalid_character() {
    let mut scanner = ScannerState::new("\u{2716}".to_string());
    assert_eq!(scanner.scan(), SyntaxKind::Unknown);
    assert!(scanner.error().is_some());
}
