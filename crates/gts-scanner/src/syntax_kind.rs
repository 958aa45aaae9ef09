//! Token kinds.
//!
//! Only reserved words get their own kind. Contextual words (`type`, `as`,
//! `define`, `query`, `let`, ...) scan as `Identifier` and are recognized by
//! the parser through their text.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    Unknown,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    BigIntLiteral,
    StringLiteral,
    RegularExpressionLiteral,
    NoSubstitutionTemplateLiteral,
    TemplateHead,
    TemplateMiddle,
    TemplateTail,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    EqualsGreaterThanToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    PlusPlusToken,
    MinusMinusToken,
    LessThanLessThanToken,
    GreaterThanGreaterThanToken,
    GreaterThanGreaterThanGreaterThanToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    ColonToken,
    AtToken,
    QuestionQuestionToken,

    // Assignments
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    AsteriskAsteriskEqualsToken,
    SlashEqualsToken,
    PercentEqualsToken,
    LessThanLessThanEqualsToken,
    GreaterThanGreaterThanEqualsToken,
    GreaterThanGreaterThanGreaterThanEqualsToken,
    AmpersandEqualsToken,
    BarEqualsToken,
    CaretEqualsToken,
    BarBarEqualsToken,
    AmpersandAmpersandEqualsToken,
    QuestionQuestionEqualsToken,

    // Names
    Identifier,
    PrivateIdentifier,

    // Reserved words
    BreakKeyword,
    CaseKeyword,
    CatchKeyword,
    ClassKeyword,
    ConstKeyword,
    ContinueKeyword,
    DebuggerKeyword,
    DefaultKeyword,
    DeleteKeyword,
    DoKeyword,
    ElseKeyword,
    EnumKeyword,
    ExportKeyword,
    ExtendsKeyword,
    FalseKeyword,
    FinallyKeyword,
    ForKeyword,
    FunctionKeyword,
    IfKeyword,
    ImportKeyword,
    InKeyword,
    InstanceOfKeyword,
    NewKeyword,
    NullKeyword,
    ReturnKeyword,
    SuperKeyword,
    SwitchKeyword,
    ThisKeyword,
    ThrowKeyword,
    TrueKeyword,
    TryKeyword,
    TypeOfKeyword,
    VarKeyword,
    VoidKeyword,
    WhileKeyword,
    WithKeyword,
}

impl SyntaxKind {
    pub fn is_keyword(self) -> bool {
        self >= SyntaxKind::BreakKeyword && self <= SyntaxKind::WithKeyword
    }

    /// Identifier or any reserved word (valid after `.` and as a property key).
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    pub fn is_assignment_operator(self) -> bool {
        self >= SyntaxKind::EqualsToken && self <= SyntaxKind::QuestionQuestionEqualsToken
    }

    pub fn is_literal(self) -> bool {
        self >= SyntaxKind::NumericLiteral && self <= SyntaxKind::NoSubstitutionTemplateLiteral
    }

    pub fn is_template_start(self) -> bool {
        matches!(
            self,
            SyntaxKind::NoSubstitutionTemplateLiteral | SyntaxKind::TemplateHead
        )
    }
}

static KEYWORDS: Lazy<FxHashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    use SyntaxKind::*;
    [
        ("break", BreakKeyword),
        ("case", CaseKeyword),
        ("catch", CatchKeyword),
        ("class", ClassKeyword),
        ("const", ConstKeyword),
        ("continue", ContinueKeyword),
        ("debugger", DebuggerKeyword),
        ("default", DefaultKeyword),
        ("delete", DeleteKeyword),
        ("do", DoKeyword),
        ("else", ElseKeyword),
        ("enum", EnumKeyword),
        ("export", ExportKeyword),
        ("extends", ExtendsKeyword),
        ("false", FalseKeyword),
        ("finally", FinallyKeyword),
        ("for", ForKeyword),
        ("function", FunctionKeyword),
        ("if", IfKeyword),
        ("import", ImportKeyword),
        ("in", InKeyword),
        ("instanceof", InstanceOfKeyword),
        ("new", NewKeyword),
        ("null", NullKeyword),
        ("return", ReturnKeyword),
        ("super", SuperKeyword),
        ("switch", SwitchKeyword),
        ("this", ThisKeyword),
        ("throw", ThrowKeyword),
        ("true", TrueKeyword),
        ("try", TryKeyword),
        ("typeof", TypeOfKeyword),
        ("var", VarKeyword),
        ("void", VoidKeyword),
        ("while", WhileKeyword),
        ("with", WithKeyword),
    ]
    .into_iter()
    .collect()
});

/// Look up a reserved word.
pub fn text_to_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORDS.get(text).copied()
}

/// Source text of a fixed-text token, for printing and error messages.
pub fn token_text(kind: SyntaxKind) -> &'static str {
    use SyntaxKind::*;
    match kind {
        OpenBraceToken => "{",
        CloseBraceToken => "}",
        OpenParenToken => "(",
        CloseParenToken => ")",
        OpenBracketToken => "[",
        CloseBracketToken => "]",
        DotToken => ".",
        DotDotDotToken => "...",
        SemicolonToken => ";",
        CommaToken => ",",
        QuestionDotToken => "?.",
        LessThanToken => "<",
        GreaterThanToken => ">",
        LessThanEqualsToken => "<=",
        GreaterThanEqualsToken => ">=",
        EqualsEqualsToken => "==",
        ExclamationEqualsToken => "!=",
        EqualsEqualsEqualsToken => "===",
        ExclamationEqualsEqualsToken => "!==",
        EqualsGreaterThanToken => "=>",
        PlusToken => "+",
        MinusToken => "-",
        AsteriskToken => "*",
        AsteriskAsteriskToken => "**",
        SlashToken => "/",
        PercentToken => "%",
        PlusPlusToken => "++",
        MinusMinusToken => "--",
        LessThanLessThanToken => "<<",
        GreaterThanGreaterThanToken => ">>",
        GreaterThanGreaterThanGreaterThanToken => ">>>",
        AmpersandToken => "&",
        BarToken => "|",
        CaretToken => "^",
        ExclamationToken => "!",
        TildeToken => "~",
        AmpersandAmpersandToken => "&&",
        BarBarToken => "||",
        QuestionToken => "?",
        ColonToken => ":",
        AtToken => "@",
        QuestionQuestionToken => "??",
        EqualsToken => "=",
        PlusEqualsToken => "+=",
        MinusEqualsToken => "-=",
        AsteriskEqualsToken => "*=",
        AsteriskAsteriskEqualsToken => "**=",
        SlashEqualsToken => "/=",
        PercentEqualsToken => "%=",
        LessThanLessThanEqualsToken => "<<=",
        GreaterThanGreaterThanEqualsToken => ">>=",
        GreaterThanGreaterThanGreaterThanEqualsToken => ">>>=",
        AmpersandEqualsToken => "&=",
        BarEqualsToken => "|=",
        CaretEqualsToken => "^=",
        BarBarEqualsToken => "||=",
        AmpersandAmpersandEqualsToken => "&&=",
        QuestionQuestionEqualsToken => "??=",
        BreakKeyword => "break",
        CaseKeyword => "case",
        CatchKeyword => "catch",
        ClassKeyword => "class",
        ConstKeyword => "const",
        ContinueKeyword => "continue",
        DebuggerKeyword => "debugger",
        DefaultKeyword => "default",
        DeleteKeyword => "delete",
        DoKeyword => "do",
        ElseKeyword => "else",
        EnumKeyword => "enum",
        ExportKeyword => "export",
        ExtendsKeyword => "extends",
        FalseKeyword => "false",
        FinallyKeyword => "finally",
        ForKeyword => "for",
        FunctionKeyword => "function",
        IfKeyword => "if",
        ImportKeyword => "import",
        InKeyword => "in",
        InstanceOfKeyword => "instanceof",
        NewKeyword => "new",
        NullKeyword => "null",
        ReturnKeyword => "return",
        SuperKeyword => "super",
        SwitchKeyword => "switch",
        ThisKeyword => "this",
        ThrowKeyword => "throw",
        TrueKeyword => "true",
        TryKeyword => "try",
        TypeOfKeyword => "typeof",
        VarKeyword => "var",
        VoidKeyword => "void",
        WhileKeyword => "while",
        WithKeyword => "with",
        EndOfFileToken => "end of file",
        _ => "",
    }
}
