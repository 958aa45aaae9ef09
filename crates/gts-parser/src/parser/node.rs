//! AST node types.
//!
//! Every node carries its byte range and a `NodeData` payload. Children are
//! referenced by `NodeIndex` into the owning `NodeArena`. Host-language nodes
//! follow TypeScript compiler naming; the `define` extension adds the `Gts*`
//! variants.

use super::base::{NodeIndex, NodeList};
use bitflags::bitflags;
use gts_scanner::SyntaxKind;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct NodeFlags: u8 {
        /// Created by a pass; `pos`/`end` do not refer to source text.
        const SYNTHESIZED = 1 << 0;
        /// Zero-width placeholder created by loose parsing.
        const DUMMY = 1 << 1;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ModifierFlags: u16 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const STATIC = 1 << 3;
        const READONLY = 1 << 4;
        const ABSTRACT = 1 << 5;
        const OVERRIDE = 1 << 6;
        const DECLARE = 1 << 7;
        const ACCESSOR = 1 << 8;
        const ASYNC = 1 << 9;
        const IN = 1 << 10;
        const OUT = 1 << 11;
        const CONST = 1 << 12;

        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        /// Modifiers that have no runtime meaning.
        const TYPE_ONLY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits()
            | Self::ABSTRACT.bits() | Self::OVERRIDE.bits() | Self::DECLARE.bits();
    }
}

impl ModifierFlags {
    pub fn from_text(text: &str) -> Option<ModifierFlags> {
        Some(match text {
            "public" => ModifierFlags::PUBLIC,
            "private" => ModifierFlags::PRIVATE,
            "protected" => ModifierFlags::PROTECTED,
            "static" => ModifierFlags::STATIC,
            "readonly" => ModifierFlags::READONLY,
            "abstract" => ModifierFlags::ABSTRACT,
            "override" => ModifierFlags::OVERRIDE,
            "declare" => ModifierFlags::DECLARE,
            "accessor" => ModifierFlags::ACCESSOR,
            "async" => ModifierFlags::ASYNC,
            "in" => ModifierFlags::IN,
            "out" => ModifierFlags::OUT,
            "const" => ModifierFlags::CONST,
            _ => return None,
        })
    }

    /// Keywords in canonical print order.
    pub fn keywords(self) -> Vec<&'static str> {
        const ORDER: [(ModifierFlags, &str); 13] = [
            (ModifierFlags::DECLARE, "declare"),
            (ModifierFlags::PUBLIC, "public"),
            (ModifierFlags::PRIVATE, "private"),
            (ModifierFlags::PROTECTED, "protected"),
            (ModifierFlags::STATIC, "static"),
            (ModifierFlags::ABSTRACT, "abstract"),
            (ModifierFlags::OVERRIDE, "override"),
            (ModifierFlags::READONLY, "readonly"),
            (ModifierFlags::ACCESSOR, "accessor"),
            (ModifierFlags::ASYNC, "async"),
            (ModifierFlags::CONST, "const"),
            (ModifierFlags::IN, "in"),
            (ModifierFlags::OUT, "out"),
        ];
        ORDER
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, text)| *text)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub pos: u32,
    pub end: u32,
    pub flags: NodeFlags,
    pub data: NodeData,
}

impl Node {
    pub fn is_synthesized(&self) -> bool {
        self.flags.contains(NodeFlags::SYNTHESIZED)
    }

    pub fn is_dummy(&self) -> bool {
        self.flags.contains(NodeFlags::DUMMY)
    }

    pub fn kind_name(&self) -> &'static str {
        self.data.kind_name()
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierData {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralData {
    /// Cooked value (string contents, numeric text, regex text).
    pub value: String,
    /// Source spelling, when the literal came from source.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateElementData {
    pub raw: String,
    pub tail: bool,
}

/// Template expression or template literal type: `quasis.len() == expressions.len() + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateData {
    pub quasis: NodeList,
    pub expressions: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedTemplateData {
    pub tag: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub quasi: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementsData {
    pub elements: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertiesData {
    pub properties: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionData {
    pub expression: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAssignmentData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

/// `{ a }` or, in patterns, `{ a = 1 }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShorthandPropertyData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccessData {
    pub expression: NodeIndex,
    pub name: NodeIndex,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementAccessData {
    pub expression: NodeIndex,
    pub argument: NodeIndex,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallData {
    pub callee: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: NodeList,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewData {
    pub callee: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: Option<NodeList>,
}

/// Functions, arrows, and the callable part of methods and accessors.
/// An arrow whose `body` is not a `Block` has an expression body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionData {
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
    pub body: NodeIndex,
    pub is_async: bool,
    pub is_generator: bool,
    pub declare: bool,
}

impl FunctionData {
    pub fn new(parameters: NodeList, body: NodeIndex) -> Self {
        FunctionData {
            name: NodeIndex::NONE,
            type_parameters: None,
            parameters,
            return_type: NodeIndex::NONE,
            body,
            is_async: false,
            is_generator: false,
            declare: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassData {
    pub decorators: NodeList,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub extends: NodeIndex,
    pub extends_type_arguments: Option<NodeList>,
    pub implements: NodeList,
    pub members: NodeList,
    pub is_abstract: bool,
    pub declare: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Get,
    Set,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodData {
    pub decorators: NodeList,
    pub kind: MethodKind,
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub question: bool,
    pub function: FunctionData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclarationData {
    pub decorators: NodeList,
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub question: bool,
    pub exclamation: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSignatureData {
    pub modifiers: ModifierFlags,
    pub parameters: NodeList,
    pub type_annotation: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    pub decorators: NodeList,
    pub modifiers: ModifierFlags,
    pub dot_dot_dot: bool,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

impl ParameterData {
    pub fn new(name: NodeIndex) -> Self {
        ParameterData {
            decorators: NodeList::new(),
            modifiers: ModifierFlags::empty(),
            dot_dot_dot: false,
            name,
            question: false,
            type_annotation: NodeIndex::NONE,
            initializer: NodeIndex::NONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryData {
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YieldData {
    pub expression: NodeIndex,
    pub delegate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryData {
    pub left: NodeIndex,
    pub operator: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalData {
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

/// `x as T`, `x satisfies T`, `<T>x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAssertionData {
    pub expression: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionWithTypeArgumentsData {
    pub expression: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaPropertyData {
    pub keyword: SyntaxKind,
    pub name: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingElementData {
    pub dot_dot_dot: bool,
    pub property_name: NodeIndex,
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementsData {
    pub statements: NodeList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Var,
    Let,
    Const,
}

impl VariableKind {
    pub fn keyword(self) -> &'static str {
        match self {
            VariableKind::Var => "var",
            VariableKind::Let => "let",
            VariableKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStatementData {
    pub kind: VariableKind,
    pub declarations: NodeList,
    pub declare: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclarationData {
    pub name: NodeIndex,
    pub exclamation: bool,
    pub type_annotation: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfData {
    pub condition: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForData {
    pub initializer: NodeIndex,
    pub condition: NodeIndex,
    pub incrementor: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForInOfData {
    pub is_await: bool,
    pub initializer: NodeIndex,
    pub expression: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopData {
    pub condition: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpData {
    pub label: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryData {
    pub block: NodeIndex,
    pub catch_clause: NodeIndex,
    pub finally_block: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClauseData {
    pub variable: NodeIndex,
    pub type_annotation: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchData {
    pub expression: NodeIndex,
    pub cases: NodeList,
}

/// `case test:` or, when `test` is NONE, `default:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseClauseData {
    pub test: NodeIndex,
    pub statements: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledData {
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclarationData {
    pub type_only: bool,
    pub specifiers: NodeList,
    pub source: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSpecifierData {
    pub local: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifierData {
    pub type_only: bool,
    pub imported: NodeIndex,
    pub local: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportNamedData {
    pub type_only: bool,
    pub declaration: NodeIndex,
    pub specifiers: NodeList,
    pub source: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifierData {
    pub type_only: bool,
    pub local: NodeIndex,
    pub exported: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDefaultData {
    pub declaration: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportAllData {
    pub type_only: bool,
    pub exported: NodeIndex,
    pub source: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceData {
    pub declare: bool,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub extends: NodeList,
    pub members: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAliasData {
    pub declare: bool,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumData {
    pub declare: bool,
    pub is_const: bool,
    pub name: NodeIndex,
    pub members: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberData {
    pub name: NodeIndex,
    pub initializer: NodeIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleKeyword {
    Namespace,
    Module,
    Global,
}

/// `namespace A.B { }`: `body` is a nested `ModuleDeclaration` for dotted names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleData {
    pub declare: bool,
    pub keyword: ModuleKeyword,
    pub name: NodeIndex,
    pub body: NodeIndex,
}

// Types

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTypeData {
    pub keyword: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReferenceData {
    pub type_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedNameData {
    pub left: NodeIndex,
    pub right: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeData {
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedTupleMemberData {
    pub dot_dot_dot: bool,
    pub name: NodeIndex,
    pub question: bool,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypesData {
    pub types: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionTypeData {
    pub is_constructor: bool,
    pub is_abstract: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembersData {
    pub members: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertySignatureData {
    pub readonly: bool,
    pub name: NodeIndex,
    pub question: bool,
    pub type_annotation: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignatureData {
    pub kind: MethodKind,
    pub name: NodeIndex,
    pub question: bool,
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

/// Call (`(x): T`) and construct (`new (x): T`) signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureData {
    pub type_parameters: Option<NodeList>,
    pub parameters: NodeList,
    pub return_type: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeQueryData {
    pub expr_name: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeOperatorData {
    pub operator: String,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedAccessTypeData {
    pub object_type: NodeIndex,
    pub index_type: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalTypeData {
    pub check_type: NodeIndex,
    pub extends_type: NodeIndex,
    pub true_type: NodeIndex,
    pub false_type: NodeIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedModifier {
    Present,
    Plus,
    Minus,
}

impl MappedModifier {
    pub fn prefix(self) -> &'static str {
        match self {
            MappedModifier::Present => "",
            MappedModifier::Plus => "+",
            MappedModifier::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedTypeData {
    pub readonly_modifier: Option<MappedModifier>,
    /// A `TypeParameter` whose constraint is the `in` clause.
    pub type_parameter: NodeIndex,
    pub name_type: NodeIndex,
    pub question_modifier: Option<MappedModifier>,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypePredicateData {
    pub asserts: bool,
    pub parameter_name: NodeIndex,
    pub type_node: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterData {
    pub modifiers: ModifierFlags,
    pub name: NodeIndex,
    pub constraint: NodeIndex,
    pub default: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTypeData {
    pub is_typeof: bool,
    pub argument: NodeIndex,
    pub qualifier: NodeIndex,
    pub type_arguments: Option<NodeList>,
}

// GTS extension

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsDefineData {
    pub body: NodeIndex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAccess {
    Public,
    Protected,
    Private,
}

impl BindingAccess {
    pub fn from_text(text: &str) -> Option<BindingAccess> {
        match text {
            "public" => Some(BindingAccess::Public),
            "protected" => Some(BindingAccess::Protected),
            "private" => Some(BindingAccess::Private),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsNamedAttributeData {
    /// `Identifier` or `StringLiteral`.
    pub name: NodeIndex,
    pub body: NodeIndex,
    pub binding_access: Option<BindingAccess>,
    pub binding_name: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsAttributeBodyData {
    pub positional_attributes: NodeIndex,
    pub named_attributes: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsAttributeListData {
    pub attributes: NodeList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsNamedBlockData {
    pub attributes: NodeList,
    pub direct_action: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsShortcutFunctionData {
    /// `:( expr )` when true, `:{ stmts }` otherwise.
    pub expression: bool,
    pub body: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsShortcutArgumentData {
    pub property: NodeIndex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GtsQueryData {
    pub star: bool,
    pub argument: NodeIndex,
}

/// A declaration rendered by the printer's hook from a JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredData {
    pub payload: String,
}

macro_rules! node_data {
    ($($variant:ident $(($payload:ty))?,)*) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum NodeData {
            $($variant $(($payload))?,)*
        }

        impl NodeData {
            /// The variant name; extension nodes start with `Gts`.
            pub fn kind_name(&self) -> &'static str {
                match self {
                    $(NodeData::$variant { .. } => stringify!($variant),)*
                }
            }
        }
    };
}

node_data! {
    // Names and literals
    Identifier(IdentifierData),
    PrivateIdentifier(IdentifierData),
    StringLiteral(LiteralData),
    NumericLiteral(LiteralData),
    BigIntLiteral(LiteralData),
    RegularExpressionLiteral(LiteralData),
    BooleanLiteral(bool),
    NullLiteral,
    ThisExpression,
    SuperExpression,
    ImportKeyword,
    TemplateElement(TemplateElementData),
    TemplateExpression(TemplateData),
    TaggedTemplateExpression(TaggedTemplateData),

    // Expressions
    ArrayLiteralExpression(ElementsData),
    ObjectLiteralExpression(PropertiesData),
    PropertyAssignment(PropertyAssignmentData),
    ShorthandPropertyAssignment(ShorthandPropertyData),
    ComputedPropertyName(ExpressionData),
    SpreadElement(ExpressionData),
    OmittedExpression,
    PropertyAccessExpression(PropertyAccessData),
    ElementAccessExpression(ElementAccessData),
    CallExpression(CallData),
    NewExpression(NewData),
    ParenthesizedExpression(ExpressionData),
    FunctionExpression(FunctionData),
    ArrowFunction(FunctionData),
    ClassExpression(ClassData),
    PrefixUnaryExpression(UnaryData),
    PostfixUnaryExpression(UnaryData),
    AwaitExpression(ExpressionData),
    YieldExpression(YieldData),
    BinaryExpression(BinaryData),
    ConditionalExpression(ConditionalData),
    AsExpression(TypeAssertionData),
    SatisfiesExpression(TypeAssertionData),
    TypeAssertionExpression(TypeAssertionData),
    NonNullExpression(ExpressionData),
    ExpressionWithTypeArguments(ExpressionWithTypeArgumentsData),
    MetaProperty(MetaPropertyData),

    // Binding patterns
    ObjectBindingPattern(ElementsData),
    ArrayBindingPattern(ElementsData),
    BindingElement(BindingElementData),

    // Statements and declarations
    SourceFile(StatementsData),
    Block(StatementsData),
    EmptyStatement,
    DebuggerStatement,
    ExpressionStatement(ExpressionData),
    VariableStatement(VariableStatementData),
    VariableDeclaration(VariableDeclarationData),
    FunctionDeclaration(FunctionData),
    ClassDeclaration(ClassData),
    MethodDeclaration(MethodData),
    PropertyDeclaration(PropertyDeclarationData),
    ClassStaticBlock(StatementsData),
    IndexSignature(IndexSignatureData),
    Parameter(ParameterData),
    Decorator(ExpressionData),
    IfStatement(IfData),
    ForStatement(ForData),
    ForInStatement(ForInOfData),
    ForOfStatement(ForInOfData),
    WhileStatement(LoopData),
    DoStatement(LoopData),
    ReturnStatement(ExpressionData),
    ThrowStatement(ExpressionData),
    BreakStatement(JumpData),
    ContinueStatement(JumpData),
    TryStatement(TryData),
    CatchClause(CatchClauseData),
    SwitchStatement(SwitchData),
    CaseClause(CaseClauseData),
    LabeledStatement(LabeledData),
    ImportDeclaration(ImportDeclarationData),
    ImportDefaultSpecifier(LocalSpecifierData),
    ImportNamespaceSpecifier(LocalSpecifierData),
    ImportSpecifier(ImportSpecifierData),
    ExportNamedDeclaration(ExportNamedData),
    ExportSpecifier(ExportSpecifierData),
    ExportDefaultDeclaration(ExportDefaultData),
    ExportAllDeclaration(ExportAllData),
    InterfaceDeclaration(InterfaceData),
    TypeAliasDeclaration(TypeAliasData),
    EnumDeclaration(EnumData),
    EnumMember(EnumMemberData),
    ModuleDeclaration(ModuleData),
    ModuleBlock(StatementsData),

    // Types
    KeywordType(KeywordTypeData),
    ThisType,
    TypeReference(TypeReferenceData),
    QualifiedName(QualifiedNameData),
    ArrayType(TypeData),
    TupleType(ElementsData),
    NamedTupleMember(NamedTupleMemberData),
    OptionalType(TypeData),
    RestType(TypeData),
    UnionType(TypesData),
    IntersectionType(TypesData),
    FunctionType(FunctionTypeData),
    TypeLiteral(MembersData),
    PropertySignature(PropertySignatureData),
    MethodSignature(MethodSignatureData),
    CallSignature(SignatureData),
    ConstructSignature(SignatureData),
    TypeQuery(TypeQueryData),
    TypeOperator(TypeOperatorData),
    IndexedAccessType(IndexedAccessTypeData),
    ConditionalType(ConditionalTypeData),
    InferType(TypeData),
    MappedType(MappedTypeData),
    LiteralType(TypeData),
    ParenthesizedType(TypeData),
    TypePredicate(TypePredicateData),
    TemplateLiteralType(TemplateData),
    TypeParameter(TypeParameterData),
    ImportType(ImportTypeData),

    // GTS extension
    GtsDefineStatement(GtsDefineData),
    GtsNamedAttributeDefinition(GtsNamedAttributeData),
    GtsAttributeBody(GtsAttributeBodyData),
    GtsPositionalAttributeList(GtsAttributeListData),
    GtsNamedAttributeBlock(GtsNamedBlockData),
    GtsDirectFunction(StatementsData),
    GtsShortcutFunction(GtsShortcutFunctionData),
    GtsShortcutArgument(GtsShortcutArgumentData),
    GtsQueryExpression(GtsQueryData),

    // Synthetic
    DeferredDeclaration(DeferredData),
}

impl NodeData {
    pub fn is_gts(&self) -> bool {
        self.kind_name().starts_with("Gts")
    }

    pub fn identifier_text(&self) -> Option<&str> {
        match self {
            NodeData::Identifier(ident) | NodeData::PrivateIdentifier(ident) => Some(&ident.text),
            _ => None,
        }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            NodeData::FunctionDeclaration(_)
                | NodeData::FunctionExpression(_)
                | NodeData::ArrowFunction(_)
                | NodeData::MethodDeclaration(_)
        )
    }

    /// The callable part of a function-like node.
    pub fn function_data(&self) -> Option<&FunctionData> {
        match self {
            NodeData::FunctionDeclaration(f)
            | NodeData::FunctionExpression(f)
            | NodeData::ArrowFunction(f) => Some(f),
            NodeData::MethodDeclaration(m) => Some(&m.function),
            _ => None,
        }
    }
}

macro_rules! for_each_slot {
    ($data:expr, $one:ident, $($r:tt)+) => {{
        use NodeData as D;
        match $data {
            D::Identifier(_)
            | D::PrivateIdentifier(_)
            | D::StringLiteral(_)
            | D::NumericLiteral(_)
            | D::BigIntLiteral(_)
            | D::RegularExpressionLiteral(_)
            | D::BooleanLiteral(_)
            | D::NullLiteral
            | D::ThisExpression
            | D::SuperExpression
            | D::ImportKeyword
            | D::TemplateElement(_)
            | D::OmittedExpression
            | D::EmptyStatement
            | D::DebuggerStatement
            | D::KeywordType(_)
            | D::ThisType
            | D::DeferredDeclaration(_) => {}
            D::TemplateExpression(d) | D::TemplateLiteralType(d) => {
                for c in $($r)+ d.quasis.nodes { $one(c); };
                for c in $($r)+ d.expressions.nodes { $one(c); };
            }
            D::TaggedTemplateExpression(d) => {
                $one($($r)+ d.tag);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
                $one($($r)+ d.quasi);
            }
            D::ArrayLiteralExpression(d)
            | D::ObjectBindingPattern(d)
            | D::ArrayBindingPattern(d)
            | D::TupleType(d) => for c in $($r)+ d.elements.nodes { $one(c); },
            D::ObjectLiteralExpression(d) => for c in $($r)+ d.properties.nodes { $one(c); },
            D::PropertyAssignment(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.initializer);
            }
            D::ShorthandPropertyAssignment(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.initializer);
            }
            D::ComputedPropertyName(d)
            | D::SpreadElement(d)
            | D::ParenthesizedExpression(d)
            | D::AwaitExpression(d)
            | D::NonNullExpression(d)
            | D::ExpressionStatement(d)
            | D::ReturnStatement(d)
            | D::ThrowStatement(d)
            | D::Decorator(d) => $one($($r)+ d.expression),
            D::PropertyAccessExpression(d) => {
                $one($($r)+ d.expression);
                $one($($r)+ d.name);
            }
            D::ElementAccessExpression(d) => {
                $one($($r)+ d.expression);
                $one($($r)+ d.argument);
            }
            D::CallExpression(d) => {
                $one($($r)+ d.callee);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.arguments.nodes { $one(c); };
            }
            D::NewExpression(d) => {
                $one($($r)+ d.callee);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
                if let Some(l) = $($r)+ d.arguments { for c in $($r)+ l.nodes { $one(c); }; }
            }
            D::FunctionExpression(d) | D::ArrowFunction(d) | D::FunctionDeclaration(d) => {
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.parameters.nodes { $one(c); };
                $one($($r)+ d.return_type);
                $one($($r)+ d.body);
            }
            D::ClassExpression(d) | D::ClassDeclaration(d) => {
                for c in $($r)+ d.decorators.nodes { $one(c); };
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                $one($($r)+ d.extends);
                if let Some(l) = $($r)+ d.extends_type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.implements.nodes { $one(c); };
                for c in $($r)+ d.members.nodes { $one(c); };
            }
            D::PrefixUnaryExpression(d) | D::PostfixUnaryExpression(d) => $one($($r)+ d.operand),
            D::YieldExpression(d) => $one($($r)+ d.expression),
            D::BinaryExpression(d) => {
                $one($($r)+ d.left);
                $one($($r)+ d.right);
            }
            D::ConditionalExpression(d) => {
                $one($($r)+ d.condition);
                $one($($r)+ d.when_true);
                $one($($r)+ d.when_false);
            }
            D::AsExpression(d) | D::SatisfiesExpression(d) => {
                $one($($r)+ d.expression);
                $one($($r)+ d.type_node);
            }
            D::TypeAssertionExpression(d) => {
                $one($($r)+ d.type_node);
                $one($($r)+ d.expression);
            }
            D::ExpressionWithTypeArguments(d) => {
                $one($($r)+ d.expression);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
            }
            D::MetaProperty(d) => $one($($r)+ d.name),
            D::BindingElement(d) => {
                $one($($r)+ d.property_name);
                $one($($r)+ d.name);
                $one($($r)+ d.initializer);
            }
            D::SourceFile(d)
            | D::Block(d)
            | D::ClassStaticBlock(d)
            | D::ModuleBlock(d)
            | D::GtsDirectFunction(d) => for c in $($r)+ d.statements.nodes { $one(c); },
            D::VariableStatement(d) => for c in $($r)+ d.declarations.nodes { $one(c); },
            D::VariableDeclaration(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.type_annotation);
                $one($($r)+ d.initializer);
            }
            D::MethodDeclaration(d) => {
                for c in $($r)+ d.decorators.nodes { $one(c); };
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.function.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.function.parameters.nodes { $one(c); };
                $one($($r)+ d.function.return_type);
                $one($($r)+ d.function.body);
            }
            D::PropertyDeclaration(d) => {
                for c in $($r)+ d.decorators.nodes { $one(c); };
                $one($($r)+ d.name);
                $one($($r)+ d.type_annotation);
                $one($($r)+ d.initializer);
            }
            D::IndexSignature(d) => {
                for c in $($r)+ d.parameters.nodes { $one(c); };
                $one($($r)+ d.type_annotation);
            }
            D::Parameter(d) => {
                for c in $($r)+ d.decorators.nodes { $one(c); };
                $one($($r)+ d.name);
                $one($($r)+ d.type_annotation);
                $one($($r)+ d.initializer);
            }
            D::IfStatement(d) => {
                $one($($r)+ d.condition);
                $one($($r)+ d.then_statement);
                $one($($r)+ d.else_statement);
            }
            D::ForStatement(d) => {
                $one($($r)+ d.initializer);
                $one($($r)+ d.condition);
                $one($($r)+ d.incrementor);
                $one($($r)+ d.statement);
            }
            D::ForInStatement(d) | D::ForOfStatement(d) => {
                $one($($r)+ d.initializer);
                $one($($r)+ d.expression);
                $one($($r)+ d.statement);
            }
            D::WhileStatement(d) => {
                $one($($r)+ d.condition);
                $one($($r)+ d.statement);
            }
            D::DoStatement(d) => {
                $one($($r)+ d.statement);
                $one($($r)+ d.condition);
            }
            D::BreakStatement(d) | D::ContinueStatement(d) => $one($($r)+ d.label),
            D::TryStatement(d) => {
                $one($($r)+ d.block);
                $one($($r)+ d.catch_clause);
                $one($($r)+ d.finally_block);
            }
            D::CatchClause(d) => {
                $one($($r)+ d.variable);
                $one($($r)+ d.type_annotation);
                $one($($r)+ d.block);
            }
            D::SwitchStatement(d) => {
                $one($($r)+ d.expression);
                for c in $($r)+ d.cases.nodes { $one(c); };
            }
            D::CaseClause(d) => {
                $one($($r)+ d.test);
                for c in $($r)+ d.statements.nodes { $one(c); };
            }
            D::LabeledStatement(d) => {
                $one($($r)+ d.label);
                $one($($r)+ d.statement);
            }
            D::ImportDeclaration(d) => {
                for c in $($r)+ d.specifiers.nodes { $one(c); };
                $one($($r)+ d.source);
            }
            D::ImportDefaultSpecifier(d) | D::ImportNamespaceSpecifier(d) => $one($($r)+ d.local),
            D::ImportSpecifier(d) => {
                $one($($r)+ d.imported);
                $one($($r)+ d.local);
            }
            D::ExportNamedDeclaration(d) => {
                $one($($r)+ d.declaration);
                for c in $($r)+ d.specifiers.nodes { $one(c); };
                $one($($r)+ d.source);
            }
            D::ExportSpecifier(d) => {
                $one($($r)+ d.local);
                $one($($r)+ d.exported);
            }
            D::ExportDefaultDeclaration(d) => $one($($r)+ d.declaration),
            D::ExportAllDeclaration(d) => {
                $one($($r)+ d.exported);
                $one($($r)+ d.source);
            }
            D::InterfaceDeclaration(d) => {
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.extends.nodes { $one(c); };
                for c in $($r)+ d.members.nodes { $one(c); };
            }
            D::TypeAliasDeclaration(d) => {
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                $one($($r)+ d.type_node);
            }
            D::EnumDeclaration(d) => {
                $one($($r)+ d.name);
                for c in $($r)+ d.members.nodes { $one(c); };
            }
            D::EnumMember(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.initializer);
            }
            D::ModuleDeclaration(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.body);
            }
            D::TypeReference(d) => {
                $one($($r)+ d.type_name);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
            }
            D::QualifiedName(d) => {
                $one($($r)+ d.left);
                $one($($r)+ d.right);
            }
            D::ArrayType(d)
            | D::OptionalType(d)
            | D::RestType(d)
            | D::InferType(d)
            | D::LiteralType(d)
            | D::ParenthesizedType(d) => $one($($r)+ d.type_node),
            D::NamedTupleMember(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.type_node);
            }
            D::UnionType(d) | D::IntersectionType(d) => for c in $($r)+ d.types.nodes { $one(c); },
            D::FunctionType(d) => {
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.parameters.nodes { $one(c); };
                $one($($r)+ d.return_type);
            }
            D::TypeLiteral(d) => for c in $($r)+ d.members.nodes { $one(c); },
            D::PropertySignature(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.type_annotation);
            }
            D::MethodSignature(d) => {
                $one($($r)+ d.name);
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.parameters.nodes { $one(c); };
                $one($($r)+ d.return_type);
            }
            D::CallSignature(d) | D::ConstructSignature(d) => {
                if let Some(l) = $($r)+ d.type_parameters { for c in $($r)+ l.nodes { $one(c); }; }
                for c in $($r)+ d.parameters.nodes { $one(c); };
                $one($($r)+ d.return_type);
            }
            D::TypeQuery(d) => {
                $one($($r)+ d.expr_name);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
            }
            D::TypeOperator(d) => $one($($r)+ d.type_node),
            D::IndexedAccessType(d) => {
                $one($($r)+ d.object_type);
                $one($($r)+ d.index_type);
            }
            D::ConditionalType(d) => {
                $one($($r)+ d.check_type);
                $one($($r)+ d.extends_type);
                $one($($r)+ d.true_type);
                $one($($r)+ d.false_type);
            }
            D::MappedType(d) => {
                $one($($r)+ d.type_parameter);
                $one($($r)+ d.name_type);
                $one($($r)+ d.type_node);
            }
            D::TypePredicate(d) => {
                $one($($r)+ d.parameter_name);
                $one($($r)+ d.type_node);
            }
            D::TypeParameter(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.constraint);
                $one($($r)+ d.default);
            }
            D::ImportType(d) => {
                $one($($r)+ d.argument);
                $one($($r)+ d.qualifier);
                if let Some(l) = $($r)+ d.type_arguments { for c in $($r)+ l.nodes { $one(c); }; }
            }
            D::GtsDefineStatement(d) => $one($($r)+ d.body),
            D::GtsNamedAttributeDefinition(d) => {
                $one($($r)+ d.name);
                $one($($r)+ d.body);
                $one($($r)+ d.binding_name);
            }
            D::GtsAttributeBody(d) => {
                $one($($r)+ d.positional_attributes);
                $one($($r)+ d.named_attributes);
            }
            D::GtsPositionalAttributeList(d) => for c in $($r)+ d.attributes.nodes { $one(c); },
            D::GtsNamedAttributeBlock(d) => {
                for c in $($r)+ d.attributes.nodes { $one(c); };
                $one($($r)+ d.direct_action);
            }
            D::GtsShortcutFunction(d) => $one($($r)+ d.body),
            D::GtsShortcutArgument(d) => $one($($r)+ d.property),
            D::GtsQueryExpression(d) => $one($($r)+ d.argument),
        }
    }};
}

impl NodeData {
    /// Visit each present child in source order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(NodeIndex)) {
        if let NodeData::TemplateExpression(d) | NodeData::TemplateLiteralType(d) = self {
            for (i, &quasi) in d.quasis.nodes.iter().enumerate() {
                f(quasi);
                if let Some(&expr) = d.expressions.nodes.get(i) {
                    f(expr);
                }
            }
            return;
        }
        let mut one = |idx: &NodeIndex| {
            if idx.is_some() {
                f(*idx);
            }
        };
        for_each_slot!(self, one, &)
    }

    /// Visit every child slot mutably, absent (`NONE`) slots included.
    pub fn for_each_child_mut(&mut self, f: &mut dyn FnMut(&mut NodeIndex)) {
        let mut one = |idx: &mut NodeIndex| f(idx);
        for_each_slot!(self, one, &mut)
    }

    pub fn children(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        self.for_each_child(&mut |idx| out.push(idx));
        out
    }

    pub fn has_children(&self) -> bool {
        let mut any = false;
        self.for_each_child(&mut |_| any = true);
        any
    }
}
