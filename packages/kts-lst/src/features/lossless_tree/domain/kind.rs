//! Lossless tree node kinds

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal flavour, enough to pick the builtin type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LiteralKind {
    Integer,
    Long,
    Unsigned,
    UnsignedLong,
    Double,
    Float,
    Boolean,
    Char,
    Null,
}

impl LiteralKind {
    /// Builtin type of a literal of this kind
    pub fn builtin_type(&self) -> &'static str {
        match self {
            LiteralKind::Integer => "kotlin.Int",
            LiteralKind::Long => "kotlin.Long",
            LiteralKind::Unsigned => "kotlin.UInt",
            LiteralKind::UnsignedLong => "kotlin.ULong",
            LiteralKind::Double => "kotlin.Double",
            LiteralKind::Float => "kotlin.Float",
            LiteralKind::Boolean => "kotlin.Boolean",
            LiteralKind::Char => "kotlin.Char",
            LiteralKind::Null => "kotlin.Nothing",
        }
    }
}

/// Syntax node kind
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LstKind {
    // File structure
    SourceFile,
    PackageHeader,
    ImportList,
    Import,

    // Declarations
    PropertyDeclaration,
    VariableDeclaration,
    FunctionDeclaration,
    ClassDeclaration,
    Parameter,
    Parameters,
    LambdaParameters,

    // Calls and lambdas
    Call,
    CallSuffix,
    ValueArguments,
    ValueArgument,
    AnnotatedLambda,
    Lambda,

    // Blocks
    Statements,
    Block,

    // Expressions
    Navigation,
    NavigationSuffix,
    Infix,
    Binary,
    Unary,
    Assignment,
    Parenthesized,
    If,
    When,
    Try,
    Loop,
    Jump,
    StringLiteral,
    Interpolation,
    Literal(LiteralKind),
    Identifier,
    TypeReference,
    This,

    // Leaves and recovery
    Token,
    Missing,
    Eof,
    Error,
    Unparsed,

    /// Grammar node with no dedicated kind, by grammar name
    Other(String),
}

impl LstKind {
    pub fn as_str(&self) -> &str {
        match self {
            LstKind::SourceFile => "SourceFile",
            LstKind::PackageHeader => "PackageHeader",
            LstKind::ImportList => "ImportList",
            LstKind::Import => "Import",
            LstKind::PropertyDeclaration => "PropertyDeclaration",
            LstKind::VariableDeclaration => "VariableDeclaration",
            LstKind::FunctionDeclaration => "FunctionDeclaration",
            LstKind::ClassDeclaration => "ClassDeclaration",
            LstKind::Parameter => "Parameter",
            LstKind::Parameters => "Parameters",
            LstKind::LambdaParameters => "LambdaParameters",
            LstKind::Call => "Call",
            LstKind::CallSuffix => "CallSuffix",
            LstKind::ValueArguments => "ValueArguments",
            LstKind::ValueArgument => "ValueArgument",
            LstKind::AnnotatedLambda => "AnnotatedLambda",
            LstKind::Lambda => "Lambda",
            LstKind::Statements => "Statements",
            LstKind::Block => "Block",
            LstKind::Navigation => "Navigation",
            LstKind::NavigationSuffix => "NavigationSuffix",
            LstKind::Infix => "Infix",
            LstKind::Binary => "Binary",
            LstKind::Unary => "Unary",
            LstKind::Assignment => "Assignment",
            LstKind::Parenthesized => "Parenthesized",
            LstKind::If => "If",
            LstKind::When => "When",
            LstKind::Try => "Try",
            LstKind::Loop => "Loop",
            LstKind::Jump => "Jump",
            LstKind::StringLiteral => "StringLiteral",
            LstKind::Interpolation => "Interpolation",
            LstKind::Literal(_) => "Literal",
            LstKind::Identifier => "Identifier",
            LstKind::TypeReference => "TypeReference",
            LstKind::This => "This",
            LstKind::Token => "Token",
            LstKind::Missing => "Missing",
            LstKind::Eof => "Eof",
            LstKind::Error => "Error",
            LstKind::Unparsed => "Unparsed",
            LstKind::Other(name) => name,
        }
    }

    /// Kinds that carry a type attribution after the attribution pass
    pub fn is_typed(&self) -> bool {
        matches!(
            self,
            LstKind::Call
                | LstKind::Navigation
                | LstKind::Infix
                | LstKind::Identifier
                | LstKind::Literal(_)
                | LstKind::StringLiteral
                | LstKind::PropertyDeclaration
                | LstKind::Parameter
                | LstKind::VariableDeclaration
                | LstKind::TypeReference
                | LstKind::Import
        )
    }

    pub fn is_declaration(&self) -> bool {
        matches!(
            self,
            LstKind::PropertyDeclaration
                | LstKind::VariableDeclaration
                | LstKind::FunctionDeclaration
                | LstKind::ClassDeclaration
                | LstKind::Parameter
        )
    }

    /// Recovery kinds produced for input the grammar rejected
    pub fn is_recovery(&self) -> bool {
        matches!(self, LstKind::Error | LstKind::Missing | LstKind::Unparsed)
    }
}

impl fmt::Display for LstKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LstKind::Literal(kind) => write!(f, "Literal({:?})", kind),
            other => write!(f, "{}", other.as_str()),
        }
    }
}
