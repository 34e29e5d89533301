//! Grammar node kind → tree kind
//!
//! The only place that knows the Kotlin grammar's node names.

use ::tree_sitter::Node;

use crate::features::lossless_tree::domain::{LiteralKind, LstKind};

pub(crate) fn map_kind(node: &Node, source: &str) -> LstKind {
    if node.is_missing() {
        return LstKind::Missing;
    }
    if node.is_error() {
        return LstKind::Error;
    }
    if !node.is_named() {
        return LstKind::Token;
    }
    map_named(node.kind(), || source.get(node.byte_range()).unwrap_or(""))
}

fn map_named<'s>(kind: &str, text: impl FnOnce() -> &'s str) -> LstKind {
    match kind {
        "source_file" => LstKind::SourceFile,
        "package_header" => LstKind::PackageHeader,
        "import_list" => LstKind::ImportList,
        "import_header" => LstKind::Import,

        // Declarations
        "property_declaration" => LstKind::PropertyDeclaration,
        "variable_declaration" => LstKind::VariableDeclaration,
        "function_declaration" => LstKind::FunctionDeclaration,
        "class_declaration" | "object_declaration" => LstKind::ClassDeclaration,
        "parameter" | "class_parameter" => LstKind::Parameter,
        "function_value_parameters" => LstKind::Parameters,
        "lambda_parameters" => LstKind::LambdaParameters,

        // Calls
        "call_expression" => LstKind::Call,
        "call_suffix" => LstKind::CallSuffix,
        "value_arguments" => LstKind::ValueArguments,
        "value_argument" => LstKind::ValueArgument,
        "annotated_lambda" => LstKind::AnnotatedLambda,
        "lambda_literal" => LstKind::Lambda,

        // Blocks
        "statements" => LstKind::Statements,
        "function_body" | "class_body" | "control_structure_body" | "block" => LstKind::Block,

        // Expressions
        "navigation_expression" => LstKind::Navigation,
        "navigation_suffix" => LstKind::NavigationSuffix,
        "infix_expression" => LstKind::Infix,
        "additive_expression"
        | "multiplicative_expression"
        | "comparison_expression"
        | "equality_expression"
        | "conjunction_expression"
        | "disjunction_expression"
        | "elvis_expression"
        | "range_expression"
        | "check_expression"
        | "as_expression" => LstKind::Binary,
        "prefix_expression" | "postfix_expression" => LstKind::Unary,
        "assignment" => LstKind::Assignment,
        "parenthesized_expression" => LstKind::Parenthesized,
        "if_expression" => LstKind::If,
        "when_expression" => LstKind::When,
        "try_expression" => LstKind::Try,
        "for_statement" | "while_statement" | "do_while_statement" => LstKind::Loop,
        "jump_expression" => LstKind::Jump,
        "this_expression" => LstKind::This,

        // Strings
        "string_literal" | "line_string_literal" | "multi_line_string_literal" => {
            LstKind::StringLiteral
        }
        "interpolated_expression"
        | "interpolated_identifier"
        | "line_string_expression"
        | "multi_line_string_expression"
        | "line_str_ref"
        | "multi_line_str_ref" => LstKind::Interpolation,

        // Literals
        "integer_literal" | "hex_literal" | "bin_literal" => LstKind::Literal(LiteralKind::Integer),
        "long_literal" => LstKind::Literal(LiteralKind::Long),
        "unsigned_literal" => {
            let text = text();
            if text.ends_with('L') || text.ends_with('l') {
                LstKind::Literal(LiteralKind::UnsignedLong)
            } else {
                LstKind::Literal(LiteralKind::Unsigned)
            }
        }
        "real_literal" => {
            let text = text();
            if text.ends_with('f') || text.ends_with('F') {
                LstKind::Literal(LiteralKind::Float)
            } else {
                LstKind::Literal(LiteralKind::Double)
            }
        }
        "boolean_literal" => LstKind::Literal(LiteralKind::Boolean),
        "character_literal" => LstKind::Literal(LiteralKind::Char),
        "null_literal" => LstKind::Literal(LiteralKind::Null),

        "simple_identifier" | "identifier" => LstKind::Identifier,
        "user_type" | "nullable_type" | "function_type" | "parenthesized_type" => {
            LstKind::TypeReference
        }

        other => LstKind::Other(other.to_string()),
    }
}
