//! The AGF text format: lexer, parser, validating compiler, and canonical
//! serializer.
//!
//! [`parse`] turns raw AGF text into a validated [`agf_core::Adventure`] or a
//! single [`ParseError`] carrying the failing location and a distinct cause.
//! [`serialize`] renders a validated adventure back to canonical text such
//! that parsing it again yields a structurally equal adventure. Both are pure
//! functions — no I/O happens in this crate.

/// AST produced by the parser, consumed by the compiler.
pub mod ast;
/// AST validation and assembly into an `Adventure`.
pub mod compiler;
/// Terminal rendering of parse errors.
pub mod diagnostics;
/// Token definitions and the logos lexer.
pub mod lexer;
/// Chumsky parser over the token stream.
pub mod parser;
/// Canonical text rendering of adventures.
pub mod serializer;

pub use compiler::{ParseError, ParseErrorKind};
pub use diagnostics::{Diagnostic, render_diagnostic};
pub use serializer::serialize;

use agf_core::Adventure;

/// Parse AGF source text into a validated [`Adventure`].
///
/// The pipeline short-circuits on the first failure: lexing, then grammar,
/// then the compiler's validation stages (ids, text, targets, start scene,
/// decision-XOR-terminus). Callers never see a partially built adventure.
pub fn parse(source: &str) -> Result<Adventure, ParseError> {
    let (tokens, lex_errors) = lexer::lex(source);
    if let Some(first) = lex_errors.into_iter().next() {
        return Err(ParseError::new(
            ParseErrorKind::Syntax(first.message),
            first.span,
            source,
        ));
    }

    let ast = match parser::parse_tokens(&tokens) {
        Ok(ast) => ast,
        Err(errors) => {
            let first = errors
                .into_iter()
                .min_by_key(|e| e.span.start)
                .unwrap_or_else(|| parser::SyntaxError {
                    span: source.len()..source.len(),
                    message: "unexpected end of input".to_string(),
                });
            return Err(ParseError::new(
                ParseErrorKind::Syntax(first.message),
                first.span,
                source,
            ));
        }
    };

    compiler::compile(&ast, source)
}
