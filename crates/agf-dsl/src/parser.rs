use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use agf_core::Ending;

use crate::ast::{AdventureFile, ChoiceLine, SceneDecl, SceneStmt, Spanned, TargetRef};
use crate::lexer::Token;

type Span = SimpleSpan;

/// A syntax error with source span.
#[derive(Debug, Clone)]
pub struct SyntaxError {
    /// Byte range of the offending tokens.
    pub span: std::ops::Range<usize>,
    /// Human-readable description.
    pub message: String,
}

fn spanned<T>(node: T, span: Span) -> Spanned<T> {
    Spanned {
        node,
        span: span.into_range(),
    }
}

/// Build the full adventure-file parser.
///
/// All sub-parsers are defined inline so chumsky can infer the generic input
/// type.
fn adventure_parser<'a, I>() -> impl Parser<'a, I, AdventureFile, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = Span>,
{
    let kw = |k: &'static str| select! { Token::Word(ref w) if w.as_str() == k => () }.labelled(k);
    let word = select! { Token::Word(w) => w }.labelled("identifier");
    let string_lit = select! { Token::Str(s) => s }.labelled("string");
    let doc_string = select! { Token::DocString(s) => s }.labelled("narrative block");

    // Zero or more newlines
    let nl = just(Token::Newline).repeated().to(());
    // One or more newlines
    let nl1 = just(Token::Newline).repeated().at_least(1).to(());

    // Terminal markers. `end` is a legacy alias for `lose`.
    let ending = choice((
        kw("win").to(Ending::Win),
        kw("lose").to(Ending::Lose),
        kw("end").to(Ending::Lose),
    ))
    .labelled("ending");

    // Choice target: a marker keyword or a scene id. Markers win, which is
    // why they are reserved as scene ids.
    let target = choice((
        ending.clone().map(TargetRef::Ending),
        word.map(TargetRef::Scene),
    ))
    .map_with(|t, e| spanned(t, e.span()))
    .labelled("choice target");

    let title_stmt = kw("title")
        .ignore_then(string_lit)
        .map(SceneStmt::Title)
        .labelled("title");

    let narrative_stmt = doc_string.map(SceneStmt::Narrative).labelled("narrative");

    let choice_stmt = kw("choice")
        .ignore_then(string_lit)
        .then_ignore(just(Token::Arrow))
        .then(target)
        .map(|(label, target)| SceneStmt::Choice(ChoiceLine { label, target }))
        .labelled("choice");

    let ending_stmt = ending.map(SceneStmt::Ending).labelled("ending");

    let statement = choice((title_stmt, choice_stmt, ending_stmt, narrative_stmt))
        .map_with(|s, e| spanned(s, e.span()));

    // -- Block body: statements inside { } --
    let body = statement
        .separated_by(nl1.clone())
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(
            just(Token::LBrace).then(nl.clone()),
            nl.clone().then(just(Token::RBrace)),
        );

    // [start] scene <id> { ... }
    let scene_decl = kw("start")
        .or_not()
        .map(|s| s.is_some())
        .then_ignore(kw("scene"))
        .then(word.map_with(|w, e| spanned(w, e.span())))
        .then(body)
        .map(|((start, id), body)| SceneDecl { start, id, body })
        .labelled("scene declaration");

    // -- File --
    scene_decl
        .map_with(|decl, e| spanned(decl, e.span()))
        .separated_by(nl1)
        .allow_trailing()
        .collect::<Vec<_>>()
        .padded_by(nl)
        .then_ignore(end())
        .map(|scenes| AdventureFile { scenes })
}

/// Parse a token stream into an AST.
pub fn parse_tokens(
    tokens: &[(Token, std::ops::Range<usize>)],
) -> Result<AdventureFile, Vec<SyntaxError>> {
    let token_iter = tokens
        .iter()
        .map(|(tok, span)| (tok.clone(), Span::from(span.clone())));

    let len = tokens.last().map_or(0, |(_, s)| s.end);
    let eoi: Span = (len..len).into();
    let stream = Stream::from_iter(token_iter).map(eoi, |(t, s): (_, _)| (t, s));

    let (output, errors) = adventure_parser().parse(stream).into_output_errors();

    if let Some(ast) = output
        && errors.is_empty()
    {
        return Ok(ast);
    }

    Err(errors
        .into_iter()
        .map(|e| {
            let span = e.span();
            SyntaxError {
                span: span.into_range(),
                message: e.to_string(),
            }
        })
        .collect())
}
