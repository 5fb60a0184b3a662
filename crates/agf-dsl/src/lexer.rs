use logos::Logos;
use std::fmt;

/// Token type for the AGF format.
///
/// The lexer is deliberately simple — all keyword recognition happens in the
/// parser. Words like "scene", "choice", "win" are all `Token::Word`; the
/// parser decides what they mean from position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Left brace `{`.
    LBrace,
    /// Right brace `}`.
    RBrace,
    /// Choice arrow `->`.
    Arrow,
    /// Newline character (statement separator).
    Newline,
    /// Triple-quoted narrative block (`"""..."""`).
    DocString(String),
    /// Double-quoted string literal.
    Str(String),
    /// Bare word (identifier or keyword, disambiguated by the parser).
    Word(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Arrow => write!(f, "->"),
            Token::Newline => write!(f, "newline"),
            Token::DocString(_) => write!(f, "narrative block"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Word(w) => write!(f, "{w}"),
        }
    }
}

/// Internal logos token — borrows from source to avoid allocations during
/// lexing. Converted to owned `Token` after lexing.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"--[^\n]*")]
enum RawToken {
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("->")]
    Arrow,

    #[token("\n")]
    Newline,

    #[token("\"\"\"")]
    DocStringStart,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    Str,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_']*")]
    Word,
}

/// A lexer error with source location.
#[derive(Debug, Clone)]
pub struct LexError {
    /// Byte range of the erroneous input in the source.
    pub span: std::ops::Range<usize>,
    /// Human-readable description of the lexer error.
    pub message: String,
}

/// Lex source code into a sequence of `(Token, Span)` pairs.
///
/// Returns the token stream and any lexer errors. Lexing continues past
/// errors to collect as many tokens as possible.
pub fn lex(source: &str) -> (Vec<(Token, std::ops::Range<usize>)>, Vec<LexError>) {
    let mut tokens = Vec::new();
    let mut errors = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(raw) => {
                let token = match raw {
                    RawToken::LBrace => Token::LBrace,
                    RawToken::RBrace => Token::RBrace,
                    RawToken::Arrow => Token::Arrow,
                    RawToken::Newline => Token::Newline,
                    RawToken::DocStringStart => {
                        // Scan forward for closing """
                        let remainder = lexer.remainder();
                        match remainder.find("\"\"\"") {
                            Some(end_idx) => {
                                let content = &remainder[..end_idx];
                                lexer.bump(end_idx + 3);
                                let full_span = span.start..lexer.span().start;
                                tokens.push((Token::DocString(normalize_block(content)), full_span));
                                continue;
                            }
                            None => {
                                errors.push(LexError {
                                    span: span.clone(),
                                    message:
                                        "unterminated narrative block (missing closing \"\"\")"
                                            .to_string(),
                                });
                                continue;
                            }
                        }
                    }
                    RawToken::Str => {
                        let slice = lexer.slice();
                        Token::Str(unescape(&slice[1..slice.len() - 1]))
                    }
                    RawToken::Word => Token::Word(lexer.slice().to_string()),
                };
                tokens.push((token, span));
            }
            Err(()) => {
                errors.push(LexError {
                    span: span.clone(),
                    message: format!("unexpected character: {:?}", &source[span.clone()]),
                });
            }
        }
    }

    (tokens, errors)
}

/// Normalize a narrative block: trim every line, drop leading and trailing
/// blank lines, keep interior blank lines as paragraph breaks.
///
/// Indentation inside `"""` blocks is not significant, which lets the
/// serializer indent narrative text without perturbing round-trips.
fn normalize_block(s: &str) -> String {
    let lines: Vec<&str> = s.lines().map(str::trim).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(0);
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

/// Process escape sequences in a string literal.
///
/// Supports `\\`, `\n`, `\t`, `\"`. Unknown sequences are kept as-is.
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
