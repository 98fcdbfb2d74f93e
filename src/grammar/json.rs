//! Built-in JSON grammar.
//!
//! Objects, arrays, pairs, and scalar values, with punctuation kept in the
//! tree but hidden from the canonical serialization. Malformed input is
//! absorbed into error nodes; the parser always produces a tree.

use logos::Logos;

use super::{Grammar, SymbolId, Token, lex_streaming};
use crate::parse::{ParseSession, TextCursor};

pub const DOCUMENT: SymbolId = SymbolId(0);
pub const OBJECT: SymbolId = SymbolId(1);
pub const ARRAY: SymbolId = SymbolId(2);
pub const PAIR: SymbolId = SymbolId(3);
pub const STRING: SymbolId = SymbolId(4);
pub const NUMBER: SymbolId = SymbolId(5);
pub const TRUE: SymbolId = SymbolId(6);
pub const FALSE: SymbolId = SymbolId(7);
pub const NULL: SymbolId = SymbolId(8);
pub const WHITESPACE: SymbolId = SymbolId(9);
pub const L_BRACE: SymbolId = SymbolId(10);
pub const R_BRACE: SymbolId = SymbolId(11);
pub const L_BRACKET: SymbolId = SymbolId(12);
pub const R_BRACKET: SymbolId = SymbolId(13);
pub const COMMA: SymbolId = SymbolId(14);
pub const COLON: SymbolId = SymbolId(15);
pub const WORD: SymbolId = SymbolId(16);

/// Kinds a value slot is prepared to resume from.
const VALUE_KINDS: &[SymbolId] = &[OBJECT, ARRAY, STRING, NUMBER, TRUE, FALSE, NULL];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[regex(r#""([^"\\]|\\.)*""#)]
    Str,

    // An unterminated string runs to end of input as a single error token,
    // so a later edit that closes it always lands inside the token's span.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedStr,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,
}

fn scan(rest: &str) -> (SymbolId, usize) {
    let mut lexer = RawToken::lexer(rest);
    match lexer.next() {
        None => (SymbolId::ERROR, rest.len()),
        Some(Ok(token)) => {
            let symbol = match token {
                RawToken::Whitespace => WHITESPACE,
                RawToken::LBrace => L_BRACE,
                RawToken::RBrace => R_BRACE,
                RawToken::LBracket => L_BRACKET,
                RawToken::RBracket => R_BRACKET,
                RawToken::Comma => COMMA,
                RawToken::Colon => COLON,
                RawToken::Str => STRING,
                RawToken::UnterminatedStr => SymbolId::ERROR,
                RawToken::Number => NUMBER,
                RawToken::Word => match lexer.slice() {
                    "true" => TRUE,
                    "false" => FALSE,
                    "null" => NULL,
                    _ => WORD,
                },
            };
            (symbol, lexer.span().end)
        }
        Some(Err(())) => (SymbolId::ERROR, error_len(rest, lexer.span().end)),
    }
}

fn error_len(rest: &str, span_end: usize) -> usize {
    if span_end > 0 {
        span_end
    } else {
        rest.chars().next().map_or(1, char::len_utf8)
    }
}

/// The JSON grammar.
pub struct Json;

impl Grammar for Json {
    fn name(&self) -> &'static str {
        "json"
    }

    fn root_symbol(&self) -> SymbolId {
        DOCUMENT
    }

    fn symbol_name(&self, symbol: SymbolId) -> &'static str {
        match symbol {
            DOCUMENT => "document",
            OBJECT => "object",
            ARRAY => "array",
            PAIR => "pair",
            STRING => "string",
            NUMBER => "number",
            TRUE => "true",
            FALSE => "false",
            NULL => "null",
            WHITESPACE => "whitespace",
            L_BRACE => "lbrace",
            R_BRACE => "rbrace",
            L_BRACKET => "lbracket",
            R_BRACKET => "rbracket",
            COMMA => "comma",
            COLON => "colon",
            WORD => "word",
            _ => "unknown",
        }
    }

    fn is_trivia(&self, symbol: SymbolId) -> bool {
        symbol == WHITESPACE
    }

    fn is_visible(&self, symbol: SymbolId) -> bool {
        !matches!(
            symbol,
            L_BRACE | R_BRACE | L_BRACKET | R_BRACKET | COMMA | COLON
        )
    }

    // Number lexing backtracks over a dangling exponent ("1e+" settles on
    // "1"), so the tokenizer can examine a few bytes past a token's end.
    fn lookahead_margin(&self) -> u32 {
        4
    }

    fn next_token(&self, cursor: &mut TextCursor<'_>) -> Option<Token> {
        lex_streaming(cursor, scan)
    }

    fn parse_root(&self, p: &mut ParseSession<'_>) {
        p.start_node(DOCUMENT);
        while p.current().is_some() {
            parse_value(p);
        }
        p.finish_node();
    }
}

fn parse_value(p: &mut ParseSession<'_>) {
    if p.try_reuse(VALUE_KINDS).is_some() {
        return;
    }
    match p.current() {
        Some(L_BRACE) => parse_object(p),
        Some(L_BRACKET) => parse_array(p),
        Some(STRING) | Some(NUMBER) | Some(TRUE) | Some(FALSE) | Some(NULL) => p.bump(),
        Some(SymbolId::ERROR) => p.bump(),
        Some(_) => p.bump_as(SymbolId::ERROR),
        None => {}
    }
}

fn parse_object(p: &mut ParseSession<'_>) {
    p.start_node(OBJECT);
    p.bump();
    loop {
        match p.current() {
            None => break,
            Some(R_BRACE) => {
                p.bump();
                break;
            }
            Some(COMMA) => p.bump(),
            Some(STRING) => {
                if p.try_reuse(&[PAIR]).is_none() {
                    parse_pair(p);
                }
            }
            Some(_) => p.bump_as(SymbolId::ERROR),
        }
    }
    p.finish_node();
}

fn parse_pair(p: &mut ParseSession<'_>) {
    p.start_node(PAIR);
    p.bump();
    p.eat(COLON);
    if !p.at(R_BRACE) && !p.at(COMMA) && !p.at_eof() {
        parse_value(p);
    }
    p.finish_node();
}

fn parse_array(p: &mut ParseSession<'_>) {
    p.start_node(ARRAY);
    p.bump();
    loop {
        match p.current() {
            None => break,
            Some(R_BRACKET) => {
                p.bump();
                break;
            }
            Some(COMMA) => p.bump(),
            Some(_) => parse_value(p),
        }
    }
    p.finish_node();
}
