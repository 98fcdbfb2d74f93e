//! Built-in arithmetic grammar.
//!
//! Flat expression lists with parenthesized groups: `"1+2"` parses to
//! `(expr (num) (op) (num))`. Small enough to read in one sitting, but
//! nested groups give the incremental parser real subtrees to splice.

use logos::Logos;

use super::{Grammar, SymbolId, Token, lex_streaming};
use crate::parse::{ParseSession, TextCursor};

pub const EXPR: SymbolId = SymbolId(0);
pub const NUM: SymbolId = SymbolId(1);
pub const IDENT: SymbolId = SymbolId(2);
pub const OP: SymbolId = SymbolId(3);
pub const GROUP: SymbolId = SymbolId(4);
pub const WHITESPACE: SymbolId = SymbolId(5);
pub const L_PAREN: SymbolId = SymbolId(6);
pub const R_PAREN: SymbolId = SymbolId(7);

/// Kinds an item slot is prepared to resume from.
const ITEM_KINDS: &[SymbolId] = &[NUM, IDENT, OP, GROUP];

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"[+\-*/%=<>!&|^~?:;,.{}\[\]]")]
    Op,
}

fn scan(rest: &str) -> (SymbolId, usize) {
    let mut lexer = RawToken::lexer(rest);
    match lexer.next() {
        None => (SymbolId::ERROR, rest.len()),
        Some(Ok(token)) => {
            let symbol = match token {
                RawToken::Whitespace => WHITESPACE,
                RawToken::Number => NUM,
                RawToken::Ident => IDENT,
                RawToken::LParen => L_PAREN,
                RawToken::RParen => R_PAREN,
                RawToken::Op => OP,
            };
            (symbol, lexer.span().end)
        }
        Some(Err(())) => (SymbolId::ERROR, error_len(rest, lexer.span().end)),
    }
}

/// An error token covers what the lexer consumed, or one whole character
/// when it consumed nothing.
fn error_len(rest: &str, span_end: usize) -> usize {
    if span_end > 0 {
        span_end
    } else {
        rest.chars().next().map_or(1, char::len_utf8)
    }
}

/// The arithmetic grammar.
pub struct Arithmetic;

impl Grammar for Arithmetic {
    fn name(&self) -> &'static str {
        "arithmetic"
    }

    fn root_symbol(&self) -> SymbolId {
        EXPR
    }

    fn symbol_name(&self, symbol: SymbolId) -> &'static str {
        match symbol {
            EXPR => "expr",
            NUM => "num",
            IDENT => "ident",
            OP => "op",
            GROUP => "group",
            WHITESPACE => "whitespace",
            L_PAREN => "lparen",
            R_PAREN => "rparen",
            _ => "unknown",
        }
    }

    fn is_trivia(&self, symbol: SymbolId) -> bool {
        symbol == WHITESPACE
    }

    fn is_visible(&self, symbol: SymbolId) -> bool {
        symbol != L_PAREN && symbol != R_PAREN
    }

    fn next_token(&self, cursor: &mut TextCursor<'_>) -> Option<Token> {
        lex_streaming(cursor, scan)
    }

    fn parse_root(&self, p: &mut ParseSession<'_>) {
        p.start_node(EXPR);
        parse_items(p, false);
        p.finish_node();
    }
}

fn parse_items(p: &mut ParseSession<'_>, stop_at_rparen: bool) {
    loop {
        match p.current() {
            None => break,
            Some(R_PAREN) if stop_at_rparen => break,
            Some(_) => parse_item(p),
        }
    }
}

fn parse_item(p: &mut ParseSession<'_>) {
    if p.try_reuse(ITEM_KINDS).is_some() {
        return;
    }
    match p.current() {
        Some(NUM) | Some(IDENT) | Some(OP) => p.bump(),
        Some(L_PAREN) => parse_group(p),
        // A stray closing paren at the top level has nothing to close.
        Some(R_PAREN) => p.bump_as(SymbolId::ERROR),
        Some(_) => p.bump(),
        None => {}
    }
}

fn parse_group(p: &mut ParseSession<'_>) {
    p.start_node(GROUP);
    p.bump();
    if p.try_reuse(&[EXPR]).is_none() {
        p.start_node(EXPR);
        parse_items(p, true);
        p.finish_node();
    }
    p.eat(R_PAREN);
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Input, TextInput};
    use crate::parse::TextCursor;

    fn kinds(text: &str) -> Vec<SymbolId> {
        let input = TextInput::new(text);
        let mut cursor = TextCursor::new(&input);
        let grammar = Arithmetic;
        let mut out = Vec::new();
        while let Some(token) = grammar.next_token(&mut cursor) {
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn lexes_simple_expression() {
        assert_eq!(kinds("1+2"), vec![NUM, OP, NUM]);
    }

    #[test]
    fn lexes_whitespace_and_groups() {
        assert_eq!(
            kinds("(ab + 12)"),
            vec![L_PAREN, IDENT, WHITESPACE, OP, WHITESPACE, NUM, R_PAREN],
        );
    }

    #[test]
    fn unrecognized_bytes_become_error_tokens() {
        assert_eq!(kinds("1\u{7f}2"), vec![NUM, SymbolId::ERROR, NUM]);
    }

    #[test]
    fn token_positions_cover_the_input() {
        let input = TextInput::new("12 +\n3");
        let mut cursor = TextCursor::new(&input);
        let grammar = Arithmetic;
        let mut last_end = 0;
        while let Some(token) = grammar.next_token(&mut cursor) {
            assert_eq!(u32::from(token.start.bytes), last_end);
            last_end = u32::from(token.end.bytes);
        }
        assert_eq!(last_end, u32::from(input.len()));
    }
}
