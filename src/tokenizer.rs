//! Lexical analysis: turns raw source text into a flat vector of tokens.
//!
//! The parser only depends on `Token` and `TokenKind`; any producer of that
//! sequence can stand in for `tokenize`. Multi-character operators are matched
//! before single-character ones to avoid ambiguity.

use std::fmt;

use tracing::debug;

use crate::error::{CompileResult, InvalidCharSnafu};

/// Kinds of tokens the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Number,
  Id,
  Op,
  Assign,
  While,
  If,
  Else,
  LParen,
  RParen,
  End,
}

impl TokenKind {
  /// Upper-case name used in diagnostics.
  pub fn name(self) -> &'static str {
    match self {
      Self::Number => "NUMBER",
      Self::Id => "ID",
      Self::Op => "OP",
      Self::Assign => "ASSIGN",
      Self::While => "WHILE",
      Self::If => "IF",
      Self::Else => "ELSE",
      Self::LParen => "LPAREN",
      Self::RParen => "RPAREN",
      Self::End => "END",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A `(kind, text)` pair, optionally anchored at a byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub text: String,
  pub loc: Option<usize>,
}

impl Token {
  /// Token without a source position, as handed over by an external lexer.
  pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
    Self {
      kind,
      text: text.into(),
      loc: None,
    }
  }

  /// Token anchored at byte offset `loc` of the source.
  pub fn at(kind: TokenKind, text: impl Into<String>, loc: usize) -> Self {
    Self {
      kind,
      text: text.into(),
      loc: Some(loc),
    }
  }
}

fn keyword(ident: &str) -> Option<TokenKind> {
  match ident {
    "while" => Some(TokenKind::While),
    "if" => Some(TokenKind::If),
    "else" => Some(TokenKind::Else),
    _ => None,
  }
}

/// Lex `input` into tokens. End of input is the end of the vector; no
/// sentinel token is appended.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if c.is_ascii_digit() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
      }
      tokens.push(Token::at(TokenKind::Number, &input[start..i], start));
      continue;
    }

    if c.is_ascii_alphabetic() || c == b'_' {
      let start = i;
      while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
        i += 1;
      }
      let text = &input[start..i];
      let kind = keyword(text).unwrap_or(TokenKind::Id);
      tokens.push(Token::at(kind, text, start));
      continue;
    }

    if let Some(op) = ["==", "!=", "<=", ">="]
      .into_iter()
      .find(|op| input[i..].starts_with(op))
    {
      tokens.push(Token::at(TokenKind::Op, op, i));
      i += op.len();
      continue;
    }

    let kind = match c {
      b'+' | b'-' | b'*' | b'/' | b'<' | b'>' => Some(TokenKind::Op),
      b'=' => Some(TokenKind::Assign),
      b'(' => Some(TokenKind::LParen),
      b')' => Some(TokenKind::RParen),
      b';' => Some(TokenKind::End),
      _ => None,
    };
    if let Some(kind) = kind {
      tokens.push(Token::at(kind, &input[i..i + 1], i));
      i += 1;
      continue;
    }

    let ch = input[i..].chars().next().unwrap_or('\0');
    return InvalidCharSnafu { ch, loc: i }.fail();
  }

  debug!(count = tokens.len(), "tokenized source");
  Ok(tokens)
}
