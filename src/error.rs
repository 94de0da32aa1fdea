//! Error type shared by every stage of the pipeline.
//!
//! Each failure is a distinct variant so callers can match on the kind of
//! problem; `render` turns any located error into a caret diagnostic against
//! the original source text.

use std::fmt;

use snafu::Snafu;

use crate::tokenizer::TokenKind;

pub type CompileResult<T> = Result<T, CompileError>;

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
  Kind(TokenKind),
  /// A `NUMBER` or `ID` token starting a term.
  Operand,
  EndOfInput,
}

impl fmt::Display for Expected {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Kind(kind) => write!(f, "{kind}"),
      Self::Operand => f.write_str("NUMBER or ID"),
      Self::EndOfInput => f.write_str("end of input"),
    }
  }
}

/// What the parser actually saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
  Kind(TokenKind),
  EndOfInput,
}

impl fmt::Display for Found {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Kind(kind) => write!(f, "{kind}"),
      Self::EndOfInput => f.write_str("end of input"),
    }
  }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum CompileError {
  #[snafu(display("invalid token '{ch}'"))]
  InvalidChar { ch: char, loc: usize },

  #[snafu(display("expected {expected}, but got {found}"))]
  UnexpectedToken {
    expected: Expected,
    found: Found,
    loc: Option<usize>,
  },

  #[snafu(display("unsupported operator \"{op}\""))]
  UnknownOperator { op: String, loc: Option<usize> },

  #[snafu(display("statements nested deeper than {limit} levels"))]
  NestingTooDeep { limit: usize, loc: Option<usize> },
}

impl CompileError {
  /// Byte offset into the source the error points at, when known.
  pub fn loc(&self) -> Option<usize> {
    match self {
      Self::InvalidChar { loc, .. } => Some(*loc),
      Self::UnexpectedToken { loc, .. }
      | Self::UnknownOperator { loc, .. }
      | Self::NestingTooDeep { loc, .. } => *loc,
    }
  }

  /// Format the error against `source`, marking the offending column with a
  /// caret. Errors without a location render as the bare message.
  pub fn render(&self, source: &str) -> String {
    let Some(loc) = self.loc() else {
      return self.to_string();
    };

    let mut safe_loc = loc.min(source.len());
    while !source.is_char_boundary(safe_loc) {
      safe_loc -= 1;
    }
    let line_start = source[..safe_loc].rfind('\n').map_or(0, |i| i + 1);
    let line_end = source[safe_loc..]
      .find('\n')
      .map_or(source.len(), |i| safe_loc + i);
    let line_no = source[..line_start].matches('\n').count() + 1;
    let column = source[line_start..safe_loc].chars().count();

    let gutter = format!("{line_no} | ");
    let marker = format!("{}^", " ".repeat(gutter.len() + column));
    format!(
      "{gutter}{}\n{marker} {self}",
      &source[line_start..line_end]
    )
  }
}
