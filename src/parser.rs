//! Recursive-descent parser over the token vector.
//!
//! Grammar:
//!
//! ```text
//! statement  := while_stmt | if_stmt | assignment END
//! assignment := ID ASSIGN expr
//! while_stmt := WHILE LPAREN expr RPAREN statement
//! if_stmt    := IF LPAREN expr RPAREN statement (ELSE statement)?
//! expr       := term (OP term)*
//! term       := NUMBER | ID
//! ```
//!
//! Operators have no precedence levels; chains fold to the left. The first
//! error aborts the parse.

use tracing::debug;

use crate::ast::{BinaryOp, Expr, Identifier, Program, Stmt};
use crate::error::{
  CompileResult, Expected, Found, NestingTooDeepSnafu, UnexpectedTokenSnafu,
  UnknownOperatorSnafu,
};
use crate::options::CompileOptions;
use crate::tokenizer::{Token, TokenKind};

/// Parse exactly one statement spanning the whole token stream.
pub fn parse(tokens: Vec<Token>) -> CompileResult<Stmt> {
  parse_with(tokens, &CompileOptions::default())
}

/// `parse` with an explicit nesting limit.
pub fn parse_with(tokens: Vec<Token>, options: &CompileOptions) -> CompileResult<Stmt> {
  let mut parser = Parser::new(tokens, options);
  let stmt = parser.statement()?;
  parser.expect_end_of_input()?;
  Ok(stmt)
}

/// Parse statements until the stream runs out. An empty stream is an empty
/// program.
pub fn parse_program(tokens: Vec<Token>) -> CompileResult<Program> {
  parse_program_with(tokens, &CompileOptions::default())
}

/// `parse_program` with an explicit nesting limit.
pub fn parse_program_with(tokens: Vec<Token>, options: &CompileOptions) -> CompileResult<Program> {
  let mut parser = Parser::new(tokens, options);
  let mut statements = Vec::new();
  while !parser.is_eof() {
    statements.push(parser.statement()?);
  }
  debug!(statements = statements.len(), "parsed program");
  Ok(Program { statements })
}

/// Cursor over the token vector. Owns the tokens; advances `pos` as it
/// consumes them.
pub struct Parser {
  tokens: Vec<Token>,
  pos: usize,
  depth: usize,
  max_depth: usize,
}

impl Parser {
  /// Take ownership of the tokens; parsing starts at the first one.
  pub fn new(tokens: Vec<Token>, options: &CompileOptions) -> Self {
    Self {
      tokens,
      pos: 0,
      depth: 0,
      max_depth: options.max_depth,
    }
  }

  /// Parse one statement, failing once nesting exceeds the configured limit.
  pub fn statement(&mut self) -> CompileResult<Stmt> {
    if self.depth >= self.max_depth {
      return NestingTooDeepSnafu {
        limit: self.max_depth,
        loc: self.current_loc(),
      }
      .fail();
    }

    self.depth += 1;
    let result = match self.peek_kind() {
      Some(TokenKind::While) => self.while_statement(),
      Some(TokenKind::If) => self.if_statement(),
      _ => self.assignment_statement(),
    };
    self.depth -= 1;
    result
  }

  fn assignment_statement(&mut self) -> CompileResult<Stmt> {
    // Only bare assignments carry a terminator; loop and branch bodies
    // supply their own.
    let stmt = self.assignment()?;
    self.consume(TokenKind::End)?;
    Ok(stmt)
  }

  fn assignment(&mut self) -> CompileResult<Stmt> {
    let name = self.consume(TokenKind::Id)?.text;
    self.consume(TokenKind::Assign)?;
    let value = self.expr()?;
    Ok(Stmt::Assign {
      identifier: Identifier { name },
      value,
    })
  }

  fn while_statement(&mut self) -> CompileResult<Stmt> {
    self.consume(TokenKind::While)?;
    let condition = self.condition()?;
    let body = self.statement()?;
    Ok(Stmt::while_loop(condition, body))
  }

  fn if_statement(&mut self) -> CompileResult<Stmt> {
    self.consume(TokenKind::If)?;
    let condition = self.condition()?;
    let then_body = self.statement()?;
    let else_body = if self.equal(TokenKind::Else) {
      Some(self.statement()?)
    } else {
      None
    };
    Ok(Stmt::if_else(condition, then_body, else_body))
  }

  fn condition(&mut self) -> CompileResult<Expr> {
    self.consume(TokenKind::LParen)?;
    let condition = self.expr()?;
    self.consume(TokenKind::RParen)?;
    Ok(condition)
  }

  fn expr(&mut self) -> CompileResult<Expr> {
    let mut node = self.term()?;
    while self.peek_kind() == Some(TokenKind::Op) {
      let token = self.consume(TokenKind::Op)?;
      let Some(op) = BinaryOp::from_symbol(&token.text) else {
        return UnknownOperatorSnafu {
          op: token.text,
          loc: token.loc,
        }
        .fail();
      };
      let rhs = self.term()?;
      node = Expr::binary(node, op, rhs);
    }
    Ok(node)
  }

  fn term(&mut self) -> CompileResult<Expr> {
    match self.peek_kind() {
      Some(TokenKind::Number) => {
        let token = self.consume(TokenKind::Number)?;
        Ok(Expr::number(token.text))
      }
      Some(TokenKind::Id) => {
        let token = self.consume(TokenKind::Id)?;
        Ok(Expr::ident(token.text))
      }
      _ => self.unexpected(Expected::Operand),
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn peek_kind(&self) -> Option<TokenKind> {
    self.peek().map(|token| token.kind)
  }

  fn is_eof(&self) -> bool {
    self.pos >= self.tokens.len()
  }

  /// Consume the current token if it has the given kind.
  fn equal(&mut self, kind: TokenKind) -> bool {
    if self.peek_kind() == Some(kind) {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume a token of `kind`, failing with what was found instead.
  fn consume(&mut self, kind: TokenKind) -> CompileResult<Token> {
    match self.peek() {
      Some(token) if token.kind == kind => {
        let token = token.clone();
        self.pos += 1;
        Ok(token)
      }
      _ => self.unexpected(Expected::Kind(kind)),
    }
  }

  fn expect_end_of_input(&self) -> CompileResult<()> {
    if self.is_eof() {
      Ok(())
    } else {
      self.unexpected(Expected::EndOfInput)
    }
  }

  /// Location for diagnostics: the current token, or just past the last one
  /// when the stream is exhausted.
  fn current_loc(&self) -> Option<usize> {
    match self.peek() {
      Some(token) => token.loc,
      None => self
        .tokens
        .last()
        .and_then(|last| last.loc.map(|loc| loc + last.text.len())),
    }
  }

  fn unexpected<T>(&self, expected: Expected) -> CompileResult<T> {
    let found = match self.peek() {
      Some(token) => Found::Kind(token.kind),
      None => Found::EndOfInput,
    };
    UnexpectedTokenSnafu {
      expected,
      found,
      loc: self.current_loc(),
    }
    .fail()
  }
}
