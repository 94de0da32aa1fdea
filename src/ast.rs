//! Syntax tree produced by the parser and consumed by the code generator.
//!
//! Nodes own their children through `Box`, so every tree is strictly
//! tree-shaped. `Display` reconstructs source text that parses back into an
//! equal tree.
//!
//! Operator chains fold into `BinOp` nodes as deep as the chain is long, so
//! printing, comparing and dropping an `Expr` walk an explicit stack instead
//! of recursing.

use std::fmt;
use std::mem;

/// Binary operators recognised by the language. All bind equally and
/// associate to the left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Eq,
  Ne,
  Lt,
  Le,
  Gt,
  Ge,
}

impl BinaryOp {
  /// Map operator text such as `"<="` to its variant.
  pub fn from_symbol(symbol: &str) -> Option<Self> {
    let op = match symbol {
      "+" => Self::Add,
      "-" => Self::Sub,
      "*" => Self::Mul,
      "/" => Self::Div,
      "==" => Self::Eq,
      "!=" => Self::Ne,
      "<" => Self::Lt,
      "<=" => Self::Le,
      ">" => Self::Gt,
      ">=" => Self::Ge,
      _ => return None,
    };
    Some(op)
  }

  /// Source text of the operator.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Sub => "-",
      Self::Mul => "*",
      Self::Div => "/",
      Self::Eq => "==",
      Self::Ne => "!=",
      Self::Lt => "<",
      Self::Le => "<=",
      Self::Gt => ">",
      Self::Ge => ">=",
    }
  }
}

impl fmt::Display for BinaryOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
  pub name: String,
}

impl Identifier {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

#[derive(Debug, Clone)]
pub enum Expr {
  /// Literal kept as its source text.
  Num { value: String },
  Identifier(Identifier),
  BinOp {
    left: Box<Expr>,
    op: BinaryOp,
    right: Box<Expr>,
  },
}

impl Expr {
  pub fn number(value: impl Into<String>) -> Self {
    Self::Num {
      value: value.into(),
    }
  }

  pub fn ident(name: impl Into<String>) -> Self {
    Self::Identifier(Identifier::new(name))
  }

  pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
    Self::BinOp {
      left: Box::new(left),
      op,
      right: Box::new(right),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
  Assign {
    identifier: Identifier,
    value: Expr,
  },
  While {
    condition: Expr,
    body: Box<Stmt>,
  },
  If {
    condition: Expr,
    then_body: Box<Stmt>,
    else_body: Option<Box<Stmt>>,
  },
}

impl Stmt {
  pub fn assign(name: impl Into<String>, value: Expr) -> Self {
    Self::Assign {
      identifier: Identifier::new(name),
      value,
    }
  }

  pub fn while_loop(condition: Expr, body: Stmt) -> Self {
    Self::While {
      condition,
      body: Box::new(body),
    }
  }

  pub fn if_else(condition: Expr, then_body: Stmt, else_body: Option<Stmt>) -> Self {
    Self::If {
      condition,
      then_body: Box::new(then_body),
      else_body: else_body.map(Box::new),
    }
  }
}

/// Top-level statements in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
  pub statements: Vec<Stmt>,
}

/// Pending work while printing an expression.
enum PrintStep<'a> {
  Expr(&'a Expr),
  Op(BinaryOp),
}

impl fmt::Display for Expr {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut pending = vec![PrintStep::Expr(self)];
    while let Some(step) = pending.pop() {
      match step {
        PrintStep::Expr(Self::Num { value }) => f.write_str(value)?,
        PrintStep::Expr(Self::Identifier(ident)) => f.write_str(&ident.name)?,
        PrintStep::Expr(Self::BinOp { left, op, right }) => {
          pending.push(PrintStep::Expr(&**right));
          pending.push(PrintStep::Op(*op));
          pending.push(PrintStep::Expr(&**left));
        }
        PrintStep::Op(op) => write!(f, " {op} ")?,
      }
    }
    Ok(())
  }
}

impl PartialEq for Expr {
  fn eq(&self, other: &Self) -> bool {
    let mut pending = vec![(self, other)];
    while let Some(pair) = pending.pop() {
      match pair {
        (Self::Num { value: a }, Self::Num { value: b }) if a == b => {}
        (Self::Identifier(a), Self::Identifier(b)) if a == b => {}
        (
          Self::BinOp {
            left: left_a,
            op: op_a,
            right: right_a,
          },
          Self::BinOp {
            left: left_b,
            op: op_b,
            right: right_b,
          },
        ) if op_a == op_b => {
          pending.push((&**right_a, &**right_b));
          pending.push((&**left_a, &**left_b));
        }
        _ => return false,
      }
    }
    true
  }
}

impl Eq for Expr {}

/// Move a `BinOp` child out of `slot` onto `pending`, leaving a leaf behind.
fn detach(slot: &mut Expr, pending: &mut Vec<Expr>) {
  if matches!(slot, Expr::BinOp { .. }) {
    pending.push(mem::replace(slot, Expr::Num { value: String::new() }));
  }
}

impl Drop for Expr {
  fn drop(&mut self) {
    let Self::BinOp { left, right, .. } = self else {
      return;
    };
    let mut pending = Vec::new();
    detach(left, &mut pending);
    detach(right, &mut pending);
    // Each popped node has its children detached before it drops, so the
    // nested drop below never goes deeper than one level.
    while let Some(mut node) = pending.pop() {
      if let Self::BinOp { left, right, .. } = &mut node {
        detach(left, &mut pending);
        detach(right, &mut pending);
      }
    }
  }
}

impl fmt::Display for Stmt {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Assign { identifier, value } => write!(f, "{} = {value};", identifier.name),
      Self::While { condition, body } => write!(f, "while ({condition}) {body}"),
      Self::If {
        condition,
        then_body,
        else_body,
      } => {
        write!(f, "if ({condition}) {then_body}")?;
        if let Some(else_body) = else_body {
          write!(f, " else {else_body}")?;
        }
        Ok(())
      }
    }
  }
}

impl fmt::Display for Program {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for stmt in &self.statements {
      writeln!(f, "{stmt}")?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn operator_symbols_round_trip() {
    for op in [
      BinaryOp::Add,
      BinaryOp::Sub,
      BinaryOp::Mul,
      BinaryOp::Div,
      BinaryOp::Eq,
      BinaryOp::Ne,
      BinaryOp::Lt,
      BinaryOp::Le,
      BinaryOp::Gt,
      BinaryOp::Ge,
    ] {
      assert_eq!(BinaryOp::from_symbol(op.symbol()), Some(op));
    }
    assert_eq!(BinaryOp::from_symbol("%"), None);
  }

  #[test]
  fn prints_nested_statements() {
    let stmt = Stmt::while_loop(
      Expr::binary(Expr::ident("i"), BinaryOp::Lt, Expr::number("10")),
      Stmt::if_else(
        Expr::ident("c"),
        Stmt::assign("i", Expr::binary(Expr::ident("i"), BinaryOp::Add, Expr::number("1"))),
        Some(Stmt::assign("c", Expr::number("0"))),
      ),
    );
    assert_eq!(
      stmt.to_string(),
      "while (i < 10) if (c) i = i + 1; else c = 0;"
    );
  }

  fn left_chain(terms: usize) -> Expr {
    let mut expr = Expr::number("1");
    for _ in 1..terms {
      expr = Expr::binary(expr, BinaryOp::Add, Expr::number("1"));
    }
    expr
  }

  #[test]
  fn long_chains_print_compare_and_drop() {
    let chain = left_chain(200_000);
    let printed = chain.to_string();
    assert!(printed.starts_with("1 + 1 + 1"));
    assert_eq!(printed.len(), 1 + 4 * 199_999);

    assert!(chain == left_chain(200_000));
    assert!(chain != left_chain(199_999));
  }

  #[test]
  fn right_nested_chains_drop() {
    let mut expr = Expr::ident("x");
    for _ in 0..200_000 {
      expr = Expr::binary(Expr::ident("y"), BinaryOp::Mul, expr);
    }
    drop(expr);
  }

  #[test]
  fn operators_must_match_for_equality() {
    let sum = Expr::binary(Expr::ident("a"), BinaryOp::Add, Expr::ident("b"));
    let diff = Expr::binary(Expr::ident("a"), BinaryOp::Sub, Expr::ident("b"));
    assert_ne!(sum, diff);
    assert_ne!(sum, Expr::ident("a"));
  }
}
