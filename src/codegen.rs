//! Lowering from the syntax tree to three-address code.
//!
//! Instructions are plain strings in one of six shapes:
//!
//! ```text
//! <dst> = <src1> <op> <src2>
//! <name> = <value>
//! <label>:
//! goto <label>
//! if <cond> goto <label>
//! if not <cond> goto <label>
//! ```
//!
//! Temporaries and labels come from one counter and share the `t<N>`
//! namespace, so a label may be called `t7` just like a value.

use tracing::{debug, trace};

use crate::ast::{BinaryOp, Expr, Program, Stmt};

/// Pending work for `CodeGenerator::lower_expr`.
enum Step<'a> {
  Lower(&'a Expr),
  Combine(BinaryOp),
}

/// Lower a single statement with a fresh generator.
pub fn generate(stmt: &Stmt) -> Vec<String> {
  let mut codegen = CodeGenerator::new();
  codegen.lower_stmt(stmt);
  codegen.finish()
}

/// Lower every statement of `program` in order, sharing one counter.
pub fn generate_program(program: &Program) -> Vec<String> {
  let mut codegen = CodeGenerator::new();
  for stmt in &program.statements {
    codegen.lower_stmt(stmt);
  }
  codegen.finish()
}

/// Instruction buffer plus the fresh-name counter for one lowering run.
#[derive(Debug, Default)]
pub struct CodeGenerator {
  instructions: Vec<String>,
  temp_count: usize,
}

impl CodeGenerator {
  /// Empty buffer, counter at zero.
  pub fn new() -> Self {
    Self::default()
  }

  /// Allocate the next `t<N>` name. Never reuses a number.
  pub fn new_temp(&mut self) -> String {
    self.temp_count += 1;
    let name = format!("t{}", self.temp_count);
    trace!(%name, "allocated temporary");
    name
  }

  /// Hand back everything emitted so far.
  pub fn finish(self) -> Vec<String> {
    debug!(
      instructions = self.instructions.len(),
      temporaries = self.temp_count,
      "lowered to three-address code"
    );
    self.instructions
  }

  fn emit(&mut self, instr: String) {
    self.instructions.push(instr);
  }

  /// Emit code computing `expr` and return the operand naming its value.
  ///
  /// Operands are lowered left before right. The walk keeps its own work
  /// stack, so chain length never turns into call depth.
  pub fn lower_expr(&mut self, expr: &Expr) -> String {
    let mut pending = vec![Step::Lower(expr)];
    let mut operands: Vec<String> = Vec::new();

    while let Some(step) = pending.pop() {
      match step {
        Step::Lower(Expr::Num { value }) => operands.push(value.clone()),
        Step::Lower(Expr::Identifier(ident)) => operands.push(ident.name.clone()),
        Step::Lower(Expr::BinOp { left, op, right }) => {
          pending.push(Step::Combine(*op));
          pending.push(Step::Lower(&**right));
          pending.push(Step::Lower(&**left));
        }
        Step::Combine(op) => {
          let right = operands.pop().expect("binary operator has a right operand");
          let left = operands.pop().expect("binary operator has a left operand");
          let temp = self.new_temp();
          self.emit(format!("{temp} = {left} {op} {right}"));
          operands.push(temp);
        }
      }
    }

    operands.pop().expect("expression lowers to one operand")
  }

  /// Append the code for `stmt`. Recurses once per nested `while`/`if`;
  /// the parser bounds that depth, hand-built trees are trusted.
  pub fn lower_stmt(&mut self, stmt: &Stmt) {
    match stmt {
      Stmt::Assign { identifier, value } => {
        let value = self.lower_expr(value);
        self.emit(format!("{} = {value}", identifier.name));
      }
      Stmt::While { condition, body } => {
        let start_label = self.new_temp();
        let end_label = self.new_temp();
        self.emit(format!("{start_label}:"));
        let condition = self.lower_expr(condition);
        self.emit(format!("if not {condition} goto {end_label}"));
        self.lower_stmt(body);
        self.emit(format!("goto {start_label}"));
        self.emit(format!("{end_label}:"));
      }
      Stmt::If {
        condition,
        then_body,
        else_body,
      } => {
        let then_label = self.new_temp();
        let end_label = self.new_temp();
        let condition = self.lower_expr(condition);
        self.emit(format!("if {condition} goto {then_label}"));
        // The false path falls through into the else code.
        if let Some(else_body) = else_body {
          self.lower_stmt(else_body);
        }
        self.emit(format!("goto {end_label}"));
        self.emit(format!("{then_label}:"));
        self.lower_stmt(then_body);
        self.emit(format!("{end_label}:"));
      }
    }
  }
}
