//! Crate root: wires together the compilation pipeline.
//!
//! - `tokenizer` splits source text into `(kind, text)` tokens.
//! - `parser` turns tokens into statements (`ast`).
//! - `codegen` lowers statements into three-address code.
//! - `error` holds the error type shared by the other modules.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod options;
pub mod parser;
pub mod tokenizer;

pub use error::{CompileError, CompileResult};
pub use options::CompileOptions;

/// Compile a source string into three-address code with default options.
pub fn compile(source: &str) -> CompileResult<Vec<String>> {
  compile_with(source, &CompileOptions::default())
}

/// Compile a source string into three-address code under `options`.
pub fn compile_with(source: &str, options: &CompileOptions) -> CompileResult<Vec<String>> {
  let tokens = tokenizer::tokenize(source)?;
  let program = parser::parse_program_with(tokens, options)?;
  Ok(codegen::generate_program(&program))
}
