//! Knobs that tune the pipeline without changing the language.

/// Nesting limit applied when no other value is configured.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
  /// Deepest `while`/`if` nesting the parser accepts. Parsing and lowering
  /// both recurse once per level, so this bounds stack usage.
  pub max_depth: usize,
}

impl CompileOptions {
  /// Replace the nesting limit.
  pub fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

impl Default for CompileOptions {
  fn default() -> Self {
    Self {
      max_depth: DEFAULT_MAX_DEPTH,
    }
  }
}
