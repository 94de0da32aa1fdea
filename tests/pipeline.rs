//! End-to-end checks over the public pipeline: source text in, three-address
//! code or a rendered diagnostic out.

use tacc::ast::Program;
use tacc::codegen::generate_program;
use tacc::error::{Expected, Found};
use tacc::options::DEFAULT_MAX_DEPTH;
use tacc::parser::{parse, parse_program};
use tacc::tokenizer::{Token, TokenKind, tokenize};
use tacc::{CompileError, CompileOptions, compile, compile_with};

fn parse_source(src: &str) -> Program {
  parse_program(tokenize(src).unwrap()).unwrap()
}

#[test]
fn assignment_then_conditional() {
  let code = compile("x = 10;\nif (x == 10) x = 5;").unwrap();
  assert_eq!(
    code,
    vec![
      "x = 10",
      "t3 = x == 10",
      "if t3 goto t1",
      "goto t2",
      "t1:",
      "x = 5",
      "t2:",
    ]
  );
}

#[test]
fn loop_with_nested_branch() {
  let src = "
    n = 0;
    while (n < 10)
      if (n == 5) n = n + 2; else n = n + 1;
  ";
  assert_eq!(
    compile(src).unwrap(),
    vec![
      "n = 0",
      "t1:",
      "t3 = n < 10",
      "if not t3 goto t2",
      "t6 = n == 5",
      "if t6 goto t4",
      "t7 = n + 1",
      "n = t7",
      "goto t5",
      "t4:",
      "t8 = n + 2",
      "n = t8",
      "t5:",
      "goto t1",
      "t2:",
    ]
  );
}

#[test]
fn externally_produced_tokens_compile() {
  use TokenKind::*;
  let tokens = vec![
    Token::new(While, "while"),
    Token::new(LParen, "("),
    Token::new(Id, "k"),
    Token::new(RParen, ")"),
    Token::new(Id, "k"),
    Token::new(Assign, "="),
    Token::new(Id, "k"),
    Token::new(Op, "-"),
    Token::new(Number, "1"),
    Token::new(End, ";"),
  ];
  let stmt = parse(tokens).unwrap();
  let code = generate_program(&Program {
    statements: vec![stmt],
  });
  assert_eq!(
    code,
    vec!["t1:", "if not k goto t2", "t3 = k - 1", "k = t3", "goto t1", "t2:"]
  );
}

#[test]
fn temporaries_count_up_from_one() {
  let code = compile("a = 1 + 2 + 3 + 4;").unwrap();
  assert_eq!(code, vec!["t1 = 1 + 2", "t2 = t1 + 3", "t3 = t2 + 4", "a = t3"]);
}

#[test]
fn printed_program_parses_back_to_the_same_tree() {
  let src = "x = 1 + 2 * y; while (x < 100) x = x * 2; if (x) if (y) z = 1; else z = 2; else z = 3;";
  let program = parse_source(src);
  let printed = program.to_string();
  assert_eq!(parse_source(&printed), program);
  assert_eq!(compile(&printed).unwrap(), compile(src).unwrap());
}

#[test]
fn missing_terminator_is_reported_with_a_caret() {
  let src = "x = 1;\ny = x + 2";
  let err = compile(src).unwrap_err();
  assert_eq!(
    err,
    CompileError::UnexpectedToken {
      expected: Expected::Kind(TokenKind::End),
      found: Found::EndOfInput,
      loc: Some(16),
    }
  );
  assert_eq!(
    err.render(src),
    "2 | y = x + 2\n             ^ expected END, but got end of input"
  );
}

#[test]
fn missing_rparen_is_a_syntax_error() {
  let err = compile("if (x x = 1;").unwrap_err();
  assert!(matches!(
    err,
    CompileError::UnexpectedToken {
      expected: Expected::Kind(TokenKind::RParen),
      ..
    }
  ));
}

#[test]
fn lexical_errors_surface_from_compile() {
  let err = compile("x = 1 % 2;").unwrap_err();
  assert_eq!(err, CompileError::InvalidChar { ch: '%', loc: 6 });
}

#[test]
fn deep_nesting_fails_cleanly() {
  let src = format!("{}x = 1;", "while (c) ".repeat(DEFAULT_MAX_DEPTH * 40));
  let err = compile(&src).unwrap_err();
  assert!(matches!(
    err,
    CompileError::NestingTooDeep {
      limit: DEFAULT_MAX_DEPTH,
      ..
    }
  ));

  let options = CompileOptions::default().with_max_depth(2);
  assert!(compile_with("while (a) while (b) x = 1;", &options).is_err());
  assert!(compile_with("while (a) x = 1;", &options).is_ok());
}

#[test]
fn long_operator_chain_compiles() {
  let src = format!("x = 1{};", " + 1".repeat(100_000));
  let code = compile(&src).unwrap();
  assert_eq!(code.len(), 100_001);
  assert_eq!(code[0], "t1 = 1 + 1");
  assert_eq!(code[99_999], "t100000 = t99999 + 1");
  assert_eq!(code[100_000], "x = t100000");

  let program = parse_source(&src);
  assert!(parse_source(&program.to_string()) == program);
}

#[test]
fn empty_source_compiles_to_nothing() {
  assert!(compile("").unwrap().is_empty());
}
