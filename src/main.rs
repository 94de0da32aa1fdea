use std::env;
use std::fs;
use std::io::{self, Read};
use std::process;

use tacc::{CompileOptions, compile_with};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tacc [--max-depth N] <file|->";

struct Args {
  path: String,
  options: CompileOptions,
}

/// A positive nesting limit.
fn parse_depth(value: &str) -> Result<usize, String> {
  value
    .parse::<usize>()
    .ok()
    .filter(|depth| *depth > 0)
    .ok_or_else(|| format!("invalid nesting depth \"{value}\""))
}

/// Parse argv (without the program name). `--max-depth` wins over
/// `env_depth`, which is only consulted when the flag is absent.
fn parse_args(args: &[String], env_depth: Option<&str>) -> Result<Args, String> {
  let mut max_depth = None;
  let mut path = None;
  let mut rest = args.iter();
  while let Some(arg) = rest.next() {
    match arg.as_str() {
      "--max-depth" => {
        let value = rest.next().ok_or("--max-depth needs a value")?;
        max_depth = Some(parse_depth(value)?);
      }
      _ if path.is_none() => path = Some(arg.clone()),
      _ => return Err(format!("unexpected argument \"{arg}\"")),
    }
  }

  let mut options = CompileOptions::default();
  if let Some(depth) = max_depth {
    options.max_depth = depth;
  } else if let Some(value) = env_depth {
    options.max_depth = parse_depth(value)?;
  }

  let path = path.ok_or_else(|| USAGE.to_string())?;
  Ok(Args { path, options })
}

fn read_source(path: &str) -> io::Result<String> {
  if path == "-" {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(source)
  } else {
    fs::read_to_string(path)
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .with_writer(io::stderr)
    .with_target(false)
    .init();

  let args: Vec<String> = env::args().skip(1).collect();
  let env_depth = env::var("TACC_MAX_DEPTH").ok();
  let args = match parse_args(&args, env_depth.as_deref()) {
    Ok(args) => args,
    Err(message) => {
      eprintln!("{message}");
      process::exit(1);
    }
  };

  let source = match read_source(&args.path) {
    Ok(source) => source,
    Err(err) => {
      error!(path = %args.path, %err, "failed to read source");
      eprintln!("tacc: cannot read {}: {err}", args.path);
      process::exit(1);
    }
  };
  debug!(path = %args.path, max_depth = args.options.max_depth, "compiling");

  match compile_with(&source, &args.options) {
    Ok(instructions) => {
      for instr in instructions {
        println!("{instr}");
      }
    }
    Err(err) => {
      error!(%err, "compilation failed");
      eprintln!("{}", err.render(&source));
      process::exit(1);
    }
  }
}
