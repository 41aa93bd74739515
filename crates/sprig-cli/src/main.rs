//! `sprig`: run a Sprig program from a file, or start a REPL

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sprig::{is_complete, run_with_context, Diagnostic, Environment, EvalContext, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Program to run; starts a REPL when omitted
    file: Option<PathBuf>,

    /// Log every evaluation step (at `trace` level)
    #[arg(long)]
    trace: bool,

    /// Maximum nesting of user function calls
    #[arg(long, value_name = "N", default_value_t = EvalContext::default().max_call_depth)]
    max_depth: usize,

    /// Start with an empty environment instead of the standard prelude
    #[arg(long)]
    no_prelude: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(args.trace);

    let ctx = EvalContext::with_max_call_depth(args.max_depth).with_trace(args.trace);
    let env = if args.no_prelude {
        Environment::new()
    } else {
        Environment::with_prelude()
    };

    match &args.file {
        Some(path) => run_file(path, env, &ctx),
        None => repl(env, &ctx),
    }
}

fn init_tracing(trace: bool) {
    let default = if trace { "sprig=trace" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_file(path: &Path, mut env: Environment, ctx: &EvalContext) -> Result<ExitCode> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    match run_with_context(&source, &mut env, ctx) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(err) => {
            eprintln!("{}", Diagnostic::from_error(&err, &source));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn repl(mut env: Environment, ctx: &EvalContext) -> Result<ExitCode> {
    let quit = Arc::new(AtomicBool::new(false));
    for name in ["exit", "quit"] {
        let quit = Arc::clone(&quit);
        env.define(
            name,
            Value::native(name, 0, move |_, _| {
                quit.store(true, Ordering::SeqCst);
                Ok(Value::Null)
            }),
        );
    }

    let mut editor = DefaultEditor::new()
        .map_err(|e| anyhow::anyhow!("failed to start line editor: {}", e))?;
    println!("Sprig {} (exit with (exit) or Ctrl-D)", sprig::VERSION);

    while !quit.load(Ordering::SeqCst) {
        let source = match read_program(&mut editor) {
            Ok(source) => source,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => anyhow::bail!("failed to read input: {}", err),
        };
        if source.trim().is_empty() {
            continue;
        }
        editor.add_history_entry(source.trim_end()).ok();

        match run_with_context(&source, &mut env, ctx) {
            Ok(value) => println!("<= {}", value),
            Err(err) => println!("{}", Diagnostic::from_error(&err, &source)),
        }
    }

    println!("Goodbye!");
    Ok(ExitCode::SUCCESS)
}

/// Read one program, asking for continuation lines until it is complete.
fn read_program(editor: &mut DefaultEditor) -> Result<String, ReadlineError> {
    let mut source = editor.readline("=> ")?;
    source.push('\n');
    while !is_complete(&source) {
        source.push_str(&editor.readline("=] ")?);
        source.push('\n');
    }
    Ok(source)
}
