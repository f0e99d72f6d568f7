mod common;
mod repl;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use codex_interpreter::{Dialect, InputSource, Interpreter, ScriptedInput, StdinInput};
use codex_lexer::Lexer;
use codex_syntax::{Stmt, Token};

use common::{render_error, render_failure};

#[derive(Parser, Debug)]
#[command(name = "codex", version, about = "Run and inspect CodeX programs")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Evaluation rules: `standard`, or `legacy` for the historical
    /// inverted equality and silent NULL on mismatched operands
    #[arg(long, value_enum, env = "CODEX_DIALECT", global = true)]
    dialect: Option<DialectArg>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute a program
    Run {
        file: PathBuf,

        /// Read XIN lines from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print per-phase summaries to stderr
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the token stream
    Tokens {
        file: PathBuf,

        /// Emit JSON instead of one token per line
        #[arg(long)]
        json: bool,
    },
    /// Print the parsed statements
    Ast { file: PathBuf },
    /// Print the identifier table
    Symbols { file: PathBuf },
    /// Start the interactive prompt (the default)
    Repl,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DialectArg {
    Standard,
    Legacy,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Standard => Dialect::Standard,
            DialectArg::Legacy => Dialect::Legacy,
        }
    }
}

#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    kind: &'static str,
    lexeme: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    literal: Option<String>,
    line: usize,
}

impl<'a> From<&'a Token> for TokenRecord<'a> {
    fn from(tok: &'a Token) -> Self {
        Self {
            kind: tok.kind.name(),
            lexeme: &tok.lexeme,
            literal: tok.literal.as_ref().map(|lit| lit.to_string()),
            line: tok.line,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let dialect = cli.dialect.map(Dialect::from).unwrap_or_default();

    let ok = match cli.command {
        None | Some(Command::Repl) => {
            repl::start_repl(dialect);
            true
        }
        Some(Command::Run { file, input, verbose }) => {
            run_file(&file, input.as_deref(), dialect, verbose)
        }
        Some(Command::Tokens { file, json }) => dump_tokens(&file, json),
        Some(Command::Ast { file }) => dump_ast(&file),
        Some(Command::Symbols { file }) => dump_symbols(&file),
    };
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn read_source(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            render_failure(&format!("Failed to read {}: {}", path.display(), e));
            None
        }
    }
}

/// Lex and parse `src`, reporting every fault. `None` if anything failed.
fn front_end(src: &str, verbose: bool) -> Option<Vec<Stmt>> {
    let started = Instant::now();
    let tokens = match codex_lexer::tokenize(src) {
        Ok(t) => t,
        Err(e) => {
            render_error(src, &e);
            return None;
        }
    };
    if verbose {
        eprintln!("lexed {} tokens in {:?}", tokens.len(), started.elapsed());
    }

    let started = Instant::now();
    let parsed = codex_parser::parse(tokens);
    if verbose {
        eprintln!(
            "parsed {} statements ({} syntax errors) in {:?}",
            parsed.statements.len(),
            parsed.errors.len(),
            started.elapsed()
        );
    }
    if !parsed.is_ok() {
        for e in &parsed.errors {
            render_error(src, e);
        }
        return None;
    }
    Some(parsed.statements)
}

fn run_file(path: &Path, input: Option<&Path>, dialect: Dialect, verbose: bool) -> bool {
    let Some(src) = read_source(path) else { return false };
    let Some(program) = front_end(&src, verbose) else { return false };

    let mut input: Box<dyn InputSource> = match input {
        Some(p) => match read_source(p) {
            Some(text) => Box::new(ScriptedInput::from_text(&text)),
            None => return false,
        },
        None => Box::new(StdinInput::new()),
    };

    let started = Instant::now();
    let mut interp = Interpreter::new(io::stdout(), &mut *input).with_dialect(dialect);
    let errors = interp.run(&program);
    if verbose {
        eprintln!(
            "executed with {:?} dialect in {:?} ({} runtime errors)",
            interp.dialect(),
            started.elapsed(),
            errors.len()
        );
    }
    for e in &errors {
        render_error(&src, e);
    }
    errors.is_empty()
}

fn dump_tokens(path: &Path, json: bool) -> bool {
    let Some(src) = read_source(path) else { return false };
    let tokens = match codex_lexer::tokenize(&src) {
        Ok(t) => t,
        Err(e) => {
            render_error(&src, &e);
            return false;
        }
    };
    if json {
        let records: Vec<TokenRecord> = tokens.iter().map(TokenRecord::from).collect();
        match serde_json::to_string_pretty(&records) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                render_failure(&format!("Failed to serialize tokens: {}", e));
                return false;
            }
        }
    } else {
        for tok in &tokens {
            println!("{:4}  {}", tok.line, tok);
        }
    }
    true
}

fn dump_ast(path: &Path) -> bool {
    let Some(src) = read_source(path) else { return false };
    let Some(program) = front_end(&src, false) else { return false };
    for stmt in &program {
        println!("{:#?}", stmt);
    }
    true
}

fn dump_symbols(path: &Path) -> bool {
    let Some(src) = read_source(path) else { return false };
    let mut lexer = Lexer::new(&src);
    if let Err(e) = lexer.tokenize() {
        render_error(&src, &e);
        return false;
    }
    for (i, name) in lexer.identifiers().iter().enumerate() {
        println!("{:3}  {}", i, name);
    }
    true
}
