use std::io::{self, Stdout, Write};

use owo_colors::{OwoColorize, Stream};

use codex_interpreter::{Dialect, Interpreter, StdinInput};
use codex_lexer::Lexer;
use codex_syntax::token::TokenKind;

use crate::common::render_error;

pub fn start_repl(dialect: Dialect) {
    println!(
        "{}",
        "CodeX REPL. Type :help for help, :quit to exit."
            .if_supports_color(Stream::Stdout, |t| t.green())
    );

    let mut interpreter = Interpreter::new(io::stdout(), StdinInput::new()).with_dialect(dialect);

    let mut buffer = String::new();
    loop {
        let prompt = if buffer.is_empty() { "codex> " } else { "...  > " };
        print!("{}", prompt.if_supports_color(Stream::Stdout, |t| t.cyan()));
        let _ = io::stdout().flush();

        let mut line = String::new();
        let n = match io::stdin().read_line(&mut line) {
            Ok(n) => n,
            Err(e) => {
                eprintln!("<input error: {}>", e);
                break;
            }
        };
        if n == 0 {
            // EOF
            println!("\nGoodbye.");
            break;
        }
        let trimmed = line.trim();

        if buffer.is_empty() && trimmed.starts_with(':') {
            match trimmed {
                ":quit" | ":q" | ":exit" => {
                    println!("Goodbye.");
                    break;
                }
                ":help" | ":h" => print_help(),
                ":vars" => print_vars(&interpreter),
                ":reset" => {
                    interpreter.reset();
                    let done = "State reset.";
                    println!("{}", done.if_supports_color(Stream::Stdout, |t| t.yellow()));
                }
                _ => println!(
                    "{}",
                    "Unknown command. Type :help.".if_supports_color(Stream::Stdout, |t| t.red())
                ),
            }
            continue;
        }

        buffer.push_str(&line);
        if !is_complete(&buffer) {
            continue;
        }
        eval_entry(&mut interpreter, &buffer);
        buffer.clear();
    }
}

fn eval_entry(interpreter: &mut Interpreter<Stdout, StdinInput>, source: &str) {
    let tokens = match codex_lexer::tokenize(source) {
        Ok(t) => t,
        Err(e) => return render_error(source, &e),
    };
    let parsed = codex_parser::parse(tokens);
    if !parsed.is_ok() {
        for e in &parsed.errors {
            render_error(source, e);
        }
        return;
    }
    for e in interpreter.run(&parsed.statements) {
        render_error(source, &e);
    }
}

fn print_help() {
    println!("{}", "Commands:".if_supports_color(Stream::Stdout, |t| t.bold()));
    for (cmd, what) in [
        (":help", "Show this help"),
        (":quit", "Exit the REPL"),
        (":vars", "List top-level variables"),
        (":reset", "Forget every variable"),
    ] {
        let cmd = format!("{:7}", cmd);
        println!("  {} {}", cmd.if_supports_color(Stream::Stdout, |t| t.yellow()), what);
    }
    println!("Statements end with ';' or '}}'. Input continues until brackets balance.");
}

fn print_vars(interpreter: &Interpreter<Stdout, StdinInput>) {
    let vars = interpreter.globals();
    if vars.is_empty() {
        println!("{}", "<no vars>".if_supports_color(Stream::Stdout, |t| t.dimmed()));
        return;
    }
    for (name, ty, value) in vars {
        println!(
            "{} {} = {}",
            ty,
            name.if_supports_color(Stream::Stdout, |t| t.yellow()),
            value.if_supports_color(Stream::Stdout, |t| t.bright_blue())
        );
    }
}

/// An entry is complete once its brackets balance and it ends a statement.
/// An unterminated block comment keeps the entry open; any other lexical
/// fault completes it so the fault gets reported.
pub(crate) fn is_complete(input: &str) -> bool {
    let tokens = match Lexer::new(input).tokenize() {
        Ok(t) => t,
        Err(e) => return !e.msg.starts_with("Unterminated block comment"),
    };
    let mut paren = 0i32;
    let mut brace = 0i32;
    for tk in &tokens {
        match tk.kind {
            TokenKind::LParen => paren += 1,
            TokenKind::RParen => paren -= 1,
            TokenKind::LBrace => brace += 1,
            TokenKind::RBrace => brace -= 1,
            _ => {}
        }
    }
    let last = tokens.iter().rev().find(|t| t.kind != TokenKind::Eof);
    match last {
        None => true,
        Some(t) => {
            paren <= 0 && brace <= 0 && matches!(t.kind, TokenKind::Semi | TokenKind::RBrace)
        }
    }
}
