use owo_colors::{OwoColorize, Stream};

use codex_syntax::error::{Error, Location};

/// Print `err` to stderr: the diagnostic line itself, then a source excerpt
/// when the error is located, then a hint for the common mistakes.
pub fn render_error(source: &str, err: &Error) {
    eprintln!("{}", err.if_supports_color(Stream::Stderr, |t| t.red()));
    if let Some(line) = err.line {
        if let Some(src_line) = source.lines().nth(line.saturating_sub(1)) {
            let gutter = format!("{:4} | ", line);
            eprintln!(
                "{}{}",
                gutter.if_supports_color(Stream::Stderr, |t| t.bright_black()),
                src_line
            );
            if let Location::At(lexeme) = &err.location {
                if let Some(col) = caret_column(src_line, lexeme) {
                    let pad = " ".repeat(gutter.len() + col);
                    let marker = "^".repeat(lexeme.chars().count().max(1));
                    let label = err.kind.to_string().to_lowercase();
                    eprintln!(
                        "{}{} {}",
                        pad,
                        marker.if_supports_color(Stream::Stderr, |t| t.red()),
                        label.if_supports_color(Stream::Stderr, |t| t.red())
                    );
                }
            }
        }
    }
    if let Some(hint) = suggestion(&err.msg) {
        eprintln!("{} {}", "help:".if_supports_color(Stream::Stderr, |t| t.yellow()), hint);
    }
}

/// Character column of `lexeme` in `src_line`, if it occurs exactly once.
/// Tokens carry only a line, so a repeated lexeme cannot be pinned down.
fn caret_column(src_line: &str, lexeme: &str) -> Option<usize> {
    let mut hits = src_line.match_indices(lexeme);
    let (byte, _) = hits.next()?;
    if hits.next().is_some() {
        return None;
    }
    Some(src_line[..byte].chars().count())
}

/// Report a problem that is not a CodeX diagnostic (unreadable file and such).
pub fn render_failure(msg: &str) {
    eprintln!(
        "{}: {}",
        "error".if_supports_color(Stream::Stderr, |t| t.red()),
        msg
    );
}

fn suggestion(msg: &str) -> Option<&'static str> {
    let hint = if msg.starts_with("Undefined variable") {
        "declare the variable before using it, e.g. INT x;"
    } else if msg.contains("already declared") {
        "drop the type keyword to assign to the existing variable instead"
    } else if msg.starts_with("Type mismatch") {
        "both operands must have the same numeric type; INT and FP do not mix"
    } else if msg == "Division by zero" {
        "check the divisor before dividing"
    } else if msg.starts_with("Expected ';'") {
        "every statement except a block ends with ';'"
    } else if msg.starts_with("Unterminated block comment") {
        "a block comment runs until the next '?'"
    } else if msg.starts_with("Unterminated string") {
        "string literals must close on the line they start"
    } else if msg.starts_with("Invalid") && msg.contains(" input ") {
        "the text read by XIN must match the variable's declared type"
    } else if msg.starts_with("Unexpected end of input") {
        "supply one line per XIN, on stdin or with --input"
    } else if msg == "Invalid token" {
        "identifiers start with a letter, have at most 20 characters and no symbols"
    } else if msg == "Invalid numerical constant" {
        "numbers have at most one '.' and must fit in 32 bits"
    } else {
        return None;
    };
    Some(hint)
}
