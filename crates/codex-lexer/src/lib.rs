//! CodeX lexer: converts source text into tokens.
use codex_syntax::error::{Error, Result};
use codex_syntax::token::{Literal, Token, TokenKind};

/// Symbols that may appear inside a scanned word but never in an identifier.
const DISALLOWED: &str = "`$@[]\\:#";

/// Longest identifier the language accepts, in characters.
const MAX_IDENT_LEN: usize = 20;

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}

/// Character scanner that produces tokens with line numbers.
///
/// Lexing stops at the first fault; there is no recovery inside the lexer.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    identifiers: Vec<String>,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            identifiers: Vec::new(),
        }
    }

    /// Distinct identifier names seen so far, in first-seen order.
    pub fn identifiers(&self) -> &[String] {
        &self.identifiers
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
            }
        }
        ch
    }

    fn single(&mut self, kind: TokenKind, lexeme: &str) -> Token {
        let line = self.line;
        self.advance();
        Token::new(kind, lexeme, None, line)
    }

    /// `c` alone, or `c=` when followed by `=`.
    fn one_or_two(&mut self, c: char, two: TokenKind, one: TokenKind) -> Token {
        let line = self.line;
        self.advance();
        if self.peek() == Some('=') {
            self.advance();
            Token::new(two, format!("{}=", c), None, line)
        } else {
            Token::new(one, c.to_string(), None, line)
        }
    }

    /// Skips whitespace, `!` line comments and `?...?` block comments.
    fn skip_trivia(&mut self) -> Result<()> {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '!' {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c == '?' {
                let start_line = self.line;
                self.advance();
                loop {
                    match self.advance() {
                        Some('?') => break,
                        Some(_) => {}
                        None => {
                            let msg = format!(
                                "Unterminated block comment starting at line {}",
                                start_line
                            );
                            return Err(Error::lexical(start_line, "", msg));
                        }
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    fn read_char(&mut self) -> Result<Token> {
        let line = self.line;
        self.advance();
        let value = self.advance();
        if let Some(c) = value {
            if (' '..='~').contains(&c) && self.peek() == Some('\'') {
                self.advance();
                return Ok(Token::new(
                    TokenKind::ConstChar,
                    c.to_string(),
                    Some(Literal::Char(c)),
                    line,
                ));
            }
        }
        let cited = value.filter(|c| !c.is_whitespace()).map(String::from).unwrap_or_default();
        Err(Error::lexical(line, cited, "Invalid character constant"))
    }

    fn read_string(&mut self) -> Result<Token> {
        let line = self.line;
        self.advance();
        let mut s = String::new();
        loop {
            match self.advance() {
                Some('"') => {
                    return Ok(Token::new(
                        TokenKind::ConstStr,
                        s.clone(),
                        Some(Literal::Str(s)),
                        line,
                    ));
                }
                Some('\n') | Some('\r') | None => {
                    return Err(Error::lexical(line, s, "Unterminated string literal"));
                }
                Some(c) => s.push(c),
            }
        }
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || c == '.' || c == '_' || DISALLOWED.contains(c)
    }

    /// Scans a maximal word and classifies it as a number, keyword, boolean
    /// or identifier.
    fn read_word(&mut self) -> Result<Token> {
        let line = self.line;
        let mut word = String::new();
        while let Some(c) = self.peek() {
            if Self::is_word_char(c) {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if word.is_empty() {
            // A character that cannot start any token.
            let cited = self.advance().map(String::from).unwrap_or_default();
            return Err(Error::lexical(line, cited, "Invalid token"));
        }

        if word.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Self::number(word, line);
        }
        if let Some(kind) = TokenKind::keyword(&word) {
            return Ok(Token::new(kind, word, None, line));
        }
        if word == "true" || word == "false" {
            let b = word == "true";
            return Ok(Token::new(TokenKind::ConstBool, word, Some(Literal::Bool(b)), line));
        }
        if Self::is_identifier(&word) {
            if !self.identifiers.contains(&word) {
                self.identifiers.push(word.clone());
            }
            return Ok(Token::new(TokenKind::Ident, word, None, line));
        }
        Err(Error::lexical(line, word, "Invalid token"))
    }

    fn number(word: String, line: usize) -> Result<Token> {
        let invalid = |word: String| Error::lexical(line, word, "Invalid numerical constant");
        let dots = word.chars().filter(|&c| c == '.').count();
        let has_digit = word.chars().any(|c| c.is_ascii_digit());
        match dots {
            0 => match word.parse::<i32>() {
                Ok(n) => Ok(Token::new(TokenKind::ConstInt, word, Some(Literal::Int(n)), line)),
                Err(_) => Err(invalid(word)),
            },
            1 if has_digit => match word.parse::<f32>() {
                Ok(x) => Ok(Token::new(TokenKind::ConstFloat, word, Some(Literal::Float(x)), line)),
                Err(_) => Err(invalid(word)),
            },
            _ => Err(invalid(word)),
        }
    }

    fn is_identifier(word: &str) -> bool {
        let starts_with_letter = word.chars().next().map_or(false, char::is_alphabetic);
        starts_with_letter
            && word.chars().count() <= MAX_IDENT_LEN
            && !word.chars().any(|c| c == '.' || DISALLOWED.contains(c))
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let tk = match self.peek() {
                None => {
                    tokens.push(Token::eof(self.line));
                    break;
                }
                Some('+') => self.single(TokenKind::Plus, "+"),
                Some('-') => self.single(TokenKind::Minus, "-"),
                Some('*') => self.single(TokenKind::Star, "*"),
                Some('/') => self.single(TokenKind::Slash, "/"),
                Some('%') => self.single(TokenKind::Percent, "%"),
                Some('^') => self.single(TokenKind::Caret, "^"),
                Some('&') => self.single(TokenKind::And, "&"),
                Some('|') => self.single(TokenKind::Or, "|"),
                Some('(') => self.single(TokenKind::LParen, "("),
                Some(')') => self.single(TokenKind::RParen, ")"),
                Some('{') => self.single(TokenKind::LBrace, "{"),
                Some('}') => self.single(TokenKind::RBrace, "}"),
                Some(';') => self.single(TokenKind::Semi, ";"),
                Some(',') => self.single(TokenKind::Comma, ","),
                Some('>') => self.one_or_two('>', TokenKind::GreaterEq, TokenKind::Greater),
                Some('<') => self.one_or_two('<', TokenKind::LessEq, TokenKind::Less),
                Some('=') => self.one_or_two('=', TokenKind::EqualTo, TokenKind::Equal),
                Some('~') => self.one_or_two('~', TokenKind::NotEqualTo, TokenKind::Not),
                Some('\'') => self.read_char()?,
                Some('"') => self.read_string()?,
                Some(_) => self.read_word()?,
            };
            tokens.push(tk);
        }
        Ok(tokens)
    }
}
