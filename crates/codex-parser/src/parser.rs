//! Recursive-descent parser for CodeX.
//!
//! One token of lookahead, no backtracking. Each binary precedence level
//! loops over its own operators, so chains such as `a - b - c` associate to
//! the left; assignment is right-associative.
//!
//! Syntax faults never escape [`Parser::parse`]: each one is recorded once and
//! the parser resynchronizes at the next statement boundary.

use codex_syntax::ast::{DataType, Declaration, Expr, Stmt};
use codex_syntax::error::{Error, Result};
use codex_syntax::token::{Token, TokenKind};

/// Tokens at which panic-mode recovery resumes parsing.
pub const SYNC_SET: &[TokenKind] = &[
    TokenKind::If,
    TokenKind::While,
    TokenKind::Xout,
    TokenKind::Xin,
    TokenKind::Int,
    TokenKind::Fp,
    TokenKind::Char,
    TokenKind::Bool,
    TokenKind::Str,
];

/// Result of a parse: the statements that parsed cleanly plus every syntax
/// fault encountered along the way.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parsed {
    pub statements: Vec<Stmt>,
    pub errors: Vec<Error>,
}

impl Parsed {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<Error>,
    /// Number of blocks currently open.
    depth: usize,
    /// Set when an `IF` faulted, so its `ELSE` is not reported a second time.
    orphan_else: Option<OrphanElse>,
}

/// An `IF` at block depth `depth` faulted; its `ELSE` may still follow once
/// the then-branch has gone by.
#[derive(Debug, Clone, Copy)]
struct OrphanElse {
    depth: usize,
    then_done: bool,
}

impl Parser {
    /// Create a parser over `tokens`. A missing trailing `Eof` is supplied.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let line = tokens.last().map_or(1, |t| t.line);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            depth: 0,
            orphan_else: None,
        }
    }

    /// Parse the whole token stream into a statement sequence.
    pub fn parse(mut self) -> Parsed {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            self.sequence_item(&mut statements);
        }
        Parsed {
            statements,
            errors: self.errors,
        }
    }

    /// Parse a single expression that must span the whole input.
    pub fn parse_expr(&mut self) -> Result<Expr> {
        let expr = self.expression()?;
        if !self.is_at_end() {
            let tok = self.peek().clone();
            return Err(Error::syntax(&tok, "Expected end of expression"));
        }
        Ok(expr)
    }

    // --- token cursor ---

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    /// Consumes the current token if it is one of `kinds`.
    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.iter().any(|&k| self.check(k)) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn consume(&mut self, kind: TokenKind, msg: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(Error::syntax(self.peek(), msg))
        }
    }

    // --- recovery ---

    fn starts_statement(kind: TokenKind) -> bool {
        SYNC_SET.contains(&kind)
            || kind.is_literal()
            || matches!(
                kind,
                TokenKind::Ident | TokenKind::LParen | TokenKind::LBrace | TokenKind::Not
            )
    }

    /// A `}` only ends a skipped region when a block is open; at top level
    /// it is discarded along with the rest of the region.
    fn at_boundary(&self) -> bool {
        match self.peek().kind {
            TokenKind::LBrace => true,
            TokenKind::RBrace => self.depth > 0,
            kind => SYNC_SET.contains(&kind),
        }
    }

    /// Panic-mode recovery: discard tokens until the previous one closed a
    /// statement or the current one opens the next (or closes a block).
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semi || self.at_boundary() {
                return;
            }
            self.advance();
        }
    }

    /// Parses one statement of a top-level or block sequence, recording and
    /// recovering from any fault.
    fn sequence_item(&mut self, out: &mut Vec<Stmt>) {
        if self.check(TokenKind::Else) && self.take_orphan_else() {
            self.advance();
            return;
        }
        if !Self::starts_statement(self.peek().kind) {
            self.skip_stray_token();
            return;
        }
        match self.statement() {
            Ok(stmt) => {
                self.note_statement();
                out.push(stmt);
            }
            Err(e) => {
                self.errors.push(e);
                self.synchronize();
            }
        }
    }

    /// A statement at the faulted `IF`'s depth was its then-branch; the one
    /// after that means no `ELSE` is coming.
    fn note_statement(&mut self) {
        if let Some(pending) = self.orphan_else.as_mut() {
            if pending.depth == self.depth {
                if pending.then_done {
                    self.orphan_else = None;
                } else {
                    pending.then_done = true;
                }
            }
        }
    }

    fn take_orphan_else(&mut self) -> bool {
        match self.orphan_else {
            Some(pending) if pending.depth == self.depth && pending.then_done => {
                self.orphan_else = None;
                true
            }
            _ => false,
        }
    }

    /// Reports a token that cannot start a statement, skips it and resynchronizes.
    fn skip_stray_token(&mut self) {
        let tok = self.advance();
        self.errors
            .push(Error::syntax(&tok, format!("Unexpected token '{}'", tok.lexeme)));
        self.synchronize();
    }

    // --- statements ---

    fn statement(&mut self) -> Result<Stmt> {
        if self.peek().kind.is_type_keyword() {
            let kw = self.advance();
            return self.declaration_list(&kw);
        }
        if self.match_any(&[TokenKind::If]).is_some() {
            return self.if_statement();
        }
        if self.match_any(&[TokenKind::While]).is_some() {
            return self.while_statement();
        }
        if self.match_any(&[TokenKind::Xout]).is_some() {
            return self.print_statement();
        }
        if self.match_any(&[TokenKind::Xin]).is_some() {
            return self.input_statement();
        }
        if self.match_any(&[TokenKind::LBrace]).is_some() {
            return self.block();
        }
        self.expression_statement()
    }

    fn declaration_list(&mut self, keyword: &Token) -> Result<Stmt> {
        let ty = DataType::from_keyword(keyword.kind)
            .ok_or_else(|| Error::syntax(keyword, "Expected type keyword"))?;
        let mut decls = vec![self.declaration(ty)?];
        while self.match_any(&[TokenKind::Comma]).is_some() {
            decls.push(self.declaration(ty)?);
        }
        self.consume(TokenKind::Semi, "Expected ';' after declaration")?;
        if decls.len() == 1 {
            Ok(Stmt::Declaration(decls.remove(0)))
        } else {
            Ok(Stmt::DeclarationList(decls))
        }
    }

    fn declaration(&mut self, ty: DataType) -> Result<Declaration> {
        let start = self.peek().clone();
        let init = self.expression()?;
        let decl = Declaration { ty, init };
        if decl.name().is_none() {
            return Err(Error::syntax(&start, "Expected variable name in declaration"));
        }
        Ok(decl)
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        let depth = self.depth;
        let condition = match self.if_condition() {
            Ok(c) => c,
            Err(e) => {
                self.orphan_else = Some(OrphanElse { depth, then_done: false });
                return Err(e);
            }
        };
        let then_branch = match self.statement() {
            Ok(s) => Box::new(s),
            Err(e) => {
                self.orphan_else = Some(OrphanElse { depth, then_done: true });
                return Err(e);
            }
        };
        let else_branch = if self.match_any(&[TokenKind::Else]).is_some() {
            Some(Box::new(self.statement()?))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn if_condition(&mut self) -> Result<Expr> {
        self.consume(TokenKind::LParen, "Expected '(' after 'IF'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "Expected ')' after IF condition")?;
        Ok(condition)
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenKind::LParen, "Expected '(' after 'WHILE'")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RParen, "Expected ')' after WHILE condition")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { condition, body })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenKind::LParen, "Expected '(' after 'XOUT'")?;
        let expr = self.expression()?;
        self.consume(TokenKind::RParen, "Expected ')' after XOUT expression")?;
        self.consume(TokenKind::Semi, "Expected ';' after XOUT statement")?;
        Ok(Stmt::Print(expr))
    }

    fn input_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenKind::LParen, "Expected '(' after 'XIN'")?;
        let target = self.primary()?;
        self.consume(TokenKind::RParen, "Expected ')' after XIN target")?;
        self.consume(TokenKind::Semi, "Expected ';' after XIN statement")?;
        Ok(Stmt::Input(target))
    }

    /// Parses statements up to the closing brace, recovering from faults
    /// inside the block.
    fn block(&mut self) -> Result<Stmt> {
        self.depth += 1;
        let mut stmts = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.is_at_end() {
            self.sequence_item(&mut stmts);
        }
        self.depth -= 1;
        self.consume(TokenKind::RBrace, "Expected '}' after block")?;
        Ok(Stmt::Block(stmts))
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semi, "Expected ';' after expression")?;
        Ok(Stmt::Expression(expr))
    }

    // --- expressions, lowest precedence first ---

    fn expression(&mut self) -> Result<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> Result<Expr> {
        let target = self.log_or()?;
        if let Some(op) = self.match_any(&[TokenKind::Equal]) {
            let value = self.assignment()?;
            if target.as_identifier().is_none() {
                return Err(Error::syntax(&op, "Invalid assignment target"));
            }
            return Ok(Expr::Assignment {
                target: Box::new(target),
                op,
                value: Box::new(value),
            });
        }
        Ok(target)
    }

    fn log_or(&mut self) -> Result<Expr> {
        let mut lhs = self.log_and()?;
        while let Some(op) = self.match_any(&[TokenKind::Or]) {
            let rhs = self.log_and()?;
            lhs = Expr::LogOr {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn log_and(&mut self) -> Result<Expr> {
        let mut lhs = self.equality()?;
        while let Some(op) = self.match_any(&[TokenKind::And]) {
            let rhs = self.equality()?;
            lhs = Expr::LogAnd {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn equality(&mut self) -> Result<Expr> {
        let mut lhs = self.relational()?;
        while let Some(op) = self.match_any(&[TokenKind::EqualTo, TokenKind::NotEqualTo]) {
            let rhs = self.relational()?;
            lhs = Expr::Equality {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn relational(&mut self) -> Result<Expr> {
        let mut lhs = self.additive()?;
        while let Some(op) = self.match_any(&[
            TokenKind::Greater,
            TokenKind::GreaterEq,
            TokenKind::Less,
            TokenKind::LessEq,
        ]) {
            let rhs = self.additive()?;
            lhs = Expr::Relational {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr> {
        let mut lhs = self.multiplicative()?;
        while let Some(op) = self.match_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let rhs = self.multiplicative()?;
            lhs = Expr::Additive {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        while let Some(op) =
            self.match_any(&[TokenKind::Star, TokenKind::Slash, TokenKind::Percent])
        {
            let rhs = self.unary()?;
            lhs = Expr::Multiplicative {
                lhs: Box::new(lhs),
                op,
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        if let Some(op) = self.match_any(&[TokenKind::Not]) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        if self.peek().kind.is_literal() {
            let tok = self.advance();
            return match tok.literal {
                Some(lit) => Ok(Expr::Constant(lit)),
                None => Err(Error::syntax(&tok, "Constant token without a value")),
            };
        }
        if let Some(tok) = self.match_any(&[TokenKind::Ident]) {
            return Ok(Expr::Identifier(tok));
        }
        if self.match_any(&[TokenKind::LParen]).is_some() {
            let inner = self.expression()?;
            self.consume(TokenKind::RParen, "Expected ')' after expression")?;
            return Ok(Expr::Grouped(Box::new(inner)));
        }
        Err(Error::syntax(self.peek(), "Expected expression"))
    }
}
