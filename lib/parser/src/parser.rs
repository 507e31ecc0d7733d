use errors::{ErrorLocation, Result, TloxError, TloxErrors};
use scanner::{Token, TokenData};

use TokenData::*;

mod expr;
pub use expr::{Expr, LiteralValue};

mod printer;
pub use printer::AstPrinter;

#[derive(Debug)]
pub struct ParserError {
    error: ParserErrorType,
    token: Token,
}

impl ParserError {
    fn new(error: ParserErrorType, token: Token) -> Self {
        Self { error, token }
    }
}

impl From<ParserError> for TloxError {
    fn from(error: ParserError) -> Self {
        let location = if error.token.data == Eof {
            ErrorLocation::Eof
        } else {
            ErrorLocation::At(error.token.lexeme.clone())
        };
        TloxError { line: error.token.line, location, message: error.error.to_string() }
    }
}

#[derive(Debug)]
pub enum ParserErrorType {
    MissingRightParen,
    ExpectedColon,
    ExpectedExpression,
    MissingLeftOperand(String),
}

impl std::fmt::Display for ParserErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParserErrorType::MissingRightParen => write!(f, "Expect ')' after expression."),
            ParserErrorType::ExpectedColon => {
                write!(f, "Expect ':' after then branch of ternary operator.")
            }
            ParserErrorType::ExpectedExpression => write!(f, "Expect expression."),
            ParserErrorType::MissingLeftOperand(lexeme) => {
                write!(f, "Binary operator '{}' requires left operand.", lexeme)
            }
        }
    }
}

/// Recursive-descent parser over a finished token stream.
///
/// Precedence, low to high:
///
/// ```text
/// expression → comma
/// comma      → ternary ( "," ternary )*
/// ternary    → equality ( "?" equality ":" ternary )?
/// equality   → comparison ( ("!=" | "==") comparison )*
/// comparison → term ( (">" | ">=" | "<" | "<=") term )*
/// term       → factor ( ("-" | "+") factor )*
/// factor     → unary ( ("/" | "*") unary )*
/// unary      → ("!" | "-") unary | primary
/// primary    → NUMBER | STRING | "true" | "false" | "nil" | "(" expression ")"
/// ```
///
/// The token vector must end with an Eof token; the cursor never moves
/// past it.
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    diagnostics: TloxErrors,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last(), Some(Token { data: Eof, .. })));
        Self { tokens, current: 0, diagnostics: TloxErrors::default() }
    }

    /// Parses one expression. Returns Err with every diagnostic recorded
    /// along the way, even when operand recovery managed to produce a
    /// tree: a run that reported anything must not be evaluated.
    pub fn parse(mut self) -> std::result::Result<Expr, TloxErrors> {
        match self.expression() {
            Ok(expr) if self.diagnostics.is_empty() => Ok(expr),
            Ok(_) => Err(self.diagnostics),
            Err(e) => {
                self.diagnostics.push(e);
                self.synchronize();
                Err(self.diagnostics)
            }
        }
    }

    fn expression(&mut self) -> Result<Expr> {
        self.comma()
    }

    fn comma(&mut self) -> Result<Expr> {
        let mut operands = vec![self.ternary()?];

        while self.matches(&[Comma]) {
            operands.push(self.ternary()?);
        }

        match operands.len() {
            1 => Ok(operands.swap_remove(0)),
            _ => Ok(Expr::Comma(operands)),
        }
    }

    // Right-associative: the else branch recurses back into ternary.
    fn ternary(&mut self) -> Result<Expr> {
        let mut expr = self.equality()?;

        if self.matches(&[Question]) {
            let then_branch = self.equality()?;
            self.consume_or_error(Colon, ParserErrorType::ExpectedColon)?;
            let else_branch = self.ternary()?;
            expr = Expr::Ternary {
                condition: Box::new(expr),
                then_branch: Box::new(then_branch),
                else_branch: Box::new(else_branch),
            };
        }

        Ok(expr)
    }

    fn equality(&mut self) -> Result<Expr> {
        if let Some(recovered) = self.missing_left_operand(&[BangEqual, EqualEqual]) {
            return recovered;
        }

        let mut expr = self.comparison()?;

        while self.matches(&[BangEqual, EqualEqual]) {
            let operator = self.previous().clone();
            let right = Box::new(self.comparison()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn comparison(&mut self) -> Result<Expr> {
        if let Some(recovered) =
            self.missing_left_operand(&[Greater, GreaterEqual, Less, LessEqual])
        {
            return recovered;
        }

        let mut expr = self.term()?;

        while self.matches(&[Greater, GreaterEqual, Less, LessEqual]) {
            let operator = self.previous().clone();
            let right = Box::new(self.term()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn term(&mut self) -> Result<Expr> {
        // Only "+" can be missing its left operand here; a leading "-" is
        // a valid unary prefix.
        if let Some(recovered) = self.missing_left_operand(&[Plus]) {
            return recovered;
        }

        let mut expr = self.factor()?;

        while self.matches(&[Minus, Plus]) {
            let operator = self.previous().clone();
            let right = Box::new(self.factor()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn factor(&mut self) -> Result<Expr> {
        if let Some(recovered) = self.missing_left_operand(&[Slash, Star]) {
            return recovered;
        }

        let mut expr = self.unary()?;

        while self.matches(&[Slash, Star]) {
            let operator = self.previous().clone();
            let right = Box::new(self.unary()?);
            expr = Expr::Binary { left: Box::new(expr), operator, right };
        }
        Ok(expr)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.matches(&[Bang, Minus]) {
            let operator = self.previous().clone();
            let right = Box::new(self.unary()?);
            return Ok(Expr::Unary { operator, right });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.advance();
        match token.data {
            False => Ok(Expr::Literal(LiteralValue::Boolean(false))),
            True => Ok(Expr::Literal(LiteralValue::Boolean(true))),
            Nil => Ok(Expr::Literal(LiteralValue::Nil)),
            Number(n) => Ok(Expr::Literal(LiteralValue::Number(n))),
            Str(ref s) => Ok(Expr::Literal(LiteralValue::Str(s.clone()))),
            LeftParen => {
                let expr = self.expression()?;
                self.consume_or_error(RightParen, ParserErrorType::MissingRightParen)?;
                Ok(Expr::Grouping(Box::new(expr)))
            }
            _ => Err(ParserError::new(ParserErrorType::ExpectedExpression, token).into()),
        }
    }

    /// Recovery for a binary operator that appears where an operand was
    /// expected, e.g. `== 5`. Consumes the operator, parses its right
    /// operand, records the diagnostic, and hands the right operand back
    /// as a placeholder so the caller can keep parsing.
    fn missing_left_operand(&mut self, operators: &[TokenData]) -> Option<Result<Expr>> {
        if !operators.iter().any(|op| self.check(op)) {
            return None;
        }

        let operator = self.advance();
        let right = match self.equality() {
            Ok(right) => right,
            Err(e) => return Some(Err(e)),
        };

        log::trace!("recovered from missing left operand at '{}'", operator.lexeme);
        self.diagnostics.push(TloxError {
            line: operator.line,
            location: ErrorLocation::At(operator.lexeme.clone()),
            message: ParserErrorType::MissingLeftOperand(operator.lexeme).to_string(),
        });
        Some(Ok(right))
    }

    /// Discards tokens up to the next statement boundary. Pointless for a
    /// single expression, but it is what makes multi-error reporting work
    /// once statement parsing exists.
    fn synchronize(&mut self) {
        log::trace!("synchronizing after parse error");
        self.advance();

        while !self.is_at_end() {
            if self.previous().data == Semicolon {
                return;
            }
            match self.peek().data {
                Class | Fun | Var | For | If | While | Print | Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }
}

// Helpers
impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().data == Eof
    }

    /// Returns the current token; refuses to move past Eof.
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !self.is_at_end() {
            self.current += 1;
        }
        token
    }

    fn check(&self, expected: &TokenData) -> bool {
        !self.is_at_end() && self.peek().data == *expected
    }

    fn matches(&mut self, targets: &[TokenData]) -> bool {
        if targets.iter().any(|t| self.check(t)) {
            self.advance();
            return true;
        }
        false
    }

    fn consume_or_error(&mut self, expected: TokenData, error: ParserErrorType) -> Result<Token> {
        if self.check(&expected) {
            Ok(self.advance())
        } else {
            Err(ParserError::new(error, self.peek().clone()).into())
        }
    }
}
