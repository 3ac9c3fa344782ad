//! Restricted arithmetic evaluator.
//!
//! A recursive descent evaluator for the arithmetic fallback of formulas. It
//! understands numeric literals, cell references, `+ - * /`, unary signs and
//! parentheses, with the usual precedence. Nothing else is accepted: any other
//! character is a parse error.

use super::error::{FormulaError, FormulaResult};

/// Deepest parenthesis nesting accepted before the expression is rejected.
const MAX_NESTING_DEPTH: usize = 100;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Reference(String),
    Plus,
    Minus,
    Star,
    Slash,
    LeftParen,
    RightParen,
    Eof,
}

/// Evaluate `expr`, resolving each cell reference through `resolve`.
///
/// References are uppercase column letters followed by digits; `resolve`
/// receives the reference text and returns its numeric value.
pub fn evaluate_arithmetic<F>(expr: &str, resolve: F) -> FormulaResult<f64>
where
    F: Fn(&str) -> f64,
{
    let mut parser = ArithParser::new(expr, resolve)?;
    let value = parser.parse_additive()?;
    if parser.current != Token::Eof {
        return Err(parser.error(format!("unexpected {:?}", parser.current)));
    }
    if !value.is_finite() {
        return Err(FormulaError::NotFinite);
    }
    Ok(value)
}

struct ArithParser<'a, F> {
    input: &'a str,
    pos: usize,
    token_start: usize,
    current: Token,
    depth: usize,
    resolve: F,
}

impl<'a, F> ArithParser<'a, F>
where
    F: Fn(&str) -> f64,
{
    fn new(input: &'a str, resolve: F) -> FormulaResult<Self> {
        let mut parser = ArithParser {
            input,
            pos: 0,
            token_start: 0,
            current: Token::Eof,
            depth: 0,
            resolve,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    fn error(&self, message: String) -> FormulaError {
        FormulaError::Parse {
            offset: self.token_start,
            message,
        }
    }

    // === Token scanning ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.skip_whitespace();
        self.token_start = self.pos;
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        let Some(c) = self.peek_char() else {
            return Ok(Token::Eof);
        };

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }
        if c.is_ascii_uppercase() {
            return self.scan_reference();
        }
        Err(self.error(format!("unexpected character '{}'", c)))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek_char() == Some('.') {
            self.advance();
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if self.peek_char().is_some_and(|c| c == 'e' || c == 'E') {
            self.advance();
            if self.peek_char().is_some_and(|c| c == '+' || c == '-') {
                self.advance();
            }
            while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.error(format!("malformed number '{}'", text)))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_uppercase()) {
            self.advance();
        }
        let letters_end = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == letters_end {
            return Err(self.error(format!(
                "unexpected identifier '{}'",
                &self.input[start..self.pos]
            )));
        }
        Ok(Token::Reference(self.input[start..self.pos].to_string()))
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    // === Expression parsing ===
    // additive := multiplicative (('+' | '-') multiplicative)*
    // multiplicative := unary (('*' | '/') unary)*
    // unary := ('+' | '-')* primary
    // primary := number | reference | '(' additive ')'

    fn parse_additive(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_multiplicative()?;
        loop {
            match self.current {
                Token::Plus => {
                    self.consume()?;
                    left += self.parse_multiplicative()?;
                }
                Token::Minus => {
                    self.consume()?;
                    left -= self.parse_multiplicative()?;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<f64> {
        let mut left = self.parse_unary()?;
        loop {
            match self.current {
                Token::Star => {
                    self.consume()?;
                    left *= self.parse_unary()?;
                }
                Token::Slash => {
                    self.consume()?;
                    let right = self.parse_unary()?;
                    if right == 0.0 {
                        return Err(FormulaError::DivisionByZero);
                    }
                    left /= right;
                }
                _ => break,
            }
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<f64> {
        let mut negate = false;
        loop {
            match self.current {
                Token::Minus => negate = !negate,
                Token::Plus => {}
                _ => break,
            }
            self.consume()?;
        }
        let value = self.parse_primary()?;
        Ok(if negate { -value } else { value })
    }

    fn parse_primary(&mut self) -> FormulaResult<f64> {
        match self.consume()? {
            Token::Number(n) => Ok(n),
            Token::Reference(id) => Ok((self.resolve)(&id)),
            Token::LeftParen => {
                if self.depth >= MAX_NESTING_DEPTH {
                    return Err(self.error(format!(
                        "parentheses nested deeper than {}",
                        MAX_NESTING_DEPTH
                    )));
                }
                self.depth += 1;
                let value = self.parse_additive()?;
                self.depth -= 1;
                if self.current != Token::RightParen {
                    return Err(self.error("expected ')'".to_string()));
                }
                self.consume()?;
                Ok(value)
            }
            Token::Eof => Err(self.error("unexpected end of expression".to_string())),
            other => Err(self.error(format!("unexpected {:?}", other))),
        }
    }
}
