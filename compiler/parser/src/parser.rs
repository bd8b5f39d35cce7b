use std::fmt::{Display, Formatter};
use std::iter::Peekable;

use thiserror::Error;

use ast::*;
use lexer::*;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    message: String,
    line: usize,
    token: Option<Token>,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl ParseError {
    fn new<S: Into<String>>(message: S, token: &Token) -> Self {
        Self {
            message: message.into(),
            line: token.line,
            token: Some(token.clone()),
        }
    }

    fn out_of_tokens(line: usize) -> Self {
        Self {
            message: "Ran out of tokens before end of input".to_string(),
            line,
            token: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> usize {
        self.line
    }

    /// Token found where the parser expected something else
    pub fn token(&self) -> Option<&Token> {
        self.token.as_ref()
    }
}

pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Peekable<std::vec::IntoIter<Token>>,
    /// Line of the last consumed token
    line: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            line: 1,
        }
    }

    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let func = self.parse_func()?;
        self.expect(TokenType::Eof)?;
        Ok(Program {
            line: func.line,
            func,
        })
    }

    fn parse_func(&mut self) -> Result<Func, ParseError> {
        let int = self.expect(TokenType::Int)?;
        let ident = self.parse_ident()?;

        self.expect(TokenType::OpenParen)?;
        self.expect(TokenType::Void)?;
        self.expect(TokenType::CloseParen)?;
        self.expect(TokenType::OpenBrace)?;

        let body = self.parse_stmt()?;

        self.expect(TokenType::CloseBrace)?;

        Ok(Func {
            ident,
            body,
            line: int.line,
        })
    }

    fn parse_ident(&mut self) -> Result<String, ParseError> {
        let token = self.expect(TokenType::Identifier)?;
        match token.value {
            Some(ident) => Ok(ident),
            None => Err(ParseError::new("Identifier has no name", &token)),
        }
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let ret = self.expect(TokenType::Return)?;

        let expr = self.parse_expr()?;

        self.expect(TokenType::Semicolon)?;

        Ok(Stmt::Return {
            expr,
            line: ret.line,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let next = self.peek()?.kind;

        match next {
            TokenType::Constant => self.parse_constant(),
            TokenType::OpenParen => {
                self.advance()?;
                let expr = self.parse_expr()?;
                self.expect(TokenType::CloseParen)?;

                Ok(expr)
            }
            TokenType::Minus | TokenType::Tilde | TokenType::MinusMinus => {
                let (op, line) = self.parse_unop()?;
                let expr = self.parse_expr()?;

                Ok(Expr::unary(op, expr, line))
            }
            _ => {
                let token = self.advance()?;
                Err(ParseError::new(
                    format!("Expected an expression, but found {}", token),
                    &token,
                ))
            }
        }
    }

    fn parse_constant(&mut self) -> Result<Expr, ParseError> {
        let token = self.expect(TokenType::Constant)?;

        let val = token
            .value
            .as_deref()
            .and_then(|text| text.parse::<i32>().ok())
            .ok_or_else(|| ParseError::new("Integer constant out of range", &token))?;

        Ok(Expr::constant(val, token.line))
    }

    fn parse_unop(&mut self) -> Result<(UnaryOp, usize), ParseError> {
        let token = self.advance()?;
        match token.kind {
            TokenType::Minus => Ok((UnaryOp::Negate, token.line)),
            TokenType::Tilde => Ok((UnaryOp::Complement, token.line)),
            TokenType::MinusMinus => Err(ParseError::new(
                "Decrement operator '--' is not supported",
                &token,
            )),
            _ => Err(ParseError::new(
                format!("Expected unary operator, found {}", token),
                &token,
            )),
        }
    }

    /// Checks if next token is of correct expected type
    fn expect(&mut self, expected: TokenType) -> Result<Token, ParseError> {
        let token = self.advance()?;

        if token.kind == expected {
            Ok(token)
        } else if token.kind == TokenType::Eof {
            Err(ParseError::new(
                format!("Unexpected end of input, expected {}", expected),
                &token,
            ))
        } else {
            Err(ParseError::new(
                format!("Expected {}, but found {}", expected, token),
                &token,
            ))
        }
    }

    fn advance(&mut self) -> Result<Token, ParseError> {
        match self.tokens.next() {
            Some(token) => {
                self.line = token.line;
                Ok(token)
            }
            None => Err(ParseError::out_of_tokens(self.line)),
        }
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        let line = self.line;
        self.tokens
            .peek()
            .ok_or_else(|| ParseError::out_of_tokens(line))
    }
}
