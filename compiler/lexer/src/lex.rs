use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::cursor::Cursor;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("unexpected character '{ch}' at line {line}, column {col}")]
    UnexpectedChar { ch: char, line: usize, col: usize },
    #[error("unterminated block comment starting at line {line}")]
    UnterminatedComment { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenType,
    /// Matched source text, `None` only for `Eof`
    pub value: Option<String>,
    pub line: usize,
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: &str, line: usize, col: usize) -> Self {
        Self {
            kind,
            value: Some(value.to_string()),
            line,
            col,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self {
            kind: TokenType::Eof,
            value: None,
            line,
            col: 1,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.value, self.kind) {
            (Some(text), TokenType::Identifier | TokenType::Constant) => {
                write!(f, "{} '{}'", self.kind, text)
            }
            (Some(text), _) => write!(f, "'{}'", text),
            (None, _) => write!(f, "{}", self.kind),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    Identifier,
    Constant,

    // Keywords
    Int,
    Void,
    Return,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Tilde,
    Minus,
    MinusMinus,

    Eof,
}

impl TokenType {
    /// Reserved words are lexed as identifiers first, then reclassified
    fn keyword(text: &str) -> Option<TokenType> {
        match text {
            "int" => Some(TokenType::Int),
            "void" => Some(TokenType::Void),
            "return" => Some(TokenType::Return),
            _ => None,
        }
    }
}

impl Display for TokenType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TokenType::Identifier => "identifier",
            TokenType::Constant => "constant",
            TokenType::Int => "'int'",
            TokenType::Void => "'void'",
            TokenType::Return => "'return'",
            TokenType::OpenParen => "'('",
            TokenType::CloseParen => "')'",
            TokenType::OpenBrace => "'{'",
            TokenType::CloseBrace => "'}'",
            TokenType::Semicolon => "';'",
            TokenType::Tilde => "'~'",
            TokenType::Minus => "'-'",
            TokenType::MinusMinus => "'--'",
            TokenType::Eof => "end of input",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Copy, Debug)]
enum Pattern {
    Whitespace,
    LineComment,
    BlockCommentOpen,
    Identifier,
    Constant,
    Literal(&'static str),
}

#[derive(Clone, Copy, Debug)]
enum Action {
    Skip,
    OpenComment,
    Emit(TokenType),
}

/// Tried in order at every position; ties on length go to the earlier entry
const PATTERNS: [(Pattern, Action); 13] = [
    (Pattern::Whitespace, Action::Skip),
    (Pattern::LineComment, Action::Skip),
    (Pattern::BlockCommentOpen, Action::OpenComment),
    (Pattern::Identifier, Action::Emit(TokenType::Identifier)),
    (Pattern::Constant, Action::Emit(TokenType::Constant)),
    (Pattern::Literal("("), Action::Emit(TokenType::OpenParen)),
    (Pattern::Literal(")"), Action::Emit(TokenType::CloseParen)),
    (Pattern::Literal("{"), Action::Emit(TokenType::OpenBrace)),
    (Pattern::Literal("}"), Action::Emit(TokenType::CloseBrace)),
    (Pattern::Literal(";"), Action::Emit(TokenType::Semicolon)),
    (Pattern::Literal("~"), Action::Emit(TokenType::Tilde)),
    (Pattern::Literal("--"), Action::Emit(TokenType::MinusMinus)),
    (Pattern::Literal("-"), Action::Emit(TokenType::Minus)),
];

const BLOCK_COMMENT_CLOSE: &str = "*/";

impl Pattern {
    /// Length in bytes of the match at the start of `text`, 0 if none
    fn match_len(self, text: &str) -> usize {
        match self {
            Pattern::Whitespace => {
                let mut cursor = Cursor::new(text);
                cursor.advance_while(char::is_whitespace);
                cursor.consumed()
            }
            Pattern::LineComment => {
                if text.starts_with("//") {
                    text.len()
                } else {
                    0
                }
            }
            Pattern::BlockCommentOpen => prefix_len(text, "/*"),
            Pattern::Identifier => {
                let mut cursor = Cursor::new(text);
                if !is_ident_start(cursor.peek()) {
                    return 0;
                }
                cursor.advance();
                cursor.advance_while(is_ident_continue);
                cursor.consumed()
            }
            Pattern::Constant => {
                let mut cursor = Cursor::new(text);
                cursor.advance_while(|c| c.is_ascii_digit());
                // digits must end on a word boundary, `123abc` is not a constant
                if !cursor.is_eof() && is_ident_continue(cursor.peek()) {
                    0
                } else {
                    cursor.consumed()
                }
            }
            Pattern::Literal(literal) => prefix_len(text, literal),
        }
    }
}

fn prefix_len(text: &str, prefix: &str) -> usize {
    if text.starts_with(prefix) {
        prefix.len()
    } else {
        0
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn longest_match(text: &str) -> Option<(usize, Action)> {
    let mut best: Option<(usize, Action)> = None;

    for (pattern, action) in PATTERNS {
        let len = pattern.match_len(text);
        if len > 0 && best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, action));
        }
    }

    best
}

/// Tokenizes preprocessed source, one line at a time.
///
/// A lexer is consumed by [`Lexer::tokenize`], so every source gets fresh
/// line and comment state.
#[derive(Debug, Default)]
pub struct Lexer {
    line: usize,
    /// Line on which the currently open block comment started
    comment_start: Option<usize>,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokenize<I, S>(mut self, lines: I) -> Result<Vec<Token>, LexError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line += 1;
            self.scan_line(line.as_ref())?;
        }

        if let Some(line) = self.comment_start {
            return Err(LexError::UnterminatedComment { line });
        }

        self.tokens.push(Token::eof(self.line + 1));

        Ok(self.tokens)
    }

    fn scan_line(&mut self, text: &str) -> Result<(), LexError> {
        let mut pos = 0;

        while let Some(ch) = text[pos..].chars().next() {
            let rest = &text[pos..];

            if self.comment_start.is_some() {
                match rest.find(BLOCK_COMMENT_CLOSE) {
                    Some(end) => {
                        pos += end + BLOCK_COMMENT_CLOSE.len();
                        self.comment_start = None;
                        continue;
                    }
                    None => break,
                }
            }

            let Some((len, action)) = longest_match(rest) else {
                return Err(LexError::UnexpectedChar {
                    ch,
                    line: self.line,
                    col: column(text, pos),
                });
            };

            match action {
                Action::Skip => {}
                Action::OpenComment => self.comment_start = Some(self.line),
                Action::Emit(kind) => {
                    let lexeme = &rest[..len];
                    let kind = match kind {
                        TokenType::Identifier => TokenType::keyword(lexeme).unwrap_or(kind),
                        _ => kind,
                    };
                    self.tokens
                        .push(Token::new(kind, lexeme, self.line, column(text, pos)));
                }
            }

            pos += len;
        }

        Ok(())
    }
}

/// 1-based character column of byte offset `pos`
fn column(text: &str, pos: usize) -> usize {
    text[..pos].chars().count() + 1
}

pub fn tokenize<I, S>(lines: I) -> Result<Vec<Token>, LexError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Lexer::new().tokenize(lines)
}
