use crate::ast::{Comment, Token};
use std::fmt;
use thiserror::Error;

/// 1-based line and column of a character in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("{pos}: unexpected character '{ch}'")]
    UnexpectedChar { ch: char, pos: Position },

    #[error("{pos}: string literal not terminated")]
    UnterminatedString { pos: Position },

    #[error("{pos}: interpolation not terminated")]
    UnterminatedInterpolation { pos: Position },

    #[error("{pos}: malformed attribute")]
    MalformedAttribute { pos: Position },
}

/// A token together with its layout context.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub pos: Position,

    /// At least one line break separates this token from the previous one
    pub newline_before: bool,

    /// A blank line separates this token from the previous token or comment
    pub blank_line_before: bool,

    /// Comments between the previous token and this one
    pub comments: Vec<Comment>,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    // Line on which the previous token ended
    last_token_line: usize,
    // Line on which the previous token or comment ended
    last_line: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            last_token_line: 0,
            last_line: 0,
        }
    }

    /// Lexes the whole input, up to and including [`Token::Eof`].
    pub fn tokenize(mut self) -> Result<Vec<SpannedToken>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += 1;
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn pos(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_comment(&mut self) -> String {
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch == '\n' {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text.trim_end().to_string()
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        if let Some(first) = self.current_char() {
            result.push(first);
            self.advance();
            if first == '_' && self.current_char() == Some('#') {
                result.push('#');
                self.advance();
            }
        }
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn is_triple(&self, quote: char) -> bool {
        self.current_char() == Some(quote)
            && self.peek_char(1) == Some(quote)
            && self.peek_char(2) == Some(quote)
    }

    /// Reads a string or bytes literal and returns it exactly as written.
    fn read_string(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.pos();
        if self.is_triple(quote) {
            return self.read_multiline_string(quote, start);
        }

        let mut raw = String::new();
        raw.push(quote);
        self.advance();

        loop {
            match self.current_char() {
                None | Some('\n') => return Err(LexError::UnterminatedString { pos: start }),
                Some(c) if c == quote => {
                    raw.push(c);
                    self.advance();
                    return Ok(raw);
                }
                Some('\\') => {
                    raw.push('\\');
                    self.advance();
                    self.read_escape(&mut raw, start)?;
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_multiline_string(&mut self, quote: char, start: Position) -> Result<String, LexError> {
        let mut raw: String = [quote; 3].iter().collect();
        self.advance_by(3);

        loop {
            if self.is_triple(quote) {
                raw.extend([quote; 3]);
                self.advance_by(3);
                return Ok(raw);
            }
            match self.current_char() {
                None => return Err(LexError::UnterminatedString { pos: start }),
                Some('\\') => {
                    raw.push('\\');
                    self.advance();
                    self.read_escape(&mut raw, start)?;
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
    }

    /// Reads a `#"..."#` string, with any number of `#`, exactly as written.
    ///
    /// Escapes need as many `#` as the delimiters, so `\(` is plain text and
    /// `\#(x)` interpolates.
    fn read_raw_string(&mut self) -> Result<String, LexError> {
        let start = self.pos();
        let mut raw = String::new();
        let mut hashes = 0;
        while self.current_char() == Some('#') {
            raw.push('#');
            hashes += 1;
            self.advance();
        }

        let quote = match self.current_char() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(LexError::UnexpectedChar { ch: '#', pos: start }),
        };
        let multiline = self.is_triple(quote);
        let open: String = if multiline {
            [quote; 3].iter().collect()
        } else {
            quote.to_string()
        };
        raw.push_str(&open);
        self.advance_by(open.len());
        let close = format!("{open}{}", "#".repeat(hashes));

        loop {
            if self.at(&close) {
                raw.push_str(&close);
                self.advance_by(close.len());
                return Ok(raw);
            }
            match self.current_char() {
                None => return Err(LexError::UnterminatedString { pos: start }),
                Some('\n') if !multiline => {
                    return Err(LexError::UnterminatedString { pos: start });
                }
                Some('\\') if self.at(&format!("\\{}(", "#".repeat(hashes))) => {
                    let pos = self.pos();
                    raw.push('\\');
                    raw.push_str(&"#".repeat(hashes));
                    self.advance_by(1 + hashes);
                    if !self.read_balanced(&mut raw)? {
                        return Err(LexError::UnterminatedInterpolation { pos });
                    }
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
    }

    /// The input continues with `text`.
    fn at(&self, text: &str) -> bool {
        text.chars()
            .enumerate()
            .all(|(i, c)| self.peek_char(i) == Some(c))
    }

    // Called with the backslash already consumed.
    fn read_escape(&mut self, raw: &mut String, start: Position) -> Result<(), LexError> {
        match self.current_char() {
            Some('(') => {
                let pos = self.pos();
                if !self.read_balanced(raw)? {
                    return Err(LexError::UnterminatedInterpolation { pos });
                }
                Ok(())
            }
            Some(c) if c != '\n' => {
                raw.push(c);
                self.advance();
                Ok(())
            }
            _ => Err(LexError::UnterminatedString { pos: start }),
        }
    }

    /// Copies a parenthesized run, starting at `(`, into `raw`.
    ///
    /// Nested strings are read as strings so that parentheses inside them do
    /// not count. Returns `false` when the input ends first.
    fn read_balanced(&mut self, raw: &mut String) -> Result<bool, LexError> {
        let mut depth = 0usize;
        loop {
            match self.current_char() {
                None => return Ok(false),
                Some('(') => {
                    depth += 1;
                    raw.push('(');
                    self.advance();
                }
                Some(')') => {
                    depth -= 1;
                    raw.push(')');
                    self.advance();
                    if depth == 0 {
                        return Ok(true);
                    }
                }
                Some(q @ ('"' | '\'')) => {
                    let nested = self.read_string(q)?;
                    raw.push_str(&nested);
                }
                Some(c) => {
                    raw.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_attribute(&mut self) -> Result<String, LexError> {
        let pos = self.pos();
        let mut raw = String::from("@");
        self.advance();

        if !self
            .current_char()
            .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        {
            return Err(LexError::MalformedAttribute { pos });
        }
        raw.push_str(&self.read_identifier());

        if self.current_char() != Some('(') || !self.read_balanced(&mut raw)? {
            return Err(LexError::MalformedAttribute { pos });
        }
        Ok(raw)
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        let mut is_float = false;

        if self.current_char() == Some('0')
            && matches!(
                self.peek_char(1),
                Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')
            )
        {
            while let Some(ch) = self.current_char() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            return Token::Int(number);
        }

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() || ch == '_' {
                number.push(ch);
                self.advance();
            } else if ch == '.'
                && !is_float
                && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
            {
                is_float = true;
                number.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E')
                && (self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
                    || (matches!(self.peek_char(1), Some('+' | '-'))
                        && self.peek_char(2).is_some_and(|c| c.is_ascii_digit())))
            {
                is_float = true;
                number.push(ch);
                self.advance();
                if let Some(sign @ ('+' | '-')) = self.current_char() {
                    number.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        // Multipliers such as 2K, 1.5Gi
        if let Some(unit @ ('K' | 'M' | 'G' | 'T' | 'P')) = self.current_char() {
            number.push(unit);
            self.advance();
            if self.current_char() == Some('i') {
                number.push('i');
                self.advance();
            }
            return Token::Int(number);
        }

        if is_float {
            Token::Float(number)
        } else {
            Token::Int(number)
        }
    }

    pub fn next_token(&mut self) -> Result<SpannedToken, LexError> {
        let mut comments = Vec::new();
        loop {
            self.skip_whitespace();
            if self.current_char() == Some('/') && self.peek_char(1) == Some('/') {
                let line = self.line;
                let text = self.read_comment();
                comments.push(Comment {
                    text,
                    blank_before: line > self.last_line + 1,
                    own_line: line > self.last_line,
                });
                self.last_line = line;
            } else {
                break;
            }
        }

        let pos = self.pos();
        let newline_before = pos.line > self.last_token_line;
        let blank_line_before = pos.line > self.last_line + 1;
        let token = self.scan(pos)?;
        self.last_token_line = self.line;
        self.last_line = self.line;

        Ok(SpannedToken {
            token,
            pos,
            newline_before,
            blank_line_before,
            comments,
        })
    }

    fn scan(&mut self, pos: Position) -> Result<Token, LexError> {
        let Some(ch) = self.current_char() else {
            return Ok(Token::Eof);
        };

        let token = match ch {
            '|' => {
                if self.peek_char(1) == Some('|') {
                    self.advance_by(2);
                    Token::OrOr
                } else {
                    self.advance();
                    Token::Pipe
                }
            }
            '&' => {
                if self.peek_char(1) == Some('&') {
                    self.advance_by(2);
                    Token::AndAnd
                } else {
                    self.advance();
                    Token::Amp
                }
            }
            '=' => match self.peek_char(1) {
                Some('=') => {
                    self.advance_by(2);
                    Token::EqEq
                }
                Some('~') => {
                    self.advance_by(2);
                    Token::Match
                }
                _ => {
                    self.advance();
                    Token::Assign
                }
            },
            '!' => match self.peek_char(1) {
                Some('=') => {
                    self.advance_by(2);
                    Token::NotEq
                }
                Some('~') => {
                    self.advance_by(2);
                    Token::NotMatch
                }
                _ => {
                    self.advance();
                    Token::Exclamation
                }
            },
            '<' => {
                if self.peek_char(1) == Some('=') {
                    self.advance_by(2);
                    Token::LtEq
                } else {
                    self.advance();
                    Token::Lt
                }
            }
            '>' => {
                if self.peek_char(1) == Some('=') {
                    self.advance_by(2);
                    Token::GtEq
                } else {
                    self.advance();
                    Token::Gt
                }
            }
            '.' => {
                if self.peek_char(1) == Some('.') && self.peek_char(2) == Some('.') {
                    self.advance_by(3);
                    Token::Ellipsis
                } else if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.read_number()
                } else {
                    self.advance();
                    Token::Dot
                }
            }
            '_' if self.peek_char(1) == Some('|') && self.peek_char(2) == Some('_') => {
                self.advance_by(3);
                Token::Bottom
            }
            '+' => self.single(Token::Plus),
            '-' => self.single(Token::Minus),
            '*' => self.single(Token::Star),
            '/' => self.single(Token::Slash),
            '?' => self.single(Token::Question),
            ':' => self.single(Token::Colon),
            ',' => self.single(Token::Comma),
            '(' => self.single(Token::LParen),
            ')' => self.single(Token::RParen),
            '[' => self.single(Token::LBracket),
            ']' => self.single(Token::RBracket),
            '{' => self.single(Token::LBrace),
            '}' => self.single(Token::RBrace),
            '"' | '\'' => Token::String(self.read_string(ch)?),
            '@' => Token::Attribute(self.read_attribute()?),
            '#' if self
                .peek_char(1)
                .is_some_and(|c| c.is_alphabetic() || c == '_') =>
            {
                Token::Ident(self.read_identifier())
            }
            '#' if matches!(self.peek_char(1), Some('#' | '"' | '\'')) => {
                Token::String(self.read_raw_string()?)
            }
            c if c.is_alphabetic() || c == '_' || c == '$' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "package" => Token::Package,
                    "import" => Token::Import,
                    "for" => Token::For,
                    "in" => Token::In,
                    "if" => Token::If,
                    "let" => Token::Let,
                    "true" => Token::Boolean(true),
                    "false" => Token::Boolean(false),
                    "null" => Token::Null,
                    _ => Token::Ident(ident),
                }
            }
            c if c.is_ascii_digit() => self.read_number(),
            c => return Err(LexError::UnexpectedChar { ch: c, pos }),
        };
        Ok(token)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }
}

#[cfg(test)]
fn kinds(input: &str) -> Vec<Token> {
    Lexer::new(input)
        .tokenize()
        .unwrap()
        .into_iter()
        .map(|t| t.token)
        .collect()
}

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("package import for in if let true false null"),
        vec![
            Token::Package,
            Token::Import,
            Token::For,
            Token::In,
            Token::If,
            Token::Let,
            Token::Boolean(true),
            Token::Boolean(false),
            Token::Null,
            Token::Eof,
        ]
    );
}

#[test]
fn test_guard() {
    assert_eq!(
        kinds("if parameter.p != _|_"),
        vec![
            Token::If,
            Token::Ident("parameter".to_string()),
            Token::Dot,
            Token::Ident("p".to_string()),
            Token::NotEq,
            Token::Bottom,
            Token::Eof,
        ]
    );
}

#[test]
fn test_default_to_empty() {
    assert_eq!(
        kinds("*parameter[\"p\"] | {}"),
        vec![
            Token::Star,
            Token::Ident("parameter".to_string()),
            Token::LBracket,
            Token::String("\"p\"".to_string()),
            Token::RBracket,
            Token::Pipe,
            Token::LBrace,
            Token::RBrace,
            Token::Eof,
        ]
    );
}
