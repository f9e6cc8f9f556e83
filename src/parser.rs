use crate::{
    ast::{
        BasicLit, BinOp, Clause, Comment, Comments, Comprehension, Decl, DeclKind, Expr, Field,
        FieldMarker, File, ForClause, IfClause, ImportDecl, ImportSpec, Label, LetClause, ListLit,
        LitKind, StructLit, Token, UnaryOp,
    },
    lexer::{LexError, Lexer, Position, SpannedToken},
};
use std::mem;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{pos}: expected {expected}, found {found}")]
    Unexpected {
        expected: String,
        found: String,
        pos: Position,
    },

    #[error("{pos}: invalid field label")]
    InvalidLabel { pos: Position },
}

/// Where a run of declarations lives; decides what may appear and what ends it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclContext {
    File,
    Struct,
    List,
}

/// Parses a complete document.
pub fn parse_file(source: &str) -> Result<File, ParseError> {
    Parser::new(Lexer::new(source))?.parse_file()
}

pub struct Parser {
    lexer: Lexer,
    current: SpannedToken,
    peeked: Option<SpannedToken>,
    // Comments seen but not yet attached to a declaration
    pending_comments: Vec<Comment>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let mut current = lexer.next_token()?;
        let pending_comments = mem::take(&mut current.comments);
        Ok(Parser {
            lexer,
            current,
            peeked: None,
            pending_comments,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        let mut next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        self.pending_comments.append(&mut next.comments);
        self.current = next;
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token, ParseError> {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(&self.peeked.insert(next).token)
    }

    /// Takes the current token's payload; the caller advances afterwards.
    fn take_token(&mut self) -> Token {
        mem::replace(&mut self.current.token, Token::Eof)
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current.token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.unexpected(&expected.to_string()));
        }
        self.advance()
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match self.take_token() {
            Token::Ident(name) => {
                self.advance()?;
                Ok(name)
            }
            token => {
                self.current.token = token;
                Err(self.unexpected("identifier"))
            }
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::Unexpected {
            expected: expected.to_string(),
            found: self.current.token.to_string(),
            pos: self.current.pos,
        }
    }

    fn at_end_of(&self, ctx: DeclContext) -> bool {
        match ctx {
            DeclContext::File => self.check(&Token::Eof),
            DeclContext::Struct => self.check(&Token::RBrace),
            DeclContext::List => self.check(&Token::RBracket),
        }
    }

    /// Removes and returns pending comments that sit on the line of the
    /// declaration just parsed.
    fn take_trailing_comments(&mut self) -> Vec<Comment> {
        let (trailing, rest): (Vec<_>, Vec<_>) = mem::take(&mut self.pending_comments)
            .into_iter()
            .partition(|c| !c.own_line);
        self.pending_comments = rest;
        trailing
    }
}

// Declarations
impl Parser {
    /// Parse a complete file
    pub fn parse_file(&mut self) -> Result<File, ParseError> {
        let (decls, trailing_comments) = self.parse_decls(DeclContext::File)?;
        Ok(File {
            decls,
            trailing_comments,
        })
    }

    /// Parses declarations up to the end of `ctx` without consuming the
    /// closing token. Also returns the comments found before it.
    fn parse_decls(&mut self, ctx: DeclContext) -> Result<(Vec<Decl>, Vec<Comment>), ParseError> {
        let mut decls = Vec::new();

        loop {
            let leading = mem::take(&mut self.pending_comments);
            if self.at_end_of(ctx) {
                return Ok((decls, leading));
            }

            let blank_before = self.current.blank_line_before;
            let kind = self.parse_decl(ctx)?;

            if self.check(&Token::Comma) {
                self.advance()?;
            } else if !self.at_end_of(ctx) && !self.current.newline_before {
                return Err(self.unexpected("',' or newline"));
            }

            let trailing = self.take_trailing_comments();
            decls.push(Decl {
                kind,
                comments: Comments { leading, trailing },
                blank_before,
            });
        }
    }

    fn parse_decl(&mut self, ctx: DeclContext) -> Result<DeclKind, ParseError> {
        if ctx == DeclContext::File {
            if self.check(&Token::Package) && matches!(self.peek()?, Token::Ident(_)) {
                self.advance()?;
                return Ok(DeclKind::Package(self.expect_ident()?));
            }
            if self.check(&Token::Import)
                && matches!(self.peek()?, Token::String(_) | Token::Ident(_) | Token::LParen)
            {
                return self.parse_import();
            }
        }

        if ctx != DeclContext::List {
            if let Some(name) = self.current.token.keyword_name() {
                if matches!(self.peek()?, Token::Colon | Token::Question) {
                    self.advance()?;
                    return self.parse_field(None, Label::Ident(name.to_string()));
                }
            }
        }

        if ctx != DeclContext::List
            && matches!(self.current.token, Token::Ident(_))
            && matches!(self.peek()?, Token::Assign)
        {
            return self.parse_aliased_field();
        }

        match self.current.token {
            Token::For | Token::If => {
                return Ok(DeclKind::Comprehension(self.parse_comprehension()?));
            }
            Token::Let if ctx != DeclContext::List => {
                self.advance()?;
                return Ok(DeclKind::Let(self.parse_let_binding()?));
            }
            Token::Ellipsis => {
                self.advance()?;
                let constraint = if self.check(&Token::RBrace)
                    || self.check(&Token::RBracket)
                    || self.check(&Token::Comma)
                    || self.current.newline_before
                {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                return Ok(DeclKind::Ellipsis(constraint));
            }
            Token::Attribute(_) if ctx != DeclContext::List => {
                if let Token::Attribute(raw) = self.take_token() {
                    self.advance()?;
                    return Ok(DeclKind::Attribute(raw));
                }
            }
            _ => {}
        }

        let start = self.current.pos;
        let expr = self.parse_expression()?;

        if ctx != DeclContext::List && self.at_label_end() {
            let label = label_from_expr(expr, start)?;
            return self.parse_field(None, label);
        }

        Ok(DeclKind::Embed(expr))
    }

    /// `X=label: value`, starting at the alias.
    fn parse_aliased_field(&mut self) -> Result<DeclKind, ParseError> {
        let alias = self.expect_ident()?;
        self.expect(Token::Assign)?;

        let start = self.current.pos;
        let expr = self.parse_expression()?;
        if !self.at_label_end() {
            return Err(self.unexpected("':'"));
        }
        self.parse_field(Some(alias), label_from_expr(expr, start)?)
    }

    /// Parses the rest of a field once its label has been consumed.
    fn parse_field(&mut self, alias: Option<String>, label: Label) -> Result<DeclKind, ParseError> {
        let marker = if self.check(&Token::Question) {
            self.advance()?;
            Some(FieldMarker::Optional)
        } else if self.check(&Token::Exclamation) {
            self.advance()?;
            Some(FieldMarker::Required)
        } else {
            None
        };

        self.expect(Token::Colon)?;
        let value = self.parse_field_value()?;

        let mut attrs = Vec::new();
        while matches!(self.current.token, Token::Attribute(_)) && !self.current.newline_before {
            if let Token::Attribute(raw) = self.take_token() {
                attrs.push(raw);
            }
            self.advance()?;
        }

        Ok(DeclKind::Field(Field {
            alias,
            label,
            marker,
            value,
            attrs,
        }))
    }

    /// A field value, including the `a: b: c` shorthand for nested structs.
    fn parse_field_value(&mut self) -> Result<Expr, ParseError> {
        let field = if matches!(self.current.token, Token::Ident(_))
            && matches!(self.peek()?, Token::Assign)
        {
            self.parse_aliased_field()?
        } else {
            let start = self.current.pos;
            let value = self.parse_expression()?;
            if !self.at_label_end() {
                return Ok(value);
            }
            self.parse_field(None, label_from_expr(value, start)?)?
        };

        Ok(Expr::Struct(StructLit {
            elems: vec![Decl::new(field)],
            ..StructLit::default()
        }))
    }

    /// A `:`, `?:` or `!:` on the same line turns what was just parsed into
    /// a label.
    fn at_label_end(&self) -> bool {
        !self.current.newline_before
            && (self.check(&Token::Colon)
                || self.check(&Token::Question)
                || self.check(&Token::Exclamation))
    }

    fn parse_import(&mut self) -> Result<DeclKind, ParseError> {
        self.advance()?; // consume 'import'

        if !self.check(&Token::LParen) {
            let spec = self.parse_import_spec()?;
            return Ok(DeclKind::Import(ImportDecl {
                specs: vec![spec],
                grouped: false,
            }));
        }

        self.advance()?;
        let mut specs = Vec::new();
        while !self.check(&Token::RParen) {
            specs.push(self.parse_import_spec()?);
            if self.check(&Token::Comma) {
                self.advance()?;
            }
        }
        self.expect(Token::RParen)?;

        Ok(DeclKind::Import(ImportDecl {
            specs,
            grouped: true,
        }))
    }

    fn parse_import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let name = if matches!(self.current.token, Token::Ident(_)) {
            Some(self.expect_ident()?)
        } else {
            None
        };

        match self.take_token() {
            Token::String(path) => {
                self.advance()?;
                Ok(ImportSpec { name, path })
            }
            token => {
                self.current.token = token;
                Err(self.unexpected("import path"))
            }
        }
    }

    fn parse_comprehension(&mut self) -> Result<Comprehension, ParseError> {
        let mut clauses = Vec::new();

        loop {
            let clause = match self.current.token {
                Token::For => Clause::For(self.parse_for_clause()?),
                Token::If => {
                    self.advance()?;
                    Clause::If(IfClause {
                        condition: self.parse_expression()?,
                        comments: Vec::new(),
                    })
                }
                Token::Let if !clauses.is_empty() => {
                    self.advance()?;
                    Clause::Let(self.parse_let_binding()?)
                }
                Token::Comma if !clauses.is_empty() => {
                    self.advance()?;
                    self.attach_clause_comments(&mut clauses);
                    continue;
                }
                Token::LBrace if !clauses.is_empty() => break,
                _ => return Err(self.unexpected("comprehension clause or '{'")),
            };
            clauses.push(clause);
            self.attach_clause_comments(&mut clauses);
        }

        let body = self.parse_struct_lit()?;
        Ok(Comprehension { clauses, body })
    }

    /// Comments met since the last clause stay with it.
    fn attach_clause_comments(&mut self, clauses: &mut [Clause]) {
        if let Some(clause) = clauses.last_mut() {
            clause.comments_mut().append(&mut self.pending_comments);
        }
    }

    fn parse_for_clause(&mut self) -> Result<ForClause, ParseError> {
        let pos = self.current.pos;
        self.advance()?; // consume 'for'

        let first = self.expect_ident()?;
        let (key, value) = if self.check(&Token::Comma) {
            self.advance()?;
            (Some(first), self.expect_ident()?)
        } else {
            (None, first)
        };

        self.expect(Token::In)?;
        let source = self.parse_expression()?;

        Ok(ForClause {
            pos: Some(pos),
            key,
            value,
            source,
            comments: Vec::new(),
        })
    }

    /// `name = value`, after the `let` keyword.
    fn parse_let_binding(&mut self) -> Result<LetClause, ParseError> {
        let name = self.expect_ident()?;
        self.expect(Token::Assign)?;
        let value = self.parse_expression()?;
        Ok(LetClause {
            name,
            value,
            comments: Vec::new(),
        })
    }

    fn parse_struct_lit(&mut self) -> Result<StructLit, ParseError> {
        let lbrace = self.current.pos;
        self.expect(Token::LBrace)?;
        let open_comments = self.take_trailing_comments();
        let (elems, trailing_comments) = self.parse_decls(DeclContext::Struct)?;
        let rbrace = self.current.pos;
        self.expect(Token::RBrace)?;

        Ok(StructLit {
            elems,
            lbrace: Some(lbrace),
            rbrace: Some(rbrace),
            open_comments,
            trailing_comments,
        })
    }

    fn parse_list_lit(&mut self) -> Result<ListLit, ParseError> {
        let lbracket = self.current.pos;
        self.expect(Token::LBracket)?;
        let open_comments = self.take_trailing_comments();
        let (elems, trailing_comments) = self.parse_decls(DeclContext::List)?;
        let rbracket = self.current.pos;
        self.expect(Token::RBracket)?;

        Ok(ListLit {
            elems,
            lbracket: Some(lbracket),
            rbracket: Some(rbracket),
            open_comments,
            trailing_comments,
        })
    }
}

// Expressions
impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_binary(1)
    }

    /// Parse a single expression that must span the whole input
    pub fn parse(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        self.expect(Token::Eof)?;
        Ok(expr)
    }

    /// Precedence climbing over the binary operators.
    ///
    /// A line break before an operator ends the expression, so operators
    /// continue an expression only from the end of a line.
    fn parse_binary(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        loop {
            if self.current.newline_before {
                break;
            }
            let Some(op) = binary_op(&self.current.token) else {
                break;
            };
            if op.precedence() < min_precedence {
                break;
            }

            self.advance()?;
            let right = self.parse_binary(op.precedence() + 1)?;
            left = Expr::binary(op, left, right);
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current.token {
            Token::Star => UnaryOp::Default,
            Token::Exclamation => UnaryOp::Not,
            Token::Minus => UnaryOp::Negate,
            Token::Plus => UnaryOp::Plus,
            Token::Lt => UnaryOp::LessThan,
            Token::LtEq => UnaryOp::LessEqual,
            Token::Gt => UnaryOp::GreaterThan,
            Token::GtEq => UnaryOp::GreaterEqual,
            Token::Match => UnaryOp::Match,
            Token::NotMatch => UnaryOp::NotMatch,
            Token::NotEq => UnaryOp::NotEqual,
            _ => return self.parse_access(),
        };

        self.advance()?;
        let operand = self.parse_unary()?;
        Ok(Expr::unary(op, operand))
    }

    /// Parse selectors, index expressions and calls
    fn parse_access(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.current.newline_before {
                break;
            }

            if self.check(&Token::Dot) {
                self.advance()?; // consume '.'

                let field = match self.take_token() {
                    Token::Ident(name) => name,
                    token => match token.keyword_name() {
                        Some(name) => name.to_string(),
                        None => {
                            self.current.token = token;
                            return Err(self.unexpected("field name after '.'"));
                        }
                    },
                };
                self.advance()?;

                expr = Expr::Selector {
                    object: Box::new(expr),
                    field,
                };
            } else if self.check(&Token::LBracket) {
                self.advance()?; // consume '['
                let key = self.parse_expression()?;
                self.expect(Token::RBracket)?;

                expr = Expr::Index {
                    object: Box::new(expr),
                    key: Box::new(key),
                };
            } else if self.check(&Token::LParen) {
                self.advance()?; // consume '('
                let mut args = vec![];
                while !self.check(&Token::RParen) {
                    args.push(self.parse_expression()?);
                    if !self.check(&Token::RParen) {
                        self.expect(Token::Comma)?;
                    }
                }
                self.expect(Token::RParen)?;

                expr = Expr::Call {
                    func: Box::new(expr),
                    args,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Parse primary expressions: names, literals, parentheses, structs, lists
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.current.token {
            Token::LBrace => return Ok(Expr::Struct(self.parse_struct_lit()?)),
            Token::LBracket => return Ok(Expr::List(self.parse_list_lit()?)),
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(Token::RParen)?;
                return Ok(Expr::Paren(Box::new(inner)));
            }
            _ => {}
        }

        let expr = match self.take_token() {
            Token::Ident(name) => Expr::Ident(name),
            Token::Int(raw) => Expr::BasicLit(BasicLit::new(LitKind::Int, raw)),
            Token::Float(raw) => Expr::BasicLit(BasicLit::new(LitKind::Float, raw)),
            Token::String(raw) => Expr::BasicLit(BasicLit::new(LitKind::String, raw)),
            Token::Boolean(b) => Expr::BasicLit(BasicLit::new(LitKind::Bool, b.to_string())),
            Token::Null => Expr::BasicLit(BasicLit::new(LitKind::Null, "null")),
            Token::Bottom => Expr::Bottom,
            token => {
                self.current.token = token;
                return Err(self.unexpected("expression"));
            }
        };

        self.advance()?;
        Ok(expr)
    }
}

fn binary_op(token: &Token) -> Option<BinOp> {
    let op = match token {
        Token::Pipe => BinOp::Disjunction,
        Token::Amp => BinOp::Unification,
        Token::OrOr => BinOp::Or,
        Token::AndAnd => BinOp::And,
        Token::EqEq => BinOp::Equal,
        Token::NotEq => BinOp::NotEqual,
        Token::Match => BinOp::Match,
        Token::NotMatch => BinOp::NotMatch,
        Token::Lt => BinOp::LessThan,
        Token::LtEq => BinOp::LessEqual,
        Token::Gt => BinOp::GreaterThan,
        Token::GtEq => BinOp::GreaterEqual,
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Subtract,
        Token::Star => BinOp::Multiply,
        Token::Slash => BinOp::Divide,
        _ => return None,
    };
    Some(op)
}

/// Reinterprets an expression parsed at the start of a declaration as the
/// label of a field.
fn label_from_expr(expr: Expr, pos: Position) -> Result<Label, ParseError> {
    match expr {
        Expr::Ident(name) => Ok(Label::Ident(name)),
        Expr::BasicLit(lit) if lit.kind == LitKind::String => Ok(Label::String(lit.value)),
        Expr::Paren(inner) => Ok(Label::Paren(*inner)),
        Expr::List(mut list)
            if list.elems.len() == 1
                && list.open_comments.is_empty()
                && list.trailing_comments.is_empty() =>
        {
            match list.elems.pop().map(|decl| decl.kind) {
                Some(DeclKind::Embed(pattern)) => Ok(Label::Pattern(pattern)),
                _ => Err(ParseError::InvalidLabel { pos }),
            }
        }
        _ => Err(ParseError::InvalidLabel { pos }),
    }
}
