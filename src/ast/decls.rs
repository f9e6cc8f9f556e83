use crate::ast::{Comment, Comments, Expr, Label, StructLit};
use crate::lexer::Position;

/// A declaration in a file, struct body or list body.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub kind: DeclKind,
    pub comments: Comments,

    /// A blank line separates this declaration from the previous line
    pub blank_before: bool,
}

impl Decl {
    pub fn new(kind: DeclKind) -> Self {
        Decl {
            kind,
            comments: Comments::default(),
            blank_before: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// Package clause
    ///
    /// # Example
    /// ```text
    /// package main
    /// ```
    Package(String),

    /// Import declaration
    ///
    /// # Examples
    /// ```text
    /// import "strings"
    /// import (
    ///     "list"
    ///     s "strings"
    /// )
    /// ```
    Import(ImportDecl),

    /// Regular field
    ///
    /// # Examples
    /// ```text
    /// replicas: *1 | int
    /// name?: string
    /// "\(k)": v
    /// ```
    Field(Field),

    /// Embedded expression, also every plain list element
    Embed(Expr),

    /// Comprehension generating fields or list elements
    ///
    /// # Example
    /// ```text
    /// for k, v in parameter.labels {
    ///     "\(k)": v
    /// }
    /// ```
    Comprehension(Comprehension),

    /// Let declaration
    ///
    /// # Example
    /// ```text
    /// let name = parameter.name
    /// ```
    Let(LetClause),

    /// Ellipsis, optionally typed (`...` or `...string`)
    Ellipsis(Option<Expr>),

    /// Declaration attribute, kept as written
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub specs: Vec<ImportSpec>,

    /// Written with parentheses
    pub grouped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Local name, when given explicitly
    pub name: Option<String>,

    /// Import path, raw including quotes
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMarker {
    /// `name?: value`
    Optional,
    /// `name!: value`
    Required,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// `X` in `X=name: value`
    pub alias: Option<String>,
    pub label: Label,
    pub marker: Option<FieldMarker>,
    pub value: Expr,

    /// Attributes after the value, kept as written
    pub attrs: Vec<String>,
}

/// Comprehension: clauses in source order, then the generated struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    pub clauses: Vec<Clause>,
    pub body: StructLit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    For(ForClause),
    If(IfClause),
    Let(LetClause),
}

impl Clause {
    /// Comments between this clause and whatever follows it.
    pub fn comments(&self) -> &[Comment] {
        match self {
            Clause::For(f) => &f.comments,
            Clause::If(guard) => &guard.comments,
            Clause::Let(binding) => &binding.comments,
        }
    }

    pub fn comments_mut(&mut self) -> &mut Vec<Comment> {
        match self {
            Clause::For(f) => &mut f.comments,
            Clause::If(guard) => &mut guard.comments,
            Clause::Let(binding) => &mut binding.comments,
        }
    }
}

/// `for key, value in source`
#[derive(Debug, Clone, PartialEq)]
pub struct ForClause {
    /// Position of the `for` keyword
    pub pos: Option<Position>,
    pub key: Option<String>,
    pub value: String,
    pub source: Expr,
    pub comments: Vec<Comment>,
}

/// `if condition`
#[derive(Debug, Clone, PartialEq)]
pub struct IfClause {
    pub condition: Expr,
    pub comments: Vec<Comment>,
}

/// `let name = value`, as a clause or a declaration
#[derive(Debug, Clone, PartialEq)]
pub struct LetClause {
    pub name: String,
    pub value: Expr,

    /// Only filled for clauses; a declaration keeps its comments on the [`Decl`]
    pub comments: Vec<Comment>,
}
