use crate::ast::{BinOp, Comment, Decl, UnaryOp};
use crate::lexer::Position;

/// Expression node.
///
/// Only identifiers, selectors and index expressions matter to the fixer;
/// every other shape is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // References
    /// Identifier reference
    ///
    /// # Examples
    /// ```text
    /// parameter
    /// #Config
    /// ```
    Ident(String),

    // Literals
    /// Number, string, bytes, boolean or null literal
    BasicLit(BasicLit),

    /// Bottom value (`_|_`)
    Bottom,

    // Access
    /// Field selection
    ///
    /// # Examples
    /// ```text
    /// parameter.p
    /// context.output.spec
    /// ```
    Selector { object: Box<Expr>, field: String },

    /// Index access
    ///
    /// # Examples
    /// ```text
    /// parameter["p"]
    /// list[0]
    /// ```
    Index { object: Box<Expr>, key: Box<Expr> },

    /// Function call
    ///
    /// # Example
    /// ```text
    /// strings.Join(parts, ",")
    /// ```
    Call { func: Box<Expr>, args: Vec<Expr> },

    // Operations
    /// Prefix operation, including default markers and bounds
    ///
    /// # Examples
    /// ```text
    /// *"default"
    /// >=0
    /// !enabled
    /// ```
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Binary operation
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Parenthesized expression
    Paren(Box<Expr>),

    // Composite literals
    /// Struct literal
    Struct(StructLit),

    /// List literal
    List(ListLit),
}

impl Expr {
    /// Binary expression helper.
    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary expression helper.
    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    String,
    Bool,
    Null,
}

/// Literal kept exactly as written in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
}

impl BasicLit {
    pub fn new(kind: LitKind, value: impl Into<String>) -> Self {
        BasicLit {
            kind,
            value: value.into(),
        }
    }

    /// Decoded text of a plain double-quoted string.
    ///
    /// Returns `None` for anything else: numbers, bytes, raw and multi-line
    /// strings, and strings containing interpolations.
    pub fn string_value(&self) -> Option<String> {
        if self.kind != LitKind::String {
            return None;
        }
        let raw = self.value.as_str();
        if !raw.starts_with('"') || raw.starts_with("\"\"\"") || raw.contains("\\(") {
            return None;
        }
        serde_json::from_str::<String>(raw).ok()
    }
}

/// Struct literal `{ ... }`.
///
/// Brace positions come from the parser and decide whether the printer keeps
/// the struct on one line. A struct without an opening brace position and
/// with a single field is the `a: b: c` shorthand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructLit {
    pub elems: Vec<Decl>,
    pub lbrace: Option<Position>,
    pub rbrace: Option<Position>,

    /// Comments after the opening brace on its line
    pub open_comments: Vec<Comment>,

    /// Comments between the last declaration and the closing brace
    pub trailing_comments: Vec<Comment>,
}

impl StructLit {
    /// An empty struct with no position information, printed as `{}`.
    pub fn empty() -> Self {
        StructLit::default()
    }

    pub fn is_shorthand(&self) -> bool {
        self.lbrace.is_none()
            && self.elems.len() == 1
            && self.open_comments.is_empty()
            && self.trailing_comments.is_empty()
            && matches!(self.elems[0].kind, crate::ast::DeclKind::Field(_))
    }
}

/// List literal `[ ... ]`.
///
/// Elements are declarations so that list comprehensions and per-element
/// comments share the struct machinery.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListLit {
    pub elems: Vec<Decl>,
    pub lbracket: Option<Position>,
    pub rbracket: Option<Position>,
    pub open_comments: Vec<Comment>,
    pub trailing_comments: Vec<Comment>,
}

/// Field label.
#[derive(Debug, Clone, PartialEq)]
pub enum Label {
    /// `name: value`
    Ident(String),

    /// `"name": value`, raw text including quotes and interpolations
    String(String),

    /// `(expr): value`
    Paren(Expr),

    /// `[pattern]: value`
    Pattern(Expr),
}
