//! # Syntax tree for CUE documents
//!
//! This module defines the tree the parser produces, the fixer mutates and the
//! printer turns back into text. It covers the part of the language that
//! configuration templates actually use: fields, embeddings, structs, lists,
//! comprehensions and ordinary expressions.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Expression nodes, struct and list literals, labels
//! - **[operators]** - Unary and binary operators with their precedence
//! - **[decls]** - Declarations and comprehension clauses
//! - **[comments]** - Comments attached to declarations
//! - **[file]** - A complete parsed document
//!
//! ## Comprehensions
//!
//! A comprehension is a run of clauses followed by the struct it generates:
//!
//! ```text
//! if parameter.p != _|_ for k, v in parameter.p {
//!     "\(k)": v
//! }
//! ```
//!
//! The clauses are kept in source order in [`Comprehension::clauses`]; the
//! struct after the last clause is [`Comprehension::body`]. The same shape
//! appears at file level, inside structs and inside lists.
//!
//! ## Ownership
//!
//! The tree is strict: every node has exactly one owner. Comments live on the
//! declaration that owns them, so replacing an expression inside a declaration
//! never disturbs the comments around it.
pub mod comments;
pub mod decls;
pub mod expressions;
pub mod file;
pub mod operators;
pub mod tokens;

pub use comments::{Comment, Comments};
pub use decls::{
    Clause, Comprehension, Decl, DeclKind, Field, FieldMarker, ForClause, IfClause, ImportDecl,
    ImportSpec, LetClause,
};
pub use expressions::{BasicLit, Expr, Label, ListLit, LitKind, StructLit};
pub use file::File;
pub use operators::{BinOp, UnaryOp};
pub use tokens::Token;
