use crate::ast::{Comment, Decl};

/// A parsed document.
///
/// Package clause, imports and every other top-level declaration appear in
/// [`File::decls`] in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct File {
    pub decls: Vec<Decl>,

    /// Comments after the last declaration
    pub trailing_comments: Vec<Comment>,
}
