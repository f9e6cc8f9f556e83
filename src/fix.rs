//! Rewriting of unguarded comprehensions over parameter fields.
//!
//! A comprehension such as
//!
//! ```text
//! for k, v in parameter.labels { "\(k)": v }
//! ```
//!
//! fails as a whole when `parameter.labels` is absent. The fixer rewrites the
//! source of every such `for` clause to `*parameter.labels | {}` so that a
//! missing field iterates over an empty struct instead, unless an earlier
//! `if parameter.labels != _|_` clause of the same comprehension already
//! proves the field exists.
//!
//! The walk covers file-level declarations, struct bodies, list elements and
//! the bodies of comprehensions at any depth. Only `for` sources are ever
//! replaced; comments, clause order and every other node are left alone,
//! and a second pass over a fixed tree finds nothing left to rewrite.
//!
//! # Examples
//!
//! ```
//! use velafix::fix::fix;
//! use velafix::parser::parse_file;
//! use velafix::printer::format_file;
//!
//! let file = parse_file("for k, v in parameter.p {\n\t\"\\(k)\": v\n}\n").unwrap();
//! assert_eq!(
//!     format_file(&fix(file)),
//!     "for k, v in *parameter.p | {} {\n\t\"\\(k)\": v\n}\n"
//! );
//! ```

use crate::ast::{BinOp, Clause, Decl, DeclKind, Expr, File, ForClause, StructLit, UnaryOp};
use crate::lexer::Position;
use crate::path::{AccessPath, equivalent, extract_path};
use std::mem;
use tracing::{debug, trace};

/// Root identifier protected when nothing else is configured.
pub const DEFAULT_BINDING: &str = "parameter";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixConfig {
    /// Only `for` sources rooted at this identifier are rewritten
    pub binding: String,
}

impl Default for FixConfig {
    fn default() -> Self {
        FixConfig {
            binding: DEFAULT_BINDING.to_string(),
        }
    }
}

impl FixConfig {
    pub fn with_binding(binding: impl Into<String>) -> Self {
        FixConfig {
            binding: binding.into(),
        }
    }
}

/// What the fixer did with one path-shaped `for` source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Replaced with `*source | {}`
    Rewritten,

    /// Left alone, an earlier `if` clause proves the field exists
    Guarded,

    /// Left alone, the path starts at some other identifier
    OtherRoot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Position of the `for` keyword, when the clause came from source text
    pub pos: Option<Position>,
    pub path: AccessPath,
    pub outcome: Outcome,
}

/// Findings of one pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixReport {
    pub findings: Vec<Finding>,
}

impl FixReport {
    fn count(&self, outcome: Outcome) -> usize {
        self.findings.iter().filter(|f| f.outcome == outcome).count()
    }

    pub fn rewritten(&self) -> usize {
        self.count(Outcome::Rewritten)
    }

    pub fn guarded(&self) -> usize {
        self.count(Outcome::Guarded)
    }

    pub fn other_roots(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.outcome == Outcome::OtherRoot)
    }

    /// True when the pass left the tree as it was.
    pub fn is_unchanged(&self) -> bool {
        self.rewritten() == 0
    }
}

/// Tree walker and clause-list transformer.
///
/// Holds configuration only; every call to [`Fixer::fix_file`] is
/// independent of the ones before it.
#[derive(Debug, Clone, Default)]
pub struct Fixer {
    config: FixConfig,
}

impl Fixer {
    pub fn new(config: FixConfig) -> Self {
        Fixer { config }
    }

    /// Rewrites every unguarded `for` source of the file in place.
    pub fn fix_file(&self, file: &mut File) -> FixReport {
        let mut report = FixReport::default();
        self.walk_decls(&mut file.decls, &mut report);
        debug!(
            rewritten = report.rewritten(),
            guarded = report.guarded(),
            "fixed file"
        );
        report
    }

    fn walk_decls(&self, decls: &mut [Decl], report: &mut FixReport) {
        for decl in decls {
            self.walk_decl(decl, report);
        }
    }

    fn walk_decl(&self, decl: &mut Decl, report: &mut FixReport) {
        match &mut decl.kind {
            DeclKind::Field(field) => self.walk_expr(&mut field.value, report),
            DeclKind::Embed(expr) => self.walk_expr(expr, report),
            DeclKind::Let(binding) => self.walk_expr(&mut binding.value, report),
            DeclKind::Ellipsis(Some(constraint)) => self.walk_expr(constraint, report),
            DeclKind::Comprehension(comprehension) => {
                // Decide on this clause list before descending into it
                self.fix_clauses(&mut comprehension.clauses, report);

                for clause in &mut comprehension.clauses {
                    match clause {
                        Clause::For(f) => self.walk_expr(&mut f.source, report),
                        Clause::If(guard) => self.walk_expr(&mut guard.condition, report),
                        Clause::Let(binding) => self.walk_expr(&mut binding.value, report),
                    }
                }
                self.walk_decls(&mut comprehension.body.elems, report);
            }
            DeclKind::Package(_)
            | DeclKind::Import(_)
            | DeclKind::Ellipsis(None)
            | DeclKind::Attribute(_) => {}
        }
    }

    fn walk_expr(&self, expr: &mut Expr, report: &mut FixReport) {
        match expr {
            Expr::Struct(s) => self.walk_decls(&mut s.elems, report),
            Expr::List(list) => self.walk_decls(&mut list.elems, report),
            Expr::Binary { left, right, .. } => {
                self.walk_expr(left, report);
                self.walk_expr(right, report);
            }
            Expr::Unary { operand, .. } => self.walk_expr(operand, report),
            Expr::Paren(inner) => self.walk_expr(inner, report),
            Expr::Call { func, args } => {
                self.walk_expr(func, report);
                for arg in args {
                    self.walk_expr(arg, report);
                }
            }
            Expr::Selector { object, .. } => self.walk_expr(object, report),
            Expr::Index { object, key } => {
                self.walk_expr(object, report);
                self.walk_expr(key, report);
            }
            Expr::Ident(_) | Expr::BasicLit(_) | Expr::Bottom => {}
        }
    }

    /// Judges every `for` clause of one comprehension against the clauses
    /// before it.
    fn fix_clauses(&self, clauses: &mut [Clause], report: &mut FixReport) {
        for i in 0..clauses.len() {
            let (preceding, rest) = clauses.split_at_mut(i);
            if let Clause::For(f) = &mut rest[0] {
                self.fix_for(f, preceding, report);
            }
        }
    }

    fn fix_for(&self, clause: &mut ForClause, preceding: &[Clause], report: &mut FixReport) {
        let Some(path) = extract_path(&clause.source) else {
            trace!(pos = ?clause.pos, "for source is not a path");
            return;
        };

        let outcome = if !path.is_rooted_at(&self.config.binding) {
            debug!(pos = ?clause.pos, %path, "for source has another root");
            Outcome::OtherRoot
        } else if is_guarded(&clause.source, preceding) {
            trace!(pos = ?clause.pos, %path, "for source is guarded");
            Outcome::Guarded
        } else {
            debug!(pos = ?clause.pos, %path, "defaulting for source to empty struct");
            rewrite_source(clause);
            Outcome::Rewritten
        };

        report.findings.push(Finding {
            pos: clause.pos,
            path,
            outcome,
        });
    }
}

fn is_guarded(source: &Expr, preceding: &[Clause]) -> bool {
    preceding.iter().any(|clause| match clause {
        Clause::If(guard) => guards(&guard.condition, source),
        Clause::For(_) | Clause::Let(_) => false,
    })
}

/// Whether `condition` being true proves that `source` exists.
fn guards(condition: &Expr, source: &Expr) -> bool {
    match condition {
        Expr::Binary {
            op: BinOp::NotEqual,
            left,
            right,
        } if matches!(right.as_ref(), Expr::Bottom) => equivalent(left, source),
        Expr::Binary {
            op: BinOp::And,
            left,
            right,
        } => guards(left, source) || guards(right, source),
        Expr::Paren(inner) => guards(inner, source),
        _ => false,
    }
}

fn rewrite_source(clause: &mut ForClause) {
    let source = mem::replace(&mut clause.source, Expr::Bottom);
    clause.source = default_to_empty(source);
}

/// Wraps `expr` as `*expr | {}`.
///
/// The synthesized `{}` carries no positions, so it always prints compactly.
pub fn default_to_empty(expr: Expr) -> Expr {
    Expr::binary(
        BinOp::Disjunction,
        Expr::unary(UnaryOp::Default, expr),
        Expr::Struct(StructLit::empty()),
    )
}

// Convenience functions

/// Fixes a file with the default configuration.
pub fn fix(mut file: File) -> File {
    Fixer::default().fix_file(&mut file);
    file
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn expr(source: &str) -> Expr {
        Parser::new(Lexer::new(source)).unwrap().parse().unwrap()
    }

    #[test]
    fn test_guard_shapes() {
        let source = expr("parameter.p");
        assert!(guards(&expr("parameter.p != _|_"), &source));
        assert!(guards(&expr(r#"parameter["p"] != _|_"#), &source));
        assert!(guards(&expr("(parameter.p != _|_)"), &source));
        assert!(guards(&expr("x > 1 && parameter.p != _|_"), &source));
        assert!(!guards(&expr("x > 1 || parameter.p != _|_"), &source));
        assert!(!guards(&expr("parameter.p == _|_"), &source));
        assert!(!guards(&expr("parameter.q != _|_"), &source));
        assert!(!guards(&expr("parameter.p"), &source));
    }

    #[test]
    fn test_default_to_empty_shape() {
        let wrapped = default_to_empty(expr("parameter.p"));
        let Expr::Binary { op, left, right } = wrapped else {
            panic!("expected disjunction");
        };
        assert_eq!(op, BinOp::Disjunction);
        assert_eq!(*left, Expr::unary(UnaryOp::Default, expr("parameter.p")));
        assert_eq!(*right, Expr::Struct(StructLit::empty()));
    }

    #[test]
    fn test_only_preceding_guards_count() {
        let clauses = vec![Clause::If(crate::ast::IfClause {
            condition: expr("parameter.p != _|_"),
            comments: vec![],
        })];
        assert!(is_guarded(&expr("parameter.p"), &clauses));
        assert!(!is_guarded(&expr("parameter.p"), &[]));
    }
}
