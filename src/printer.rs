//! Canonical text output for syntax trees.
//!
//! The printer is the inverse of the parser: printing a parsed file and
//! parsing the result again yields a tree that prints identically. It keeps
//! the layout decisions recorded in the tree and normalizes everything else.
//!
//! # Layout rules
//!
//! - **Indentation** - one tab per nesting level
//! - **Structs and lists** - stay on one line when their brackets were on one
//!   line and nothing inside needs a line of its own; nodes built without
//!   positions (such as a synthesized `{}`) print compactly when empty
//! - **Lists** - every element of a multi-line list ends with `,`
//! - **Comprehensions** - all clauses on the line of the generated struct,
//!   unless a comment ends a clause's line
//! - **Fields** - values of consecutive single-line fields line up in one
//!   column; a blank line, a comment or any other declaration ends the run
//! - **Blank lines** - at most one, never directly after an opening bracket
//!
//! # Examples
//!
//! ```
//! use velafix::parser::parse_file;
//! use velafix::printer::format_file;
//!
//! let file = parse_file("a: 1\nlonger: {x: 2}\n").unwrap();
//! assert_eq!(format_file(&file), "a:      1\nlonger: {x: 2}\n");
//! ```

use crate::ast::{
    Clause, Comment, Comprehension, Decl, DeclKind, Expr, FieldMarker, File, ImportDecl,
    ImportSpec, Label, ListLit, StructLit,
};
use crate::lexer::Position;

/// A declaration rendered for a block: the `label:` head, when it has one,
/// and everything after it.
struct Line {
    head: Option<String>,
    body: String,
}

impl Line {
    fn body(body: String) -> Self {
        Line { head: None, body }
    }

    fn inline(&self) -> String {
        match &self.head {
            Some(head) => format!("{} {}", head, self.body),
            None => self.body.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Printer
    }

    pub fn print_file(&self, file: &File) -> String {
        let mut out = String::new();
        self.print_block(&file.decls, &file.trailing_comments, 0, None, &mut out);
        out
    }

    pub fn print_expr(&self, expr: &Expr) -> String {
        self.expr(expr, 0)
    }

    fn print_block(
        &self,
        decls: &[Decl],
        trailing: &[Comment],
        level: usize,
        separator: Option<&str>,
        out: &mut String,
    ) {
        let lines: Vec<Line> = decls.iter().map(|d| self.decl_line(d, level)).collect();
        self.write_block(decls, &lines, trailing, level, separator, out);
    }

    fn write_block(
        &self,
        decls: &[Decl],
        lines: &[Line],
        trailing: &[Comment],
        level: usize,
        separator: Option<&str>,
        out: &mut String,
    ) {
        let indent = self.indent(level);
        let widths = alignment(decls, lines);
        let mut first = true;

        for ((decl, line), width) in decls.iter().zip(lines).zip(widths) {
            for comment in &decl.comments.leading {
                if comment.blank_before && !first {
                    out.push('\n');
                }
                out.push_str(&indent);
                out.push_str(&comment.text);
                out.push('\n');
                first = false;
            }
            if decl.blank_before && !first {
                out.push('\n');
            }
            first = false;

            out.push_str(&indent);
            if let Some(head) = &line.head {
                out.push_str(head);
                let padding = width.saturating_sub(head.chars().count()) + 1;
                out.push_str(&" ".repeat(padding));
            }
            out.push_str(&line.body);
            if let Some(separator) = separator {
                out.push_str(separator);
            }
            push_inline_comments(out, &decl.comments.trailing);
            out.push('\n');
        }

        for comment in trailing {
            if comment.blank_before && !first {
                out.push('\n');
            }
            out.push_str(&indent);
            out.push_str(&comment.text);
            out.push('\n');
            first = false;
        }
    }

    fn decl_line(&self, decl: &Decl, level: usize) -> Line {
        match &decl.kind {
            DeclKind::Package(name) => Line::body(format!("package {name}")),
            DeclKind::Import(import) => Line::body(self.import(import, level)),
            DeclKind::Field(field) => {
                let alias = match &field.alias {
                    Some(alias) => format!("{alias}="),
                    None => String::new(),
                };
                let marker = match field.marker {
                    Some(FieldMarker::Optional) => "?",
                    Some(FieldMarker::Required) => "!",
                    None => "",
                };
                let mut value = match &field.value {
                    Expr::Struct(s) if s.is_shorthand() => self.decl_line(&s.elems[0], level).inline(),
                    other => self.expr(other, level),
                };
                for attr in &field.attrs {
                    value.push(' ');
                    value.push_str(attr);
                }
                Line {
                    head: Some(format!(
                        "{}{}{}:",
                        alias,
                        self.label(&field.label, level),
                        marker
                    )),
                    body: value,
                }
            }
            DeclKind::Embed(expr) => Line::body(self.expr(expr, level)),
            DeclKind::Comprehension(comprehension) => {
                Line::body(self.comprehension(comprehension, level))
            }
            DeclKind::Let(binding) => Line::body(format!(
                "let {} = {}",
                binding.name,
                self.expr(&binding.value, level)
            )),
            DeclKind::Ellipsis(None) => Line::body("...".to_string()),
            DeclKind::Ellipsis(Some(constraint)) => {
                Line::body(format!("...{}", self.expr(constraint, level)))
            }
            DeclKind::Attribute(raw) => Line::body(raw.clone()),
        }
    }

    fn import(&self, import: &ImportDecl, level: usize) -> String {
        let spec = |s: &ImportSpec| match &s.name {
            Some(name) => format!("{} {}", name, s.path),
            None => s.path.clone(),
        };

        if !import.grouped && import.specs.len() == 1 {
            return format!("import {}", spec(&import.specs[0]));
        }

        let mut out = String::from("import (\n");
        for s in &import.specs {
            out.push_str(&self.indent(level + 1));
            out.push_str(&spec(s));
            out.push('\n');
        }
        out.push_str(&self.indent(level));
        out.push(')');
        out
    }

    fn label(&self, label: &Label, level: usize) -> String {
        match label {
            Label::Ident(name) => name.clone(),
            Label::String(raw) => raw.clone(),
            Label::Paren(expr) => format!("({})", self.expr(expr, level)),
            Label::Pattern(expr) => format!("[{}]", self.expr(expr, level)),
        }
    }

    /// Clauses share a line unless a comment ends one; the next clause then
    /// starts on a new line at the same indentation.
    fn comprehension(&self, comprehension: &Comprehension, level: usize) -> String {
        let mut out = String::new();
        for clause in &comprehension.clauses {
            out.push_str(&self.clause(clause, level));
            let comments = clause.comments();
            if comments.is_empty() {
                out.push(' ');
                continue;
            }
            for comment in comments {
                if comment.own_line {
                    out.push('\n');
                    out.push_str(&self.indent(level));
                } else {
                    out.push(' ');
                }
                out.push_str(&comment.text);
            }
            out.push('\n');
            out.push_str(&self.indent(level));
        }
        out.push_str(&self.struct_lit(&comprehension.body, level));
        out
    }

    fn clause(&self, clause: &Clause, level: usize) -> String {
        match clause {
            Clause::For(f) => match &f.key {
                Some(key) => format!(
                    "for {}, {} in {}",
                    key,
                    f.value,
                    self.expr(&f.source, level)
                ),
                None => format!("for {} in {}", f.value, self.expr(&f.source, level)),
            },
            Clause::If(guard) => format!("if {}", self.expr(&guard.condition, level)),
            Clause::Let(binding) => {
                format!("let {} = {}", binding.name, self.expr(&binding.value, level))
            }
        }
    }

    fn expr(&self, expr: &Expr, level: usize) -> String {
        match expr {
            Expr::Ident(name) => name.clone(),
            Expr::BasicLit(lit) => lit.value.clone(),
            Expr::Bottom => "_|_".to_string(),
            Expr::Selector { object, field } => format!("{}.{}", self.expr(object, level), field),
            Expr::Index { object, key } => format!(
                "{}[{}]",
                self.expr(object, level),
                self.expr(key, level)
            ),
            Expr::Call { func, args } => {
                let args: Vec<String> = args.iter().map(|a| self.expr(a, level)).collect();
                format!("{}({})", self.expr(func, level), args.join(", "))
            }
            Expr::Unary { op, operand } => format!("{}{}", op.symbol(), self.expr(operand, level)),
            Expr::Binary { op, left, right } => format!(
                "{} {} {}",
                self.expr(left, level),
                op.symbol(),
                self.expr(right, level)
            ),
            Expr::Paren(inner) => format!("({})", self.expr(inner, level)),
            Expr::Struct(s) => self.struct_lit(s, level),
            Expr::List(list) => self.list_lit(list, level),
        }
    }

    fn struct_lit(&self, s: &StructLit, level: usize) -> String {
        if s.elems.is_empty() && s.open_comments.is_empty() && s.trailing_comments.is_empty() {
            return "{}".to_string();
        }

        let lines: Vec<Line> = s.elems.iter().map(|d| self.decl_line(d, level + 1)).collect();
        if s.open_comments.is_empty()
            && fits_on_one_line(s.lbrace, s.rbrace, &s.elems, &lines, &s.trailing_comments)
        {
            let inline: Vec<String> = lines.iter().map(Line::inline).collect();
            return format!("{{{}}}", inline.join(", "));
        }

        let mut out = String::from("{");
        push_inline_comments(&mut out, &s.open_comments);
        out.push('\n');
        self.write_block(&s.elems, &lines, &s.trailing_comments, level + 1, None, &mut out);
        out.push_str(&self.indent(level));
        out.push('}');
        out
    }

    fn list_lit(&self, list: &ListLit, level: usize) -> String {
        if list.elems.is_empty() && list.open_comments.is_empty() && list.trailing_comments.is_empty()
        {
            return "[]".to_string();
        }

        let lines: Vec<Line> = list
            .elems
            .iter()
            .map(|d| self.decl_line(d, level + 1))
            .collect();
        if list.open_comments.is_empty()
            && fits_on_one_line(
                list.lbracket,
                list.rbracket,
                &list.elems,
                &lines,
                &list.trailing_comments,
            )
        {
            let inline: Vec<String> = lines.iter().map(Line::inline).collect();
            return format!("[{}]", inline.join(", "));
        }

        let mut out = String::from("[");
        push_inline_comments(&mut out, &list.open_comments);
        out.push('\n');
        self.write_block(
            &list.elems,
            &lines,
            &list.trailing_comments,
            level + 1,
            Some(","),
            &mut out,
        );
        out.push_str(&self.indent(level));
        out.push(']');
        out
    }

    fn indent(&self, level: usize) -> String {
        "\t".repeat(level)
    }
}

/// Appends end-of-line comments after what is already on the line.
fn push_inline_comments(out: &mut String, comments: &[Comment]) {
    for comment in comments {
        out.push(' ');
        out.push_str(&comment.text);
    }
}

fn fits_on_one_line(
    open: Option<Position>,
    close: Option<Position>,
    decls: &[Decl],
    lines: &[Line],
    trailing: &[Comment],
) -> bool {
    let same_line = matches!((open, close), (Some(o), Some(c)) if o.line == c.line);
    same_line
        && trailing.is_empty()
        && decls.iter().all(|d| d.comments.is_empty())
        && lines.iter().all(|l| !l.body.contains('\n'))
}

/// Width of the label column for every declaration of a block, 0 where
/// the declaration is not part of an aligned run.
fn alignment(decls: &[Decl], lines: &[Line]) -> Vec<usize> {
    let alignable = |i: usize| lines[i].head.is_some() && !lines[i].body.contains('\n');
    let mut widths = vec![0; decls.len()];

    let mut start = 0;
    while start < decls.len() {
        if !alignable(start) {
            start += 1;
            continue;
        }

        let mut end = start + 1;
        while end < decls.len()
            && alignable(end)
            && decls[end].comments.leading.is_empty()
            && !decls[end].blank_before
        {
            end += 1;
        }

        if end - start > 1 {
            let width = lines[start..end]
                .iter()
                .filter_map(|l| l.head.as_ref())
                .map(|h| h.chars().count())
                .max()
                .unwrap_or(0);
            widths[start..end].fill(width);
        }
        start = end;
    }
    widths
}

// Convenience functions

/// Prints a file in canonical layout.
pub fn format_file(file: &File) -> String {
    Printer::new().print_file(file)
}

/// Prints a single expression on its own, at the outermost indentation level.
pub fn format_expr(expr: &Expr) -> String {
    Printer::new().print_expr(expr)
}
