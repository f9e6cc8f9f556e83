use crate::ast::Expr;
use std::fmt;

/// A segment in a normalized access path.
///
/// Dotted and bracketed spellings of the same field produce the same
/// segment, which is what makes guard matching independent of syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Regular field
    ///
    /// # Examples
    /// - `parameter.name` → `Field("name")`
    /// - `parameter["name"]` → `Field("name")`
    /// - `parameter["my-key"]` → `Field("my-key")`
    Field(String),

    /// Definition or hidden field
    ///
    /// # Examples
    /// - `x.#Config` → `Definition("#Config")`
    /// - `x._cache` → `Definition("_cache")`
    ///
    /// # Note
    /// A string index always names a regular field, so `x["#Config"]` is a
    /// `Field` and never matches `x.#Config`.
    Definition(String),
}

/// A root identifier followed by the fields selected from it.
///
/// # Examples
///
/// For `parameter.labels["app"]`:
/// - root: `parameter`
/// - segments: `Field("labels")`, `Field("app")`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPath {
    pub root: String,
    pub segments: Vec<PathSegment>,
}

impl AccessPath {
    pub fn is_rooted_at(&self, name: &str) -> bool {
        self.root == name
    }
}

impl fmt::Display for AccessPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) if is_plain_identifier(name) => write!(f, ".{name}")?,
                PathSegment::Field(name) => match serde_json::to_string(name) {
                    Ok(quoted) => write!(f, "[{quoted}]")?,
                    Err(_) => write!(f, "[{name:?}]")?,
                },
                PathSegment::Definition(name) => write!(f, ".{name}")?,
            }
        }
        Ok(())
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Normalize an access expression into its root and field segments
///
/// Only identifiers, selectors and index expressions with a plain string key
/// form paths; anything else (calls, arithmetic, interpolated or numeric
/// keys, parentheses) yields `None`.
///
/// # Examples
/// ```
/// // parameter.p → root "parameter", [Field("p")]
/// // parameter["p"].q → root "parameter", [Field("p"), Field("q")]
/// // parameter[0] → None
/// ```
pub fn extract_path(expr: &Expr) -> Option<AccessPath> {
    let mut segments = Vec::new();
    let root = extract_path_recursive(expr, &mut segments)?;
    Some(AccessPath { root, segments })
}

fn extract_path_recursive(expr: &Expr, segments: &mut Vec<PathSegment>) -> Option<String> {
    match expr {
        Expr::Ident(name) => Some(name.clone()),

        Expr::Selector { object, field } => {
            // Object first, so segments come out left to right
            let root = extract_path_recursive(object, segments)?;
            if field.starts_with('#') || field.starts_with('_') {
                segments.push(PathSegment::Definition(field.clone()));
            } else {
                segments.push(PathSegment::Field(field.clone()));
            }
            Some(root)
        }

        Expr::Index { object, key } => {
            let root = extract_path_recursive(object, segments)?;
            let Expr::BasicLit(lit) = key.as_ref() else {
                return None;
            };
            segments.push(PathSegment::Field(lit.string_value()?));
            Some(root)
        }

        _ => None,
    }
}

/// Whether two expressions denote the same access path.
pub fn equivalent(a: &Expr, b: &Expr) -> bool {
    match (extract_path(a), extract_path(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
