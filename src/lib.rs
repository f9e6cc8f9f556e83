pub mod ast;
#[cfg(feature = "cli")]
pub mod cli;
pub mod fix;
pub mod lexer;
pub mod parser;
pub mod path;
pub mod printer;

pub use ast::{Clause, Decl, DeclKind, Expr, File, Token};
pub use fix::{FixConfig, FixReport, Fixer, Outcome, fix};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser, parse_file};
pub use path::{AccessPath, PathSegment, equivalent, extract_path};
pub use printer::{Printer, format_file};
