/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Lattice
    /// Disjunction (`|`)
    Disjunction,
    /// Unification (`&`)
    Unification,

    // Logical
    /// Logical OR (`||`)
    Or,
    /// Logical AND (`&&`)
    And,

    // Comparison
    /// Equal (`==`)
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Regular expression match (`=~`)
    Match,
    /// Regular expression non-match (`!~`)
    NotMatch,
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    GreaterThan,
    /// Greater than or equal (`>=`)
    GreaterEqual,

    // Arithmetic
    /// Addition or concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Subtract,
    /// Multiplication (`*`)
    Multiply,
    /// Division (`/`)
    Divide,
}

impl BinOp {
    /// Binding strength, from 1 (`|`) to 7 (`*`, `/`).
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Disjunction => 1,
            BinOp::Unification => 2,
            BinOp::Or => 3,
            BinOp::And => 4,
            BinOp::Equal
            | BinOp::NotEqual
            | BinOp::Match
            | BinOp::NotMatch
            | BinOp::LessThan
            | BinOp::LessEqual
            | BinOp::GreaterThan
            | BinOp::GreaterEqual => 5,
            BinOp::Add | BinOp::Subtract => 6,
            BinOp::Multiply | BinOp::Divide => 7,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Disjunction => "|",
            BinOp::Unification => "&",
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Equal => "==",
            BinOp::NotEqual => "!=",
            BinOp::Match => "=~",
            BinOp::NotMatch => "!~",
            BinOp::LessThan => "<",
            BinOp::LessEqual => "<=",
            BinOp::GreaterThan => ">",
            BinOp::GreaterEqual => ">=",
            BinOp::Add => "+",
            BinOp::Subtract => "-",
            BinOp::Multiply => "*",
            BinOp::Divide => "/",
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Default marker (`*`), preferred branch of a disjunction
    Default,
    /// Logical negation (`!`)
    Not,
    /// Numeric negation (`-`)
    Negate,
    /// Unary plus (`+`)
    Plus,
    /// Bound `<`
    LessThan,
    /// Bound `<=`
    LessEqual,
    /// Bound `>`
    GreaterThan,
    /// Bound `>=`
    GreaterEqual,
    /// Bound `=~`
    Match,
    /// Bound `!~`
    NotMatch,
    /// Bound `!=`
    NotEqual,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Default => "*",
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::LessThan => "<",
            UnaryOp::LessEqual => "<=",
            UnaryOp::GreaterThan => ">",
            UnaryOp::GreaterEqual => ">=",
            UnaryOp::Match => "=~",
            UnaryOp::NotMatch => "!~",
            UnaryOp::NotEqual => "!=",
        }
    }
}
