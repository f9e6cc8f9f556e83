use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Identifier, including definitions and hidden names
    ///
    /// # Examples
    /// ```text
    /// parameter
    /// #Config
    /// _hidden
    /// _
    /// ```
    Ident(String),

    /// Integer literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0x1F
    /// 1_000
    /// 2Ki
    /// ```
    Int(String),

    /// Floating point literal, kept as written
    ///
    /// # Examples
    /// ```text
    /// 3.14
    /// 1e10
    /// .5
    /// ```
    Float(String),

    /// String or bytes literal, kept as written including its quotes
    ///
    /// Interpolations stay inside the raw text.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "\(k)-suffix"
    /// 'bytes'
    /// """
    ///     multi-line
    ///     """
    /// ```
    String(String),

    /// Attribute, kept as written
    ///
    /// # Examples
    /// ```text
    /// @go(Name)
    /// @if(debug)
    /// ```
    Attribute(String),

    /// Bottom value `_|_`
    Bottom,

    /// Boolean literal
    Boolean(bool),

    /// Null literal
    Null,

    // Keywords
    /// `package`
    Package,
    /// `import`
    Import,
    /// `for`
    For,
    /// `in`
    In,
    /// `if`
    If,
    /// `let`
    Let,

    // Operators
    /// Disjunction `|`
    Pipe,
    /// Unification `&`
    Amp,
    /// Logical or `||`
    OrOr,
    /// Logical and `&&`
    AndAnd,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `=~`
    Match,
    /// `!~`
    NotMatch,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`, multiplication or the default marker
    Star,
    /// `/`
    Slash,
    /// `!`
    Exclamation,
    /// `?`, optional field marker
    Question,
    /// `=`, used by `let`
    Assign,

    // Delimiters
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `:`
    Colon,
    /// `,`
    Comma,
    /// `.`
    Dot,
    /// `...`
    Ellipsis,

    /// End of file
    Eof,
}

impl Token {
    /// Returns the spelling of a keyword token, so keywords can double as
    /// labels and selector names.
    pub fn keyword_name(&self) -> Option<&'static str> {
        match self {
            Token::Package => Some("package"),
            Token::Import => Some("import"),
            Token::For => Some("for"),
            Token::In => Some("in"),
            Token::If => Some("if"),
            Token::Let => Some("let"),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Token::Ident(name) => return write!(f, "identifier '{name}'"),
            Token::Int(raw) | Token::Float(raw) => return write!(f, "number {raw}"),
            Token::String(raw) => return write!(f, "string {raw}"),
            Token::Attribute(raw) => return write!(f, "attribute {raw}"),
            Token::Boolean(b) => return write!(f, "'{b}'"),
            Token::Bottom => "'_|_'",
            Token::Null => "'null'",
            Token::Package => "'package'",
            Token::Import => "'import'",
            Token::For => "'for'",
            Token::In => "'in'",
            Token::If => "'if'",
            Token::Let => "'let'",
            Token::Pipe => "'|'",
            Token::Amp => "'&'",
            Token::OrOr => "'||'",
            Token::AndAnd => "'&&'",
            Token::EqEq => "'=='",
            Token::NotEq => "'!='",
            Token::Match => "'=~'",
            Token::NotMatch => "'!~'",
            Token::Lt => "'<'",
            Token::LtEq => "'<='",
            Token::Gt => "'>'",
            Token::GtEq => "'>='",
            Token::Plus => "'+'",
            Token::Minus => "'-'",
            Token::Star => "'*'",
            Token::Slash => "'/'",
            Token::Exclamation => "'!'",
            Token::Question => "'?'",
            Token::Assign => "'='",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::Dot => "'.'",
            Token::Ellipsis => "'...'",
            Token::Eof => "end of file",
        };
        f.write_str(text)
    }
}
