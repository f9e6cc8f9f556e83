/// A single `//` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment text including the leading `//`, without the line break
    pub text: String,

    /// A blank line separates this comment from whatever came before it
    pub blank_before: bool,

    /// The comment starts on a line of its own rather than after a token
    pub own_line: bool,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment {
            text: text.into(),
            blank_before: false,
            own_line: true,
        }
    }
}

/// Comments owned by one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comments {
    /// Comments on the lines directly above the declaration
    pub leading: Vec<Comment>,

    /// Comments after the declaration on its last line
    pub trailing: Vec<Comment>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}
