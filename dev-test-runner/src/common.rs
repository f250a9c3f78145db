use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub lexeme: String,
    pub line: u32,
}

impl Token {
    pub fn new(lexeme: impl Into<String>) -> Self {
        Self { lexeme: lexeme.into(), line: 1 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralType {
    Number(f64),
    Str(String),
    Bool(bool),
    Nil,
}

impl LiteralType {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LiteralType::Nil | LiteralType::Bool(false))
    }
}

impl fmt::Display for LiteralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralType::Number(n) => write!(f, "{n}"),
            LiteralType::Str(s) => write!(f, "{s}"),
            LiteralType::Bool(b) => write!(f, "{b}"),
            LiteralType::Nil => write!(f, "nil"),
        }
    }
}
