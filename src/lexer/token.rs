use std::fmt;

use phf::phf_map;

pub static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "int" => TokenKind::Int,
    "float" => TokenKind::Float,
    "if" => TokenKind::If,
    "else" => TokenKind::Else,
    "while" => TokenKind::While,
    "print" => TokenKind::Print,
    "auto" => TokenKind::Auto,
    "break" => TokenKind::Break,
    "case" => TokenKind::Case,
    "char" => TokenKind::Char,
    "const" => TokenKind::Const,
    "continue" => TokenKind::Continue,
    "default" => TokenKind::Default,
    "do" => TokenKind::Do,
    "double" => TokenKind::Double,
    "enum" => TokenKind::Enum,
    "extern" => TokenKind::Extern,
    "for" => TokenKind::For,
    "goto" => TokenKind::Goto,
    "long" => TokenKind::Long,
    "register" => TokenKind::Register,
    "return" => TokenKind::Return,
    "short" => TokenKind::Short,
    "signed" => TokenKind::Signed,
    "sizeof" => TokenKind::Sizeof,
    "static" => TokenKind::Static,
    "struct" => TokenKind::Struct,
    "switch" => TokenKind::Switch,
    "typedef" => TokenKind::Typedef,
    "union" => TokenKind::Union,
    "unsigned" => TokenKind::Unsigned,
    "void" => TokenKind::Void,
    "volatile" => TokenKind::Volatile,
};

pub static TWO_SYMBOLS_TOKENS: phf::Map<&str, TokenKind> = phf_map! {
    "<=" => TokenKind::LessEqual,
    ">=" => TokenKind::GreaterEqual,
    "==" => TokenKind::DoubleEqual,
    "!=" => TokenKind::NotEqual,
};

pub static ONE_SYMBOL_TOKENS: phf::Map<char, TokenKind> = phf_map! {
    '+' => TokenKind::Plus,
    '-' => TokenKind::Minus,
    '*' => TokenKind::Star,
    '/' => TokenKind::Slash,
    '%' => TokenKind::Percent,
    '=' => TokenKind::Equal,
    '<' => TokenKind::LessThan,
    '>' => TokenKind::GreaterThan,
    '(' => TokenKind::OpenParen,
    ')' => TokenKind::CloseParen,
    '{' => TokenKind::OpenCurlyBrace,
    '}' => TokenKind::CloseCurlyBrace,
    '[' => TokenKind::OpenSquareBrace,
    ']' => TokenKind::CloseSquareBrace,
    ';' => TokenKind::SemiColon,
    ',' => TokenKind::Comma,
};

#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Num(i64),
    FloatNum(f64),
    Str(String),

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Equal,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    DoubleEqual,
    NotEqual,

    // Punctuation
    OpenParen,
    CloseParen,
    OpenCurlyBrace,
    CloseCurlyBrace,
    OpenSquareBrace,
    CloseSquareBrace,
    SemiColon,
    Comma,

    // Keywords accepted by the grammar
    Int,
    Float,
    If,
    Else,
    While,
    Print,

    // Reserved, rejected by the grammar
    Auto,
    Break,
    Case,
    Char,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Enum,
    Extern,
    For,
    Goto,
    Long,
    Register,
    Return,
    Short,
    Signed,
    Sizeof,
    Static,
    Struct,
    Switch,
    Typedef,
    Union,
    Unsigned,
    Void,
    Volatile,
}

/// Coarse grouping of token kinds used by the token listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenCategory {
    Keyword,
    Identifier,
    Constant,
    Literal,
    Operator,
    Parenthesis,
    Punctuation,
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenCategory::Keyword => "Keyword",
            TokenCategory::Identifier => "Identifier",
            TokenCategory::Constant => "Constant",
            TokenCategory::Literal => "Literal",
            TokenCategory::Operator => "Operator",
            TokenCategory::Parenthesis => "Parenthesis",
            TokenCategory::Punctuation => "Punctuation",
        };
        // pad() keeps width specifiers like {:<12} working
        f.pad(s)
    }
}

impl TokenKind {
    pub fn category(&self) -> TokenCategory {
        match self {
            TokenKind::Ident(_) => TokenCategory::Identifier,
            TokenKind::Num(_) | TokenKind::FloatNum(_) => TokenCategory::Constant,
            TokenKind::Str(_) => TokenCategory::Literal,
            TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::Equal
            | TokenKind::LessThan
            | TokenKind::LessEqual
            | TokenKind::GreaterThan
            | TokenKind::GreaterEqual
            | TokenKind::DoubleEqual
            | TokenKind::NotEqual => TokenCategory::Operator,
            TokenKind::OpenParen
            | TokenKind::CloseParen
            | TokenKind::OpenCurlyBrace
            | TokenKind::CloseCurlyBrace
            | TokenKind::OpenSquareBrace
            | TokenKind::CloseSquareBrace => TokenCategory::Parenthesis,
            TokenKind::SemiColon | TokenKind::Comma => TokenCategory::Punctuation,
            _ => TokenCategory::Keyword,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token. String literals keep their quotes here.
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    /// The token's value as shown to users: string literals without their
    /// quotes, everything else as written.
    pub fn value(&self) -> &str {
        match &self.kind {
            TokenKind::Str(s) => s,
            _ => &self.lexeme,
        }
    }
}
