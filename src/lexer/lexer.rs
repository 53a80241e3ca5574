use log::{debug, trace};

use crate::error::LexError;

use super::{
    token::{KEYWORDS, ONE_SYMBOL_TOKENS, TWO_SYMBOLS_TOKENS},
    Token, TokenKind,
};

#[derive(Debug)]
pub struct Lexer {
    chars: Vec<char>,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    index: usize,
    line: usize,
}

impl Lexer {
    fn new(s: &str) -> Self {
        Self {
            chars: s.chars().collect(),
            tokens: vec![],
            errors: vec![],
            index: 0,
            line: 1,
        }
    }

    fn new_token(&mut self, kind: TokenKind, lexeme: String) {
        self.index += lexeme.chars().count();
        trace!("line {}: {:?}", self.line, kind);
        self.tokens.push(Token {
            kind,
            lexeme,
            line: self.line,
        });
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.index + offset).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        s.chars().enumerate().all(|(i, c)| self.peek(i) == Some(c))
    }

    /// Skips a `/* ... */` comment. Returns false, consuming nothing, when the
    /// comment is never closed; the `/` is then scanned as an operator.
    fn skip_block_comment(&mut self) -> bool {
        let mut end = self.index + 2;
        while end + 1 < self.chars.len() {
            if self.chars[end] == '*' && self.chars[end + 1] == '/' {
                let newlines = self.chars[self.index..end]
                    .iter()
                    .filter(|&&c| c == '\n')
                    .count();
                self.line += newlines;
                self.index = end + 2;
                return true;
            }
            end += 1;
        }
        false
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if c == '\n' {
                break;
            }
            self.index += 1;
        }
    }

    fn parse_string(&mut self) {
        let mut end = self.index + 1;
        loop {
            match self.chars.get(end) {
                Some('"') => break,
                Some('\\') if !matches!(self.chars.get(end + 1), None | Some('\n')) => end += 2,
                Some(c) if *c != '\n' && *c != '\\' => end += 1,
                _ => {
                    // No closing quote on this line: the `"` alone is illegal.
                    self.errors.push(LexError::IllegalCharacter {
                        character: '"',
                        line: self.line,
                    });
                    self.index += 1;
                    return;
                }
            }
        }

        let value: String = self.chars[self.index + 1..end].iter().collect();
        let lexeme = format!("\"{}\"", value);
        self.new_token(TokenKind::Str(value), lexeme);
    }

    fn parse_number(&mut self) {
        let rest = &self.chars[self.index..];
        let mut len = rest.iter().take_while(|c| c.is_ascii_digit()).count();
        let is_float = rest.get(len) == Some(&'.')
            && rest.get(len + 1).is_some_and(|c| c.is_ascii_digit());
        if is_float {
            len += 1 + rest[len + 1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .count();
        }
        let s: String = rest[..len].iter().collect();

        let kind = if is_float {
            s.parse::<f64>()
                .ok()
                .filter(|x| x.is_finite())
                .map(TokenKind::FloatNum)
        } else {
            s.parse().ok().map(TokenKind::Num)
        };
        match kind {
            Some(kind) => self.new_token(kind, s),
            None => {
                self.errors.push(LexError::NumberOutOfRange {
                    lexeme: s,
                    line: self.line,
                });
                self.index += len;
            }
        }
    }

    fn parse_identifier(&mut self) {
        let s: String = self.chars[self.index..]
            .iter()
            .take_while(|&&c| c.is_ascii_alphanumeric() || c == '_')
            .collect();

        if let Some(kind) = KEYWORDS.get(s.as_str()) {
            self.new_token(kind.clone(), s);
        } else {
            self.new_token(TokenKind::Ident(s.clone()), s);
        }
    }

    fn _tokenize(&mut self) {
        while let Some(c) = self.peek(0) {
            let c2: String = self.chars[self.index..].iter().take(2).collect();

            if c == ' ' || c == '\t' || c == '\r' {
                self.index += 1;
            } else if c == '\n' {
                self.line += 1;
                self.index += 1;
            } else if self.starts_with("/*") && self.skip_block_comment() {
                continue;
            } else if self.starts_with("//") {
                self.skip_line_comment();
            } else if c == '"' {
                self.parse_string();
            } else if c.is_ascii_digit() {
                self.parse_number();
            } else if c.is_ascii_alphabetic() || c == '_' {
                self.parse_identifier();
            } else if let Some(kind) = TWO_SYMBOLS_TOKENS.get(c2.as_str()) {
                self.new_token(kind.clone(), c2);
            } else if let Some(kind) = ONE_SYMBOL_TOKENS.get(&c) {
                self.new_token(kind.clone(), c.to_string());
            } else {
                self.errors.push(LexError::IllegalCharacter {
                    character: c,
                    line: self.line,
                });
                self.index += 1;
            }
        }
    }

    /// Scans the whole source. Never stops early: every lexical problem is
    /// recorded and the scan continues after it.
    pub fn tokenize(s: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(s);
        lexer._tokenize();
        debug!(
            "scanned {} tokens, {} lexical errors",
            lexer.tokens.len(),
            lexer.errors.len()
        );

        (lexer.tokens, lexer.errors)
    }
}
