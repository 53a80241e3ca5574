use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq)]
pub enum LexError {
    #[error("Illegal character '{character}' at line {line}")]
    IllegalCharacter { character: char, line: usize },

    #[error("Number '{lexeme}' out of range at line {line}")]
    NumberOutOfRange { lexeme: String, line: usize },
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SyntaxError {
    #[error("Syntax error at '{value}' (line {line})")]
    UnexpectedToken { value: String, line: usize },

    #[error("Syntax error at '{value}' (line {line}): nesting deeper than {limit} levels")]
    NestingTooDeep {
        value: String,
        line: usize,
        limit: usize,
    },

    #[error("Syntax error at EOF — likely causes: missing semicolon, missing closing bracket, or missing parenthesis")]
    UnexpectedEof,
}

#[derive(Error, Clone, Debug, PartialEq)]
pub enum SemanticError {
    #[error("Redeclaration error: '{name}' already declared in {scope}")]
    Redeclaration { name: String, scope: String },

    #[error("Undeclared variable '{name}'")]
    Undeclared { name: String },
}

/// Anything the parser reports. Both kinds share one ordered list while
/// parsing and are split into their own channels afterwards.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let e = LexError::IllegalCharacter {
            character: '@',
            line: 3,
        };
        assert_eq!(e.to_string(), "Illegal character '@' at line 3");

        let e: ParseError = SemanticError::Redeclaration {
            name: "x".into(),
            scope: "global".into(),
        }
        .into();
        assert!(matches!(e, ParseError::Semantic(_)));
        assert_eq!(
            e.to_string(),
            "Redeclaration error: 'x' already declared in global"
        );

        let e: ParseError = SyntaxError::UnexpectedToken {
            value: "}".into(),
            line: 7,
        }
        .into();
        assert!(matches!(e, ParseError::Syntax(_)));
        assert_eq!(e.to_string(), "Syntax error at '}' (line 7)");

        let e = SyntaxError::NestingTooDeep {
            value: "(".into(),
            line: 2,
            limit: 256,
        };
        assert_eq!(
            e.to_string(),
            "Syntax error at '(' (line 2): nesting deeper than 256 levels"
        );
    }
}
