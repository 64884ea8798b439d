//! # Value Errors
//!
//! Failures raised by scalar operators, container edits and the literal
//! text reader.

use thiserror::Error;

/// Result type for value operations
pub type ValueResult<T> = Result<T, ValueError>;

/// Errors produced while operating on document values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    // ==================
    // Operator Errors
    // ==================
    /// Operator is not defined for the operand types
    #[error("unsupported operand types for {op}: '{lhs}' and '{rhs}'")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("integer overflow in {op}")]
    Overflow { op: &'static str },

    // ==================
    // Container Errors
    // ==================
    /// A leaf value was used where a mapping or sequence is required
    #[error("'{type_name}' value has no children")]
    NotAContainer { type_name: &'static str },

    /// Sequence key is not a valid index
    #[error("index '{key}' out of range for sequence of length {len}")]
    IndexOutOfRange { key: String, len: usize },

    // ==================
    // Literal Syntax Errors
    // ==================
    /// Text is not a valid literal document
    #[error("literal syntax error at offset {position}: {message}")]
    Syntax { position: usize, message: String },
}

impl ValueError {
    /// Create a syntax error at the given byte offset
    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        ValueError::Syntax {
            position,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = ValueError::TypeMismatch {
            op: "+",
            lhs: "int",
            rhs: "str",
        };
        assert_eq!(
            err.to_string(),
            "unsupported operand types for +: 'int' and 'str'"
        );
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = ValueError::syntax(12, "unexpected character");
        let display = err.to_string();
        assert!(display.contains("12"));
        assert!(display.contains("unexpected character"));
    }
}
