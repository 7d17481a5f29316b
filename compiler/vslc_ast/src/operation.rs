// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt;

/// Payload tag marking an expression node as a function call.
pub const CALL_TAG: &str = "F";

/// Payload of a unary minus expression.
pub const NEGATE_TAG: &str = "-";

/// Binary operators an expression payload can carry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AstOp {
    Add,      // +
    Subtract, // -
    Multiply, // *
    Divide,   // /

    // relational operators
    LThan, // <
    GThan, // >
    LtEq,  // <=
    GtEq,  // >=
    EqEq,  // ==
    NEq,   // !=
}

impl AstOp {
    /// Decodes an operator payload. The first character selects the
    /// operator family, the second tells `<=`/`>=` apart from `<`/`>`.
    pub fn from_symbol(symbol: &str) -> Option<AstOp> {
        let bytes = symbol.as_bytes();
        let second = bytes.get(1).copied();
        if bytes.len() > 2 {
            return None;
        }
        match (bytes.first().copied()?, second) {
            (b'+', None) => Some(AstOp::Add),
            (b'-', None) => Some(AstOp::Subtract),
            (b'*', None) => Some(AstOp::Multiply),
            (b'/', None) => Some(AstOp::Divide),
            (b'<', None) => Some(AstOp::LThan),
            (b'<', Some(b'=')) => Some(AstOp::LtEq),
            (b'>', None) => Some(AstOp::GThan),
            (b'>', Some(b'=')) => Some(AstOp::GtEq),
            (b'=', Some(b'=')) => Some(AstOp::EqEq),
            (b'!', Some(b'=')) => Some(AstOp::NEq),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AstOp::Add => "+",
            AstOp::Subtract => "-",
            AstOp::Multiply => "*",
            AstOp::Divide => "/",
            AstOp::LThan => "<",
            AstOp::GThan => ">",
            AstOp::LtEq => "<=",
            AstOp::GtEq => ">=",
            AstOp::EqEq => "==",
            AstOp::NEq => "!=",
        }
    }

    pub fn is_relational(&self) -> bool {
        !matches!(
            self,
            AstOp::Add | AstOp::Subtract | AstOp::Multiply | AstOp::Divide
        )
    }

    /// Evaluates the operator over two constants the way the target
    /// machine would. Comparisons produce 0 or 1. Returns `None` for
    /// divisions that would fault at runtime, which must stay unevaluated.
    pub fn evaluate(&self, lhs: i32, rhs: i32) -> Option<i32> {
        let value = match self {
            AstOp::Add => lhs.wrapping_add(rhs),
            AstOp::Subtract => lhs.wrapping_sub(rhs),
            AstOp::Multiply => lhs.wrapping_mul(rhs),
            AstOp::Divide => lhs.checked_div(rhs)?,
            AstOp::LThan => (lhs < rhs) as i32,
            AstOp::GThan => (lhs > rhs) as i32,
            AstOp::LtEq => (lhs <= rhs) as i32,
            AstOp::GtEq => (lhs >= rhs) as i32,
            AstOp::EqEq => (lhs == rhs) as i32,
            AstOp::NEq => (lhs != rhs) as i32,
        };
        Some(value)
    }
}

impl fmt::Display for AstOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_OPS: [AstOp; 10] = [
        AstOp::Add,
        AstOp::Subtract,
        AstOp::Multiply,
        AstOp::Divide,
        AstOp::LThan,
        AstOp::GThan,
        AstOp::LtEq,
        AstOp::GtEq,
        AstOp::EqEq,
        AstOp::NEq,
    ];

    #[test]
    fn test_symbols_decode() {
        for op in ALL_OPS {
            assert_eq!(AstOp::from_symbol(op.symbol()), Some(op));
        }
    }

    #[test]
    fn test_unknown_symbols_rejected() {
        for bad in ["", "%", "=", "!", "<<", "+=", "<=>", CALL_TAG] {
            assert_eq!(AstOp::from_symbol(bad), None, "{bad:?} should not decode");
        }
    }

    #[test]
    fn test_comparisons_are_zero_or_one() {
        let samples = [(-3, 7), (7, -3), (5, 5), (0, 0), (i32::MIN, i32::MAX)];
        for op in ALL_OPS.into_iter().filter(AstOp::is_relational) {
            for (a, b) in samples {
                let v = op.evaluate(a, b).unwrap();
                assert!(v == 0 || v == 1, "{a} {op} {b} gave {v}");
            }
        }
        assert_eq!(AstOp::LtEq.evaluate(5, 5), Some(1));
        assert_eq!(AstOp::NEq.evaluate(5, 5), Some(0));
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        assert_eq!(AstOp::Divide.evaluate(7, 2), Some(3));
        assert_eq!(AstOp::Divide.evaluate(-7, 2), Some(-3));
        assert_eq!(AstOp::Divide.evaluate(7, -2), Some(-3));
    }

    #[test]
    fn test_faulting_division_is_not_evaluated() {
        assert_eq!(AstOp::Divide.evaluate(1, 0), None);
        assert_eq!(AstOp::Divide.evaluate(i32::MIN, -1), None);
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(AstOp::Add.evaluate(i32::MAX, 1), Some(i32::MIN));
        assert_eq!(AstOp::Multiply.evaluate(-6, 7), Some(-42));
    }
}
