//! Scalar operators used by in-place node arithmetic
//!
//! Semantics follow the usual dynamic-language conventions:
//! - `/` is true division and always yields a float
//! - `//` floors, `%` takes the sign of the divisor
//! - `**` stays integral for a non-negative integer exponent
//! - `+` concatenates strings, bytes and lists; `*` repeats them

use super::errors::{ValueError, ValueResult};
use super::Value;

/// Binary operators available for in-place updates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Rem,
    Pow,
}

impl BinaryOp {
    /// Operator symbol as written in source
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

#[derive(Clone, Copy)]
enum Num {
    I(i64),
    F(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Int(n) => Some(Num::I(*n)),
            Value::Float(f) => Some(Num::F(*f)),
            _ => None,
        }
    }

    fn float(self) -> f64 {
        match self {
            Num::I(n) => n as f64,
            Num::F(f) => f,
        }
    }
}

impl Value {
    /// Applies `self <op> rhs`, returning the new value
    pub fn apply(&self, op: BinaryOp, rhs: &Value) -> ValueResult<Value> {
        if let (Some(a), Some(b)) = (Num::of(self), Num::of(rhs)) {
            return numeric(op, a, b);
        }

        match (op, self, rhs) {
            (BinaryOp::Add, Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (BinaryOp::Add, Value::Bytes(a), Value::Bytes(b)) => {
                Ok(Value::Bytes([a.as_slice(), b.as_slice()].concat()))
            }
            (BinaryOp::Add, Value::List(a), Value::List(b)) => {
                Ok(Value::List(a.iter().chain(b.iter()).cloned().collect()))
            }
            (BinaryOp::Mul, Value::Str(s), Value::Int(n))
            | (BinaryOp::Mul, Value::Int(n), Value::Str(s)) => {
                let count = repeat_count(op, s.len(), *n)?;
                Ok(Value::Str(s.repeat(count)))
            }
            (BinaryOp::Mul, Value::Bytes(b), Value::Int(n))
            | (BinaryOp::Mul, Value::Int(n), Value::Bytes(b)) => {
                let count = repeat_count(op, b.len(), *n)?;
                Ok(Value::Bytes(b.repeat(count)))
            }
            (BinaryOp::Mul, Value::List(items), Value::Int(n))
            | (BinaryOp::Mul, Value::Int(n), Value::List(items)) => {
                let count = repeat_count(op, items.len(), *n)?;
                if items.is_empty() {
                    return Ok(Value::List(Vec::new()));
                }
                let mut out = Vec::with_capacity(items.len() * count);
                for _ in 0..count {
                    out.extend(items.iter().cloned());
                }
                Ok(Value::List(out))
            }
            _ => Err(ValueError::TypeMismatch {
                op: op.symbol(),
                lhs: self.type_name(),
                rhs: rhs.type_name(),
            }),
        }
    }
}

/// Repeat count for a sequence of `unit_len` elements; negative counts give
/// an empty result, and a total length past `isize::MAX` is an overflow.
fn repeat_count(op: BinaryOp, unit_len: usize, n: i64) -> ValueResult<usize> {
    let count = usize::try_from(n).unwrap_or(0);
    match unit_len.checked_mul(count) {
        Some(total) if total <= isize::MAX as usize => Ok(count),
        _ => Err(ValueError::Overflow { op: op.symbol() }),
    }
}

fn numeric(op: BinaryOp, a: Num, b: Num) -> ValueResult<Value> {
    let overflow = || ValueError::Overflow { op: op.symbol() };

    if let (Num::I(x), Num::I(y)) = (a, b) {
        let result = match op {
            BinaryOp::Add => x.checked_add(y).ok_or_else(overflow)?,
            BinaryOp::Sub => x.checked_sub(y).ok_or_else(overflow)?,
            BinaryOp::Mul => x.checked_mul(y).ok_or_else(overflow)?,
            BinaryOp::Div => {
                if y == 0 {
                    return Err(ValueError::DivisionByZero);
                }
                return Ok(Value::Float(x as f64 / y as f64));
            }
            BinaryOp::FloorDiv => {
                if y == 0 {
                    return Err(ValueError::DivisionByZero);
                }
                let q = x.checked_div(y).ok_or_else(overflow)?;
                if x % y != 0 && ((x < 0) != (y < 0)) {
                    q - 1
                } else {
                    q
                }
            }
            BinaryOp::Rem => {
                if y == 0 {
                    return Err(ValueError::DivisionByZero);
                }
                let r = x.checked_rem(y).ok_or_else(overflow)?;
                if r != 0 && ((r < 0) != (y < 0)) {
                    r + y
                } else {
                    r
                }
            }
            BinaryOp::Pow => {
                if y < 0 {
                    if x == 0 {
                        return Err(ValueError::DivisionByZero);
                    }
                    return Ok(Value::Float((x as f64).powf(y as f64)));
                }
                let exp = u32::try_from(y).map_err(|_| overflow())?;
                x.checked_pow(exp).ok_or_else(overflow)?
            }
        };
        return Ok(Value::Int(result));
    }

    let (x, y) = (a.float(), b.float());
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div => {
            if y == 0.0 {
                return Err(ValueError::DivisionByZero);
            }
            x / y
        }
        BinaryOp::FloorDiv => {
            if y == 0.0 {
                return Err(ValueError::DivisionByZero);
            }
            (x / y).floor()
        }
        BinaryOp::Rem => {
            if y == 0.0 {
                return Err(ValueError::DivisionByZero);
            }
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        }
        BinaryOp::Pow => {
            if x == 0.0 && y < 0.0 {
                return Err(ValueError::DivisionByZero);
            }
            x.powf(y)
        }
    };
    Ok(Value::Float(result))
}
