//! Parametric formulas.
//!
//! Gear parameters can be given as formula strings (`"5 mm"`, `"20 deg"`,
//! `"2 * module"`) and every derived quantity has a formula over the named inputs.
//! An [`Expr`] prints as a plain formula string and evaluates against a set of
//! [`Bindings`]. Lengths evaluate to millimetres and angles to radians.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::float_types::{CM, DEG, INCH, LengthUnit, METER, MM, PI, Real};

mod inputs;
mod parser;
mod symbolic;

pub use inputs::{ParameterInputs, is_valid_name, next_available_name, validate_name};
pub use parser::parse;
pub use symbolic::{NamedFormula, ParameterTable, SymbolicRack, SymbolicSpurGear};

/// Why a formula could not be parsed or evaluated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("could not parse {input:?} at {rest:?}")]
    Parse { input: String, rest: String },
    #[error("unknown parameter {0:?}")]
    UnknownParameter(String),
    #[error("unknown function {0:?}")]
    UnknownFunction(String),
    #[error("{expr} does not evaluate to a finite number")]
    NonFinite { expr: String },
    #[error("{unit} is not a valid unit here, expected {expected}")]
    UnitMismatch {
        unit: &'static str,
        expected: &'static str,
    },
}

/// What a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Length,
    Angle,
}

impl UnitKind {
    /// Phrase for error messages; `None` is a plain number.
    pub const fn describe(kind: Option<Self>) -> &'static str {
        match kind {
            Some(UnitKind::Length) => "a length",
            Some(UnitKind::Angle) => "an angle",
            None => "a plain number",
        }
    }
}

/// Units a value can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Degree,
    Radian,
}

impl Unit {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "mm" => Unit::Millimeter,
            "cm" => Unit::Centimeter,
            "m" => Unit::Meter,
            "in" => Unit::Inch,
            "deg" => Unit::Degree,
            "rad" => Unit::Radian,
            _ => return None,
        })
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            Unit::Millimeter => "mm",
            Unit::Centimeter => "cm",
            Unit::Meter => "m",
            Unit::Inch => "in",
            Unit::Degree => "deg",
            Unit::Radian => "rad",
        }
    }

    pub const fn kind(self) -> UnitKind {
        match self {
            Unit::Millimeter | Unit::Centimeter | Unit::Meter | Unit::Inch => UnitKind::Length,
            Unit::Degree | Unit::Radian => UnitKind::Angle,
        }
    }

    /// Multiplier into the internal unit (millimetres or radians).
    pub const fn factor(self) -> Real {
        match self {
            Unit::Millimeter => MM,
            Unit::Centimeter => CM,
            Unit::Meter => METER,
            Unit::Inch => INCH,
            Unit::Degree => DEG,
            Unit::Radian => 1.0,
        }
    }
}

impl From<LengthUnit> for Unit {
    fn from(unit: LengthUnit) -> Self {
        match unit {
            LengthUnit::Millimeter => Unit::Millimeter,
            LengthUnit::Centimeter => Unit::Centimeter,
            LengthUnit::Meter => Unit::Meter,
            LengthUnit::Inch => Unit::Inch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
            BinOp::Pow => '^',
        }
    }

    fn apply(self, lhs: Real, rhs: Real) -> Real {
        match self {
            BinOp::Add => lhs + rhs,
            BinOp::Sub => lhs - rhs,
            BinOp::Mul => lhs * rhs,
            BinOp::Div => lhs / rhs,
            BinOp::Pow => lhs.powf(rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Func {
    Cos,
    Sin,
    Tan,
    Sqrt,
}

impl Func {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "cos" => Func::Cos,
            "sin" => Func::Sin,
            "tan" => Func::Tan,
            "sqrt" => Func::Sqrt,
            _ => return None,
        })
    }

    pub const fn name(self) -> &'static str {
        match self {
            Func::Cos => "cos",
            Func::Sin => "sin",
            Func::Tan => "tan",
            Func::Sqrt => "sqrt",
        }
    }

    fn apply(self, x: Real) -> Real {
        match self {
            Func::Cos => x.cos(),
            Func::Sin => x.sin(),
            Func::Tan => x.tan(),
            Func::Sqrt => x.sqrt(),
        }
    }
}

/// A formula over named parameters.
///
/// Binary operations, negations and negative literals print parenthesised, so the
/// printed form reads back through [`parse`] to the same value. The tree is the same
/// too, except that a negative literal reads back as the negation of a positive one.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Num(Real),
    Param(String),
    Pi,
    Neg(Box<Expr>),
    Bin(BinOp, Box<Expr>, Box<Expr>),
    Func(Func, Box<Expr>),
    Unit(Box<Expr>, Unit),
}

impl Expr {
    pub fn num(value: Real) -> Self {
        Expr::Num(value)
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(name.into())
    }

    pub fn pow(self, exponent: Expr) -> Self {
        Expr::Bin(BinOp::Pow, Box::new(self), Box::new(exponent))
    }

    pub fn cos(self) -> Self {
        Expr::Func(Func::Cos, Box::new(self))
    }

    pub fn sin(self) -> Self {
        Expr::Func(Func::Sin, Box::new(self))
    }

    pub fn tan(self) -> Self {
        Expr::Func(Func::Tan, Box::new(self))
    }

    pub fn sqrt(self) -> Self {
        Expr::Func(Func::Sqrt, Box::new(self))
    }

    pub fn with_unit(self, unit: Unit) -> Self {
        Expr::Unit(Box::new(self), unit)
    }

    /// True when a unit is written anywhere in the formula.
    pub fn has_unit(&self) -> bool {
        match self {
            Expr::Unit(..) => true,
            Expr::Num(_) | Expr::Param(_) | Expr::Pi => false,
            Expr::Neg(inner) | Expr::Func(_, inner) => inner.has_unit(),
            Expr::Bin(_, lhs, rhs) => lhs.has_unit() || rhs.has_unit(),
        }
    }

    /// Every unit written in the formula, left to right.
    pub fn units(&self) -> Vec<Unit> {
        fn walk(expr: &Expr, out: &mut Vec<Unit>) {
            match expr {
                Expr::Unit(inner, unit) => {
                    walk(inner, out);
                    out.push(*unit);
                },
                Expr::Num(_) | Expr::Param(_) | Expr::Pi => {},
                Expr::Neg(inner) | Expr::Func(_, inner) => walk(inner, out),
                Expr::Bin(_, lhs, rhs) => {
                    walk(lhs, out);
                    walk(rhs, out);
                },
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    /// True when the formula refers to at least one named parameter.
    pub fn has_params(&self) -> bool {
        match self {
            Expr::Param(_) => true,
            Expr::Num(_) | Expr::Pi => false,
            Expr::Neg(inner) | Expr::Func(_, inner) | Expr::Unit(inner, _) => inner.has_params(),
            Expr::Bin(_, lhs, rhs) => lhs.has_params() || rhs.has_params(),
        }
    }

    /// Names of all parameters the formula refers to, in first-use order.
    pub fn params(&self) -> Vec<&str> {
        fn walk<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
            match expr {
                Expr::Param(name) => {
                    if !out.contains(&name.as_str()) {
                        out.push(name);
                    }
                },
                Expr::Num(_) | Expr::Pi => {},
                Expr::Neg(inner) | Expr::Func(_, inner) | Expr::Unit(inner, _) => walk(inner, out),
                Expr::Bin(_, lhs, rhs) => {
                    walk(lhs, out);
                    walk(rhs, out);
                },
            }
        }
        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }

    pub fn eval(&self, bindings: &Bindings) -> Result<Real, ExprError> {
        let value = self.eval_inner(bindings)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ExprError::NonFinite {
                expr: self.to_string(),
            })
        }
    }

    fn eval_inner(&self, bindings: &Bindings) -> Result<Real, ExprError> {
        Ok(match self {
            Expr::Num(value) => *value,
            Expr::Pi => PI,
            Expr::Param(name) => bindings
                .get(name)
                .ok_or_else(|| ExprError::UnknownParameter(name.clone()))?,
            Expr::Neg(inner) => -inner.eval_inner(bindings)?,
            Expr::Bin(op, lhs, rhs) => op.apply(lhs.eval_inner(bindings)?, rhs.eval_inner(bindings)?),
            Expr::Func(func, arg) => func.apply(arg.eval_inner(bindings)?),
            Expr::Unit(inner, unit) => inner.eval_inner(bindings)? * unit.factor(),
        })
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(value) if value.is_sign_negative() => write!(f, "(-{})", -value),
            Expr::Num(value) => write!(f, "{value}"),
            Expr::Param(name) => f.write_str(name),
            Expr::Pi => f.write_str("PI"),
            Expr::Neg(inner) => write!(f, "(-{inner})"),
            Expr::Bin(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Func(func, arg) => write!(f, "{}({arg})", func.name()),
            Expr::Unit(inner, unit) if matches!(**inner, Expr::Unit(..)) => {
                write!(f, "({inner}) {}", unit.symbol())
            },
            Expr::Unit(inner, unit) => write!(f, "{inner} {}", unit.symbol()),
        }
    }
}

impl From<Real> for Expr {
    fn from(value: Real) -> Self {
        Expr::Num(value)
    }
}

macro_rules! impl_bin_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::Bin($op, Box::new(self), Box::new(rhs))
            }
        }

        impl $trait<Real> for Expr {
            type Output = Expr;

            fn $method(self, rhs: Real) -> Expr {
                Expr::Bin($op, Box::new(self), Box::new(Expr::Num(rhs)))
            }
        }

        impl $trait<Expr> for Real {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::Bin($op, Box::new(Expr::Num(self)), Box::new(rhs))
            }
        }
    };
}

impl_bin_op!(Add, add, BinOp::Add);
impl_bin_op!(Sub, sub, BinOp::Sub);
impl_bin_op!(Mul, mul, BinOp::Mul);
impl_bin_op!(Div, div, BinOp::Div);

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Neg(Box::new(self))
    }
}

/// Named values formulas are evaluated against, in internal units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: HashMap<String, Real>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: Real) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: Real) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Real> {
        self.values.get(name).copied()
    }

    /// Like [`get`](Self::get), reporting a missing name as an [`ExprError`].
    pub fn value(&self, name: &str) -> Result<Real, ExprError> {
        self.get(name)
            .ok_or_else(|| ExprError::UnknownParameter(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
