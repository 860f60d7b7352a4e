//! Поэлементная арифметика над записями.
//!
//! Результат всегда новая запись (глубокая копия левого операнда с новым
//! буфером); операнды не изменяются.

use std::ops::{Add, Mul, Sub};

use log::trace;
use sacio_types::{Domain, SacError, SacResult};

use crate::Record;

/// Арифметическая операция.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
}

/// Правый операнд.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Другая запись с совпадающими `npts`, `delta`, `b`, `e`
    Record(&'a Record),
    /// Последовательность длиной `npts`
    Sequence(&'a [f32]),
    /// Число, применяемое ко всем отсчётам
    Scalar(f64),
}

impl ArithOp {
    fn apply_f32(
        self,
        a: f32,
        b: f32,
    ) -> f32 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Subtract => a - b,
            ArithOp::Multiply => a * b,
        }
    }

    fn apply_f64(
        self,
        a: f64,
        b: f64,
    ) -> f64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Subtract => a - b,
            ArithOp::Multiply => a * b,
        }
    }
}

/// Применяет `op` к `lhs` и `rhs`, возвращая новую запись.
pub fn combine<'a>(
    op: ArithOp,
    lhs: &Record,
    rhs: impl Into<Operand<'a>>,
) -> SacResult<Record> {
    let rhs = rhs.into();
    let left = operand_samples(lhs, "left operand")?;

    let out: Vec<f32> = match rhs {
        Operand::Record(other) => {
            let right = operand_samples(other, "right operand")?;
            check_headers(lhs, other)?;
            left.iter()
                .zip(right)
                .map(|(&a, &b)| op.apply_f32(a, b))
                .collect()
        }
        Operand::Sequence(seq) => {
            let expected = lhs.npts();
            if seq.len() != expected {
                return Err(SacError::LengthMismatch {
                    expected,
                    found: seq.len(),
                });
            }
            left.iter()
                .zip(seq)
                .map(|(&a, &b)| op.apply_f32(a, b))
                .collect()
        }
        Operand::Scalar(k) => left
            .iter()
            .map(|&a| op.apply_f64(a as f64, k) as f32)
            .collect(),
    };

    trace!("{op} over {} samples", out.len());

    let mut result = lhs.clone();
    result.set_data(out);

    Ok(result)
}

/// Отсчёты записи, пригодной для арифметики.
fn operand_samples<'r>(
    record: &'r Record,
    which: &str,
) -> SacResult<&'r [f32]> {
    if record.domain() != Domain::Time {
        return Err(SacError::unsupported_operand(format!(
            "{which} is a frequency-domain record"
        )));
    }

    if record.is_header_only() {
        return Err(SacError::unsupported_operand(format!(
            "{which} is a header-only record"
        )));
    }

    record.time_data()
}

/// Проверяет совпадение `npts`, `delta`, `b`, `e` двух записей.
fn check_headers(
    lhs: &Record,
    rhs: &Record,
) -> SacResult<()> {
    let (a, b) = (lhs.header(), rhs.header());

    if a.npts != b.npts {
        return Err(SacError::HeaderMismatch { field: "npts" });
    }
    if a.delta != b.delta {
        return Err(SacError::HeaderMismatch { field: "delta" });
    }
    if a.b != b.b {
        return Err(SacError::HeaderMismatch { field: "b" });
    }
    if a.e != b.e {
        return Err(SacError::HeaderMismatch { field: "e" });
    }

    Ok(())
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl<'a> From<&'a Record> for Operand<'a> {
    fn from(r: &'a Record) -> Self {
        Operand::Record(r)
    }
}

impl<'a> From<&'a [f32]> for Operand<'a> {
    fn from(s: &'a [f32]) -> Self {
        Operand::Sequence(s)
    }
}

impl<'a> From<&'a Vec<f32>> for Operand<'a> {
    fn from(s: &'a Vec<f32>) -> Self {
        Operand::Sequence(s)
    }
}

impl From<f64> for Operand<'_> {
    fn from(k: f64) -> Self {
        Operand::Scalar(k)
    }
}

impl From<f32> for Operand<'_> {
    fn from(k: f32) -> Self {
        Operand::Scalar(k as f64)
    }
}

impl From<i32> for Operand<'_> {
    fn from(k: i32) -> Self {
        Operand::Scalar(k as f64)
    }
}

impl<'a, T: Into<Operand<'a>>> Add<T> for &Record {
    type Output = SacResult<Record>;

    fn add(
        self,
        rhs: T,
    ) -> Self::Output {
        combine(ArithOp::Add, self, rhs)
    }
}

impl<'a, T: Into<Operand<'a>>> Sub<T> for &Record {
    type Output = SacResult<Record>;

    fn sub(
        self,
        rhs: T,
    ) -> Self::Output {
        combine(ArithOp::Subtract, self, rhs)
    }
}

impl<'a, T: Into<Operand<'a>>> Mul<T> for &Record {
    type Output = SacResult<Record>;

    fn mul(
        self,
        rhs: T,
    ) -> Self::Output {
        combine(ArithOp::Multiply, self, rhs)
    }
}

impl std::fmt::Display for ArithOp {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ArithOp::Add => write!(f, "add"),
            ArithOp::Subtract => write!(f, "sub"),
            ArithOp::Multiply => write!(f, "mul"),
        }
    }
}

impl std::str::FromStr for ArithOp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" | "+" => Ok(ArithOp::Add),
            "sub" | "subtract" | "-" => Ok(ArithOp::Subtract),
            "mul" | "multiply" | "*" => Ok(ArithOp::Multiply),
            _ => Err(format!("Unknown operation: '{s}'. Use: add, sub, mul")),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
