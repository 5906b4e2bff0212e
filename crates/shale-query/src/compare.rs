use std::cmp::Ordering;

use bson::{Bson, Document};

use crate::collation::{Collator, compare_strings};

/// Sort rank of a value's type. Values of different ranks never compare equal.
pub fn canonical_rank(value: &Bson) -> u8 {
    match value {
        Bson::MinKey => 0,
        Bson::Null | Bson::Undefined => 5,
        Bson::Int32(_) | Bson::Int64(_) | Bson::Double(_) | Bson::Decimal128(_) => 10,
        Bson::String(_) | Bson::Symbol(_) => 15,
        Bson::Document(_) => 20,
        Bson::Array(_) => 25,
        Bson::Binary(_) => 30,
        Bson::ObjectId(_) => 35,
        Bson::Boolean(_) => 40,
        Bson::DateTime(_) => 45,
        Bson::Timestamp(_) => 47,
        Bson::RegularExpression(_) => 50,
        Bson::JavaScriptCode(_) => 60,
        Bson::JavaScriptCodeWithScope(_) => 65,
        Bson::MaxKey => 127,
        _ => 55,
    }
}

/// Total order over BSON values.
///
/// Numbers compare by value across Int32/Int64/Double/Decimal128. Strings use `collator` at every
/// nesting depth; nothing else does.
pub fn compare_values(left: &Bson, right: &Bson, collator: Option<&dyn Collator>) -> Ordering {
    let (lr, rr) = (canonical_rank(left), canonical_rank(right));
    if lr != rr {
        return lr.cmp(&rr);
    }

    match (left, right) {
        (Bson::String(a) | Bson::Symbol(a), Bson::String(b) | Bson::Symbol(b)) => {
            compare_strings(a, b, collator)
        }
        (Bson::Document(a), Bson::Document(b)) => compare_documents(a, b, collator),
        (Bson::Array(a), Bson::Array(b)) => compare_arrays(a, b, collator),
        (Bson::Binary(a), Bson::Binary(b)) => a
            .bytes
            .len()
            .cmp(&b.bytes.len())
            .then_with(|| u8::from(a.subtype).cmp(&u8::from(b.subtype)))
            .then_with(|| a.bytes.cmp(&b.bytes)),
        (Bson::ObjectId(a), Bson::ObjectId(b)) => a.bytes().cmp(&b.bytes()),
        (Bson::Boolean(a), Bson::Boolean(b)) => a.cmp(b),
        (Bson::DateTime(a), Bson::DateTime(b)) => a.timestamp_millis().cmp(&b.timestamp_millis()),
        (Bson::Timestamp(a), Bson::Timestamp(b)) => (a.time, a.increment).cmp(&(b.time, b.increment)),
        (Bson::RegularExpression(a), Bson::RegularExpression(b)) => a
            .pattern
            .as_str()
            .cmp(b.pattern.as_str())
            .then_with(|| a.options.as_str().cmp(b.options.as_str())),
        (Bson::JavaScriptCode(a), Bson::JavaScriptCode(b)) => a.cmp(b),
        (Bson::JavaScriptCodeWithScope(a), Bson::JavaScriptCodeWithScope(b)) => a
            .code
            .cmp(&b.code)
            .then_with(|| compare_documents(&a.scope, &b.scope, collator)),
        _ if lr == 10 => compare_numbers(left, right),
        // Same rank and no payload: MinKey, MaxKey, Null, Undefined.
        _ => Ordering::Equal,
    }
}

pub fn values_equal(left: &Bson, right: &Bson, collator: Option<&dyn Collator>) -> bool {
    compare_values(left, right, collator) == Ordering::Equal
}

fn compare_documents(a: &Document, b: &Document, collator: Option<&dyn Collator>) -> Ordering {
    for ((ka, va), (kb, vb)) in a.iter().zip(b.iter()) {
        let ord = canonical_rank(va)
            .cmp(&canonical_rank(vb))
            .then_with(|| ka.as_str().cmp(kb.as_str()))
            .then_with(|| compare_values(va, vb, collator));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

fn compare_arrays(a: &[Bson], b: &[Bson], collator: Option<&dyn Collator>) -> Ordering {
    for (va, vb) in a.iter().zip(b.iter()) {
        let ord = compare_values(va, vb, collator);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

// ── Numbers ─────────────────────────────────────────────────────

enum Num {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

fn as_num(value: &Bson) -> Option<Num> {
    match value {
        Bson::Int32(v) => Some(Num::Int(*v as i64)),
        Bson::Int64(v) => Some(Num::Int(*v)),
        Bson::Double(v) => Some(Num::Float(*v)),
        Bson::Decimal128(d) => Some(Num::Decimal(Decimal::decode(d.bytes()))),
        _ => None,
    }
}

fn compare_numbers(left: &Bson, right: &Bson) -> Ordering {
    let (Some(a), Some(b)) = (as_num(left), as_num(right)) else {
        return Ordering::Equal;
    };
    match (a, b) {
        (Num::Int(a), Num::Int(b)) => a.cmp(&b),
        (Num::Float(a), Num::Float(b)) => compare_f64(a, b),
        (Num::Int(a), Num::Float(b)) => compare_i64_f64(a, b),
        (Num::Float(a), Num::Int(b)) => compare_i64_f64(b, a).reverse(),
        (Num::Decimal(a), Num::Decimal(b)) => compare_decimals(a, b),
        (Num::Decimal(a), Num::Int(b)) => compare_decimals(a, Decimal::from_i64(b)),
        (Num::Int(a), Num::Decimal(b)) => compare_decimals(Decimal::from_i64(a), b),
        // Doubles are binary fractions; the decimal side rounds to the nearest one.
        (Num::Decimal(a), Num::Float(b)) => compare_f64(a.to_f64(), b),
        (Num::Float(a), Num::Decimal(b)) => compare_f64(a, b.to_f64()),
    }
}

// ── Decimal128 ──────────────────────────────────────────────────

const EXPONENT_BIAS: i32 = 6176;
const MAX_COEFFICIENT: u128 = 10u128.pow(34) - 1;

/// A decoded IEEE 754-2008 decimal128 in binary integer significand form.
#[derive(Debug, Clone, Copy)]
enum Decimal {
    NaN,
    Infinite { negative: bool },
    Finite { negative: bool, coefficient: u128, exponent: i32 },
}

impl Decimal {
    fn decode(bytes: [u8; 16]) -> Self {
        let bits = u128::from_le_bytes(bytes);
        let negative = bits >> 127 == 1;
        match (bits >> 122) & 0x1f {
            0x1f => return Decimal::NaN,
            0x1e => return Decimal::Infinite { negative },
            _ => {}
        }
        let (exponent, coefficient) = if (bits >> 125) & 0b11 == 0b11 {
            // The long-coefficient form always exceeds 34 digits.
            ((bits >> 111) & 0x3fff, 0)
        } else {
            ((bits >> 113) & 0x3fff, bits & ((1u128 << 113) - 1))
        };
        Decimal::Finite {
            negative,
            // Non-canonical coefficients read as zero.
            coefficient: if coefficient > MAX_COEFFICIENT { 0 } else { coefficient },
            exponent: exponent as i32 - EXPONENT_BIAS,
        }
    }

    fn from_i64(value: i64) -> Self {
        Decimal::Finite {
            negative: value < 0,
            coefficient: u128::from(value.unsigned_abs()),
            exponent: 0,
        }
    }

    fn signum(self) -> i8 {
        match self {
            Decimal::NaN | Decimal::Finite { coefficient: 0, .. } => 0,
            Decimal::Infinite { negative } | Decimal::Finite { negative, .. } => {
                if negative { -1 } else { 1 }
            }
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Decimal::NaN => f64::NAN,
            Decimal::Infinite { negative: false } => f64::INFINITY,
            Decimal::Infinite { negative: true } => f64::NEG_INFINITY,
            Decimal::Finite { negative, coefficient, exponent } => {
                let sign = if negative { "-" } else { "" };
                format!("{sign}{coefficient}e{exponent}")
                    .parse()
                    .unwrap_or(f64::NAN)
            }
        }
    }
}

/// Exact decimal ordering. NaN equals NaN and sorts lowest, like doubles.
fn compare_decimals(a: Decimal, b: Decimal) -> Ordering {
    match (a, b) {
        (Decimal::NaN, Decimal::NaN) => return Ordering::Equal,
        (Decimal::NaN, _) => return Ordering::Less,
        (_, Decimal::NaN) => return Ordering::Greater,
        _ => {}
    }
    let sign = a.signum();
    if sign != b.signum() {
        return sign.cmp(&b.signum());
    }
    let magnitude = match (a, b) {
        (Decimal::Infinite { .. }, Decimal::Infinite { .. }) => Ordering::Equal,
        (Decimal::Infinite { .. }, _) => Ordering::Greater,
        (_, Decimal::Infinite { .. }) => Ordering::Less,
        (
            Decimal::Finite { coefficient: ca, exponent: ea, .. },
            Decimal::Finite { coefficient: cb, exponent: eb, .. },
        ) if sign != 0 => {
            let (da, db) = (ca.to_string(), cb.to_string());
            // Leading digit position first, then digits padded to a common width.
            (da.len() as i32 + ea)
                .cmp(&(db.len() as i32 + eb))
                .then_with(|| {
                    let width = da.len().max(db.len());
                    format!("{da:0<width$}").cmp(&format!("{db:0<width$}"))
                })
        }
        _ => Ordering::Equal,
    };
    if sign < 0 { magnitude.reverse() } else { magnitude }
}

/// NaN equals NaN and sorts below every other number.
fn compare_f64(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Exact comparison without rounding `i` through f64.
fn compare_i64_f64(i: i64, f: f64) -> Ordering {
    const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return Ordering::Greater;
    }
    if f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(f - whole)).unwrap_or(Ordering::Equal),
        ord => ord,
    }
}
