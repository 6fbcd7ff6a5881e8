//! Implicit conversions between value kinds.
//!
//! Conversions live in a dense `ValueKind × ValueKind` table of plain function pointers.
//! Converting a kind to itself is always a copy; any other pair must be registered, and a
//! missing entry fails with [`ConversionError::UnsupportedConversion`] instead of guessing.
//!
//! The registered policy is fixed for the process:
//! - scalar -> vector/color broadcasts the scalar (colors get alpha 1)
//! - vector -> scalar takes the component mean (lossy)
//! - color -> scalar takes Rec.709 luma (lossy)
//! - float -> int truncates toward zero (lossy for fractional values)
//! - anything -> bool tests for non-zero; bool -> numeric gives 1 / 0
//! - every non-text kind formats into text; text never converts back

use once_cell::sync::Lazy;
use thiserror::Error;

use crate::value::{Value, ValueKind};

/// Signature of a single registered conversion. Receives a value of the source kind and
/// returns `None` only if called with a value of the wrong kind.
pub type ConvertFn = fn(&Value) -> Option<Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("no implicit conversion from {from} to {to}")]
    UnsupportedConversion { from: ValueKind, to: ValueKind },
}

/// Dense conversion table indexed by `(source kind, destination kind)`.
#[derive(Clone)]
pub struct ConversionRegistry {
    table: [[Option<ConvertFn>; ValueKind::COUNT]; ValueKind::COUNT],
}

impl std::fmt::Debug for ConversionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<(ValueKind, ValueKind)> = self.pairs().collect();
        f.debug_struct("ConversionRegistry")
            .field("registered", &registered)
            .finish()
    }
}

impl ConversionRegistry {
    /// A registry with no conversions besides identity.
    pub fn empty() -> Self {
        ConversionRegistry {
            table: [[None; ValueKind::COUNT]; ValueKind::COUNT],
        }
    }

    /// Register (or replace) the conversion `from -> to`.
    pub fn register(&mut self, from: ValueKind, to: ValueKind, f: ConvertFn) {
        self.table[from.index()][to.index()] = Some(f);
    }

    pub fn is_convertible(&self, from: ValueKind, to: ValueKind) -> bool {
        from == to || self.table[from.index()][to.index()].is_some()
    }

    /// Iterate the registered non-identity pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (ValueKind, ValueKind)> + '_ {
        ValueKind::ALL.into_iter().flat_map(move |from| {
            ValueKind::ALL
                .into_iter()
                .filter(move |to| self.table[from.index()][to.index()].is_some())
                .map(move |to| (from, to))
        })
    }

    /// Produce a value of kind `to` derived from `value`.
    pub fn convert(&self, to: ValueKind, value: &Value) -> Result<Value, ConversionError> {
        let from = value.kind();
        if from == to {
            return Ok(value.clone());
        }
        self.table[from.index()][to.index()]
            .and_then(|f| f(value))
            .ok_or(ConversionError::UnsupportedConversion { from, to })
    }

    /// The table used by node evaluation.
    pub fn with_implicit_conversions() -> Self {
        let mut reg = ConversionRegistry::empty();
        register_implicit(&mut reg);
        reg
    }
}

impl Default for ConversionRegistry {
    fn default() -> Self {
        Self::with_implicit_conversions()
    }
}

static IMPLICIT: Lazy<ConversionRegistry> = Lazy::new(ConversionRegistry::with_implicit_conversions);

/// The process-wide implicit conversion table.
pub fn implicit_conversions() -> &'static ConversionRegistry {
    &IMPLICIT
}

/// Rec.709 luma of the RGB channels.
#[inline]
pub fn luma(c: [f32; 4]) -> f32 {
    0.2126 * c[0] + 0.7152 * c[1] + 0.0722 * c[2]
}

#[inline]
fn mean2(v: [f32; 2]) -> f32 {
    (v[0] + v[1]) / 2.0
}

#[inline]
fn mean3(v: [f32; 3]) -> f32 {
    (v[0] + v[1] + v[2]) / 3.0
}

#[inline]
fn b2f(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

macro_rules! conv {
    ($reg:ident, $from:ident => $to:ident, |$x:ident| $body:expr) => {
        $reg.register(ValueKind::$from, ValueKind::$to, |value: &Value| match value {
            Value::$from(inner) => {
                let $x = inner.clone();
                Some(Value::$to($body))
            }
            _ => None,
        });
    };
}

fn register_implicit(reg: &mut ConversionRegistry) {
    // Float
    conv!(reg, Float => Int, |x| x as i32);
    conv!(reg, Float => Vec2, |x| [x, x]);
    conv!(reg, Float => Vec3, |x| [x, x, x]);
    conv!(reg, Float => ColorRgba, |x| [x, x, x, 1.0]);
    conv!(reg, Float => Bool, |x| x > 0.0);
    conv!(reg, Float => Text, |x| x.to_string());

    // Int
    conv!(reg, Int => Float, |x| x as f32);
    conv!(reg, Int => Vec2, |x| [x as f32, x as f32]);
    conv!(reg, Int => Vec3, |x| [x as f32, x as f32, x as f32]);
    conv!(reg, Int => ColorRgba, |x| [x as f32, x as f32, x as f32, 1.0]);
    conv!(reg, Int => Bool, |x| x > 0);
    conv!(reg, Int => Text, |x| x.to_string());

    // Vec2 (to scalar: lossy)
    conv!(reg, Vec2 => Float, |v| mean2(v));
    conv!(reg, Vec2 => Int, |v| mean2(v) as i32);
    conv!(reg, Vec2 => Vec3, |v| [v[0], v[1], 0.0]);
    conv!(reg, Vec2 => ColorRgba, |v| [v[0], v[1], 0.0, 1.0]);
    conv!(reg, Vec2 => Bool, |v| v[0] != 0.0 || v[1] != 0.0);
    conv!(reg, Vec2 => Text, |v| format!("({}, {})", v[0], v[1]));

    // Vec3 (to scalar and Vec2: lossy)
    conv!(reg, Vec3 => Float, |v| mean3(v));
    conv!(reg, Vec3 => Int, |v| mean3(v) as i32);
    conv!(reg, Vec3 => Vec2, |v| [v[0], v[1]]);
    conv!(reg, Vec3 => ColorRgba, |v| [v[0], v[1], v[2], 1.0]);
    conv!(reg, Vec3 => Bool, |v| v.iter().any(|c| *c != 0.0));
    conv!(reg, Vec3 => Text, |v| format!("({}, {}, {})", v[0], v[1], v[2]));

    // ColorRgba (everything but text is lossy)
    conv!(reg, ColorRgba => Float, |c| luma(c));
    conv!(reg, ColorRgba => Int, |c| luma(c) as i32);
    conv!(reg, ColorRgba => Vec2, |c| [c[0], c[1]]);
    conv!(reg, ColorRgba => Vec3, |c| [c[0], c[1], c[2]]);
    conv!(reg, ColorRgba => Bool, |c| luma(c) > 0.0);
    conv!(reg, ColorRgba => Text, |c| format!("({}, {}, {}, {})", c[0], c[1], c[2], c[3]));

    // Bool
    conv!(reg, Bool => Float, |b| b2f(b));
    conv!(reg, Bool => Int, |b| b as i32);
    conv!(reg, Bool => Vec2, |b| [b2f(b); 2]);
    conv!(reg, Bool => Vec3, |b| [b2f(b); 3]);
    conv!(reg, Bool => ColorRgba, |b| [b2f(b), b2f(b), b2f(b), 1.0]);
    conv!(reg, Bool => Text, |b| b.to_string());
}
