//! Parse-then-validate boundary between raw user text and the engine.
//!
//! Form fields arrive as strings. They are parsed into typed values and
//! validated here, before anything reaches the engine; an invalid parse is
//! a distinct [`InputError`], never a silent coercion to zero.

use std::fmt;

/// Rejection reason for one raw input field.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    /// The name field was empty or whitespace.
    EmptyName,
    /// A numeric field did not parse as a number.
    NotANumber {
        /// Field name as shown to the user.
        field: &'static str,
        /// The raw text that failed to parse.
        raw: String,
    },
    /// Wattage parsed but was zero or negative.
    NonPositiveWattage(f32),
    /// Quantity parsed but was below 1.
    QuantityBelowOne(u32),
    /// Capacity parsed but was negative.
    NegativeCapacity(f32),
    /// An efficiency or fractional field fell outside [0, 1].
    FractionOutOfRange {
        /// Field name as shown to the user.
        field: &'static str,
        /// The offending parsed value.
        value: f32,
    },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NotANumber { field, raw } => {
                write!(f, "{field}: \"{raw}\" is not a number")
            }
            Self::NonPositiveWattage(w) => {
                write!(f, "wattage must be > 0, got {w}")
            }
            Self::QuantityBelowOne(q) => {
                write!(f, "quantity must be >= 1, got {q}")
            }
            Self::NegativeCapacity(c) => {
                write!(f, "capacity must be >= 0, got {c}")
            }
            Self::FractionOutOfRange { field, value } => {
                write!(f, "{field} must be in [0, 1], got {value}")
            }
        }
    }
}

/// A validated new-load request, safe to hand to [`crate::engine::LoadBank::add`].
///
/// The only way to build one is through [`NewLoad::parse`] or
/// [`NewLoad::validated`], so a `NewLoad` always satisfies the creation
/// invariants (non-empty name, positive wattage, quantity >= 1).
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoad {
    /// Trimmed display label.
    pub name: String,
    /// Power draw of one unit (W, > 0).
    pub wattage_w: f32,
    /// Number of units (>= 1).
    pub quantity: u32,
}

impl NewLoad {
    /// Parses the three raw form fields of an "add load" action.
    ///
    /// # Errors
    ///
    /// Returns the first failing check's [`InputError`]: numeric parse
    /// failures surface before the creation invariants.
    pub fn parse(name: &str, wattage: &str, quantity: &str) -> Result<Self, InputError> {
        let wattage_w = parse_number("wattage", wattage)?;
        let quantity: u32 = quantity
            .trim()
            .parse()
            .map_err(|_| InputError::NotANumber {
                field: "quantity",
                raw: quantity.to_string(),
            })?;
        Self::validated(name, wattage_w, quantity)
    }

    /// Validates already-numeric values.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if any creation invariant is violated.
    pub fn validated(name: &str, wattage_w: f32, quantity: u32) -> Result<Self, InputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::EmptyName);
        }
        if !(wattage_w > 0.0) {
            return Err(InputError::NonPositiveWattage(wattage_w));
        }
        if quantity < 1 {
            return Err(InputError::QuantityBelowOne(quantity));
        }
        Ok(Self {
            name: name.to_string(),
            wattage_w,
            quantity,
        })
    }
}

/// Parses a raw battery-capacity field (Wh, must be >= 0 and finite).
///
/// # Errors
///
/// Returns an [`InputError`] on parse failure or a negative value.
pub fn parse_capacity(raw: &str) -> Result<f32, InputError> {
    let value = parse_number("capacity", raw)?;
    if value < 0.0 {
        return Err(InputError::NegativeCapacity(value));
    }
    Ok(value)
}

/// Parses a raw efficiency/fraction field and checks it lies in [0, 1].
///
/// # Errors
///
/// Returns an [`InputError`] on parse failure or an out-of-range value.
pub fn parse_fraction(field: &'static str, raw: &str) -> Result<f32, InputError> {
    let value = parse_number(field, raw)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(InputError::FractionOutOfRange { field, value });
    }
    Ok(value)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f32, InputError> {
    let value: f32 = raw.trim().parse().map_err(|_| InputError::NotANumber {
        field,
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotANumber {
            field,
            raw: raw.to_string(),
        });
    }
    Ok(value)
}
