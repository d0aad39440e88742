//! Rating value object for Pugh matrix (-2 to +2 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Pugh matrix rating: -2 (much worse) to +2 (much better).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(i8)]
pub enum Rating {
    MuchWorse = -2,
    Worse = -1,
    #[default]
    Same = 0,
    Better = 1,
    MuchBetter = 2,
}

impl Rating {
    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_from_i8(value: i8) -> Result<Self, ValidationError> {
        match value {
            -2 => Ok(Rating::MuchWorse),
            -1 => Ok(Rating::Worse),
            0 => Ok(Rating::Same),
            1 => Ok(Rating::Better),
            2 => Ok(Rating::MuchBetter),
            _ => Err(ValidationError::out_of_range(
                "rating",
                -2,
                2,
                value as i32,
            )),
        }
    }

    /// Returns the numeric value.
    pub fn value(&self) -> i8 {
        *self as i8
    }

    /// Returns the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Rating::MuchWorse => "Much Worse",
            Rating::Worse => "Worse",
            Rating::Same => "Same",
            Rating::Better => "Better",
            Rating::MuchBetter => "Much Better",
        }
    }

    /// Returns true if this is a positive rating.
    pub fn is_positive(&self) -> bool {
        self.value() > 0
    }

    /// Returns true if this is a negative rating.
    pub fn is_negative(&self) -> bool {
        self.value() < 0
    }

    /// Returns true if this is neutral (Same).
    pub fn is_neutral(&self) -> bool {
        self.value() == 0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.value() > 0 { "+" } else { "" };
        write!(f, "{}{}", sign, self.value())
    }
}
