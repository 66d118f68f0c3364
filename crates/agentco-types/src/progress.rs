//! Bounded completion percentage.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A percentage in `0..=100`.
///
/// Values outside the range cannot be constructed, so anything holding a
/// `Progress` is already valid by the time it reaches the backend.
///
/// Decoding is lenient: the backend can store values it never validated,
/// so out-of-range numbers read from it are clamped instead of failing the
/// whole record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Progress(u8);

impl Progress {
    pub const ZERO: Progress = Progress(0);
    pub const COMPLETE: Progress = Progress(100);

    /// Build from a percentage, rejecting anything above 100.
    pub fn new(percent: u8) -> Result<Self, ProgressError> {
        if percent > 100 {
            return Err(ProgressError::OutOfRange(i64::from(percent)));
        }
        Ok(Self(percent))
    }

    /// Build from a percentage, clamping to 100.
    pub fn saturating(percent: u32) -> Self {
        Self(percent.min(100) as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_complete(self) -> bool {
        self.0 == 100
    }

    /// Clamp a number read from the backend into range.
    pub fn clamped(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        Self::saturating(value.round().max(0.0) as u32)
    }

    /// Add `step` points, stopping at 100.
    pub fn saturating_add(self, step: u8) -> Self {
        Self::saturating(u32::from(self.0) + u32::from(step))
    }
}

impl TryFrom<i64> for Progress {
    type Error = ProgressError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(0..=100).contains(&value) {
            return Err(ProgressError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

impl TryFrom<f64> for Progress {
    type Error = ProgressError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(ProgressError::NotANumber);
        }
        let rounded = value.round();
        if !(0.0..=100.0).contains(&rounded) {
            return Err(ProgressError::OutOfRange(rounded as i64));
        }
        Ok(Self(rounded as u8))
    }
}

impl From<Progress> for u8 {
    fn from(progress: Progress) -> Self {
        progress.0
    }
}

impl<'de> Deserialize<'de> for Progress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        let progress = Progress::clamped(value);
        if f64::from(progress.0) != value.round() {
            tracing::warn!(value, clamped = progress.0, "Out-of-range progress from backend");
        }
        Ok(progress)
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Rejected progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    #[error("progress must be between 0 and 100, got {0}")]
    OutOfRange(i64),

    #[error("progress must be a finite number")]
    NotANumber,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert!(Progress::try_from(0_i64).is_ok());
        assert!(Progress::try_from(100_i64).is_ok());
        assert_eq!(
            Progress::try_from(101_i64),
            Err(ProgressError::OutOfRange(101))
        );
        assert_eq!(Progress::try_from(-1_i64), Err(ProgressError::OutOfRange(-1)));
        assert!(Progress::new(101).is_err());
    }

    #[test]
    fn test_saturating_add() {
        let p = Progress::new(95).unwrap().saturating_add(10);
        assert_eq!(p, Progress::COMPLETE);
        assert!(p.is_complete());
    }

    #[test]
    fn test_deserialize_clamps_out_of_range() {
        assert_eq!(serde_json::from_str::<Progress>("150").unwrap(), Progress::COMPLETE);
        assert_eq!(serde_json::from_str::<Progress>("-5").unwrap(), Progress::ZERO);
        assert_eq!(serde_json::from_str::<Progress>("40").unwrap().get(), 40);
        assert_eq!(serde_json::from_str::<Progress>("42.6").unwrap().get(), 43);
        assert!(serde_json::from_str::<Progress>("\"half\"").is_err());
    }

    #[test]
    fn test_clamped() {
        assert_eq!(Progress::clamped(f64::NAN), Progress::ZERO);
        assert_eq!(Progress::clamped(1e12), Progress::COMPLETE);
        assert_eq!(Progress::clamped(99.6).get(), 100);
    }

    #[test]
    fn test_serializes_as_integer() {
        let p = Progress::new(30).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "30");
    }
}
