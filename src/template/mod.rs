//! Match settings and template planning.

use crate::util::{BinMatchError, BinMatchResult};
use std::fmt;
use std::str::FromStr;

mod plan;

pub use plan::XorTemplatePlan;

/// Scoring method applied to a template job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Method {
    /// Weighted XOR disagreement between window and template.
    #[default]
    XorWeighted,
}

impl Method {
    /// Canonical lowercase identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::XorWeighted => "xor_weighted",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = BinMatchError;

    /// Parses a method identifier, ignoring ASCII case.
    fn from_str(s: &str) -> BinMatchResult<Self> {
        if s.eq_ignore_ascii_case(Method::XorWeighted.as_str()) {
            Ok(Method::XorWeighted)
        } else {
            Err(BinMatchError::config(format!("invalid method: {s}")))
        }
    }
}

/// Acceptance settings for the weighted XOR matcher.
///
/// `error_threshold` is the fraction of the template's total weight that a
/// window may disagree by. Mismatches where the template is foreground cost
/// `template_error_weight`; mismatches where it is background cost
/// `base_error_weight`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchSettings {
    error_threshold: f64,
    base_error_weight: u32,
    template_error_weight: u32,
}

impl MatchSettings {
    /// Default weight for both mismatch kinds.
    pub const DEFAULT_ERROR_WEIGHT: u32 = 1;

    /// Validates the threshold (`[0, 1]`) and both weights (`>= 1`).
    pub fn new(
        error_threshold: f64,
        base_error_weight: i64,
        template_error_weight: i64,
    ) -> BinMatchResult<Self> {
        if !(0.0..=1.0).contains(&error_threshold) {
            return Err(BinMatchError::config(format!(
                "error threshold must be between 0 and 1 inclusive, got {error_threshold}"
            )));
        }
        let base_error_weight = validate_weight("base", base_error_weight)?;
        let template_error_weight = validate_weight("template", template_error_weight)?;
        Ok(Self {
            error_threshold,
            base_error_weight,
            template_error_weight,
        })
    }

    /// Settings with the given threshold and default weights.
    pub fn with_threshold(error_threshold: f64) -> BinMatchResult<Self> {
        let weight = i64::from(Self::DEFAULT_ERROR_WEIGHT);
        Self::new(error_threshold, weight, weight)
    }

    pub fn error_threshold(&self) -> f64 {
        self.error_threshold
    }

    pub fn base_error_weight(&self) -> u32 {
        self.base_error_weight
    }

    pub fn template_error_weight(&self) -> u32 {
        self.template_error_weight
    }
}

fn validate_weight(which: &str, weight: i64) -> BinMatchResult<u32> {
    if weight < 1 {
        return Err(BinMatchError::config(format!(
            "{which} error weight must be an integer at least 1, got {weight}"
        )));
    }
    u32::try_from(weight)
        .map_err(|_| BinMatchError::config(format!("{which} error weight {weight} is too large")))
}
