//! Precomputed weights and error budget for weighted XOR matching.

use crate::image::BinaryImage;
use crate::template::MatchSettings;

/// Template pixels plus the per-cell weights and acceptance bound.
///
/// `weight = template_error_weight` where the template is foreground and
/// `base_error_weight` elsewhere. The error budget is
/// `error_threshold * sum(weight)`, and a window is accepted only when its
/// weighted disagreement is strictly below that budget.
#[derive(Clone, Debug)]
pub struct XorTemplatePlan {
    template: BinaryImage,
    weights: Vec<u32>,
    total_weight: u64,
    max_error: f64,
    limit: u64,
}

impl XorTemplatePlan {
    /// Builds a plan for one template under the given settings.
    pub fn new(template: &BinaryImage, settings: &MatchSettings) -> Self {
        let base_w = settings.base_error_weight();
        let tpl_w = settings.template_error_weight();
        let weights: Vec<u32> = template
            .as_slice()
            .iter()
            .map(|&px| if px == 1 { tpl_w } else { base_w })
            .collect();
        let total_weight: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        let max_error = settings.error_threshold() * total_weight as f64;

        // Errors are integers, so `error < max_error` iff `error < ceil(max_error)`.
        let limit = max_error.ceil() as u64;

        Self {
            template: template.clone(),
            weights,
            total_weight,
            max_error,
            limit,
        }
    }

    /// Returns the template width.
    pub fn width(&self) -> usize {
        self.template.width()
    }

    /// Returns the template height.
    pub fn height(&self) -> usize {
        self.template.height()
    }

    /// Returns the template pixels.
    pub fn template(&self) -> &BinaryImage {
        &self.template
    }

    /// Returns the row-major weight matrix.
    pub fn weights(&self) -> &[u32] {
        &self.weights
    }

    /// Weighted error of a window that disagrees everywhere.
    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    /// Maximum tolerated weighted disagreement (exclusive).
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Smallest integer error that is rejected.
    pub(crate) fn limit(&self) -> u64 {
        self.limit
    }

    /// Acceptance predicate: `error < max_error`.
    #[inline]
    pub fn accepts(&self, error: u64) -> bool {
        error < self.limit
    }
}
