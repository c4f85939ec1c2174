//! Exhaustive weighted XOR search of one template over a base image.
//!
//! [`match_template`] is the plain entry point. [`Matcher`] adds row-parallel
//! scanning and a time budget that is checked between bands of offset rows.

mod composite;

pub use composite::Composite;

use crate::image::BinaryImage;
use crate::kernel::scalar;
use crate::kernel::Placement;
use crate::template::{MatchSettings, XorTemplatePlan};
use crate::trace::{trace_event, trace_span};
use crate::util::{BinMatchError, BinMatchResult};
use std::time::{Duration, Instant};

/// Scans every offset of `template` over `base` and returns the union of the
/// accepted placements.
///
/// A template larger than the base in either dimension has no valid offset
/// and yields an all-zero composite.
pub fn match_template(
    base: &BinaryImage,
    template: &BinaryImage,
    settings: &MatchSettings,
) -> Composite {
    let plan = XorTemplatePlan::new(template, settings);
    let _span = trace_span!(
        "match_template",
        tpl_width = plan.width(),
        tpl_height = plan.height()
    )
    .entered();
    let placements = scalar::scan_full(base.view(), &plan);
    let composite = Composite::from_placements(base, plan.template(), &placements);
    trace_event!("composite", accepted = composite.accepted());
    composite
}

/// Scan options for [`Matcher`].
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Scan offset rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Time budget for one scan; `None` disables the check.
    pub timeout: Option<Duration>,
    /// Offset rows scanned between two time-budget checks.
    pub band_rows: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            timeout: None,
            band_rows: 16,
        }
    }
}

/// Template matcher with a precomputed plan.
pub struct Matcher {
    plan: XorTemplatePlan,
    cfg: ScanConfig,
}

impl Matcher {
    /// Creates a matcher with default scan options.
    pub fn new(template: &BinaryImage, settings: &MatchSettings) -> Self {
        Self {
            plan: XorTemplatePlan::new(template, settings),
            cfg: ScanConfig::default(),
        }
    }

    /// Replaces the scan options.
    pub fn with_config(mut self, cfg: ScanConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the scan options.
    pub fn config(&self) -> &ScanConfig {
        &self.cfg
    }

    /// Returns the precomputed plan.
    pub fn plan(&self) -> &XorTemplatePlan {
        &self.plan
    }

    /// Returns all accepted placements in row-major order.
    pub fn placements(&self, base: &BinaryImage) -> BinMatchResult<Vec<Placement>> {
        let view = base.view();
        let Some((_, rows)) = scalar::offset_range(view, &self.plan) else {
            return Ok(Vec::new());
        };

        let started = Instant::now();
        let band = self.cfg.band_rows.max(1);
        let mut placements = Vec::new();
        let mut y0 = 0;
        while y0 < rows {
            if let Some(limit) = self.cfg.timeout {
                let elapsed = started.elapsed();
                if elapsed >= limit {
                    return Err(BinMatchError::Timeout {
                        elapsed_ms: elapsed.as_millis(),
                        limit_ms: limit.as_millis(),
                    });
                }
            }
            let y1 = (y0 + band).min(rows);
            placements.extend(self.scan_band(base, y0, y1));
            y0 = y1;
        }
        Ok(placements)
    }

    /// Scans `base` and returns the composite of accepted placements.
    pub fn match_image(&self, base: &BinaryImage) -> BinMatchResult<Composite> {
        let _span = trace_span!(
            "match_image",
            tpl_width = self.plan.width(),
            tpl_height = self.plan.height(),
            parallel = self.cfg.parallel
        )
        .entered();
        let placements = self.placements(base)?;
        let composite = Composite::from_placements(base, self.plan.template(), &placements);
        trace_event!("composite", accepted = composite.accepted());
        Ok(composite)
    }

    #[cfg(feature = "rayon")]
    fn scan_band(&self, base: &BinaryImage, y0: usize, y1: usize) -> Vec<Placement> {
        if self.cfg.parallel {
            crate::kernel::rayon::scan_rows_par(base.view(), &self.plan, y0, y1)
        } else {
            scalar::scan_rows(base.view(), &self.plan, y0, y1)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn scan_band(&self, base: &BinaryImage, y0: usize, y1: usize) -> Vec<Placement> {
        scalar::scan_rows(base.view(), &self.plan, y0, y1)
    }
}
