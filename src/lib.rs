//! Binmatch locates small binary shapes in a binarized scan.
//!
//! Raw grayscale images are prepared into {0, 1} foreground masks, each
//! template is compared against every window of the base image with a
//! weighted XOR score, and the accepted placements of all templates are
//! unioned into one output mask. Template jobs run in parallel with the
//! `rayon` feature (on by default); image files are read and written with the
//! `image-io` feature.

pub mod image;
mod kernel;
pub mod lowlevel;
pub mod merge;
pub mod orchestrate;
pub mod prepare;
pub mod search;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{BinaryImage, ImageView, OwnedImage};
pub use kernel::Placement;
pub use merge::{merge_composites, render_mask};
pub use orchestrate::{detect, run_all, MatchJob, OrchestratorConfig};
pub use prepare::{prepare, PrepareParams};
pub use search::{match_template, Composite, Matcher, ScanConfig};
pub use template::{MatchSettings, Method};
pub use util::{BinMatchError, BinMatchResult};
