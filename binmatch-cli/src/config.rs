//! JSON configuration and its validation.

use binmatch::{
    BinMatchError, BinMatchResult, MatchSettings, Method, OrchestratorConfig, PrepareParams,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn default_blur_kernel_size() -> i64 {
    PrepareParams::DEFAULT_BLUR_KERNEL_SIZE as i64
}

fn default_threshold() -> i64 {
    i64::from(PrepareParams::DEFAULT_THRESHOLD)
}

fn default_weight() -> i64 {
    i64::from(MatchSettings::DEFAULT_ERROR_WEIGHT)
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageConfig {
    pub file_path: PathBuf,
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: i64,
    #[serde(default = "default_threshold")]
    pub threshold: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodParameters {
    pub error_threshold: f64,
    #[serde(default = "default_weight")]
    pub base_error_weight: i64,
    #[serde(default = "default_weight")]
    pub template_error_weight: i64,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    pub file_path: PathBuf,
    #[serde(default = "default_blur_kernel_size")]
    pub blur_kernel_size: i64,
    #[serde(default = "default_threshold")]
    pub threshold: i64,
    pub method: String,
    pub method_parameters: MethodParameters,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub write_path: PathBuf,
    pub base_image: ImageConfig,
    pub templates: Vec<TemplateConfig>,
    #[serde(default = "default_parallel")]
    pub parallel: bool,
    #[serde(default)]
    pub max_workers: Option<usize>,
    #[serde(default)]
    pub job_timeout_ms: Option<u64>,
}

/// A template entry after validation; its image is not loaded yet.
#[derive(Debug)]
pub struct TemplateSource {
    pub file_path: PathBuf,
    pub prepare: PrepareParams,
    pub method: Method,
    pub settings: MatchSettings,
}

/// Fully validated run description.
#[derive(Debug)]
pub struct RunPlan {
    pub write_path: PathBuf,
    pub base_path: PathBuf,
    pub base_prepare: PrepareParams,
    pub templates: Vec<TemplateSource>,
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Checks every path and numeric bound before any image is decoded.
    pub fn validate(self) -> BinMatchResult<RunPlan> {
        check_write_path(&self.write_path)?;
        check_input_file(&self.base_image.file_path)?;
        let base_prepare =
            PrepareParams::new(self.base_image.blur_kernel_size, self.base_image.threshold)?;

        let mut templates = Vec::with_capacity(self.templates.len());
        for tpl in self.templates {
            check_input_file(&tpl.file_path)?;
            let params = &tpl.method_parameters;
            templates.push(TemplateSource {
                prepare: PrepareParams::new(tpl.blur_kernel_size, tpl.threshold)?,
                method: tpl.method.parse()?,
                settings: MatchSettings::new(
                    params.error_threshold,
                    params.base_error_weight,
                    params.template_error_weight,
                )?,
                file_path: tpl.file_path,
            });
        }

        let orchestrator = OrchestratorConfig {
            parallel: self.parallel,
            max_workers: self.max_workers,
            job_timeout: self.job_timeout_ms.map(Duration::from_millis),
        };
        orchestrator.validate()?;

        Ok(RunPlan {
            write_path: self.write_path,
            base_path: self.base_image.file_path,
            base_prepare,
            templates,
            orchestrator,
        })
    }
}

fn config_error(reason: String) -> BinMatchError {
    BinMatchError::Config { reason }
}

fn check_input_file(path: &Path) -> BinMatchResult<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(config_error(format!(
            "input file {} cannot be found",
            path.display()
        )))
    }
}

/// Checks that the output directory exists and that this process can create
/// files in it, by creating and removing a marker file.
fn check_write_path(path: &Path) -> BinMatchResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(config_error(format!(
            "output directory {} does not exist",
            dir.display()
        )));
    }
    let marker = dir.join(format!(".binmatch-write-check-{}", std::process::id()));
    let created = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&marker);
    match created {
        Ok(file) => {
            drop(file);
            // Removal is best effort.
            let _ = fs::remove_file(&marker);
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => Ok(()),
        Err(err) => Err(config_error(format!(
            "output write path {} is not writable: {err}",
            path.display()
        ))),
    }
}
