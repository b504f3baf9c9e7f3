use std::fs;
use std::path::Path;

use decaygen_core::errors::{DecayError, ErrorInfo};
use decaygen_kin::{AmplitudeVariant, ParentSpecies};
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a single Markov chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Half-width of the uniform proposal perturbation used in production.
    #[serde(default = "default_step")]
    pub step: f64,
    /// Number of decorrelation steps discarded before each returned sample.
    #[serde(default = "default_discard")]
    pub discard: usize,
    /// Cooling schedule used to thermalise a fresh chain.
    #[serde(default)]
    pub burn_in: BurnInSchedule,
}

fn default_step() -> f64 {
    0.05
}

fn default_discard() -> usize {
    16
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            step: default_step(),
            discard: default_discard(),
            burn_in: BurnInSchedule::default(),
        }
    }
}

impl SamplerConfig {
    /// Rejects steps that would break the reflecting boundary.
    pub fn validate(&self) -> Result<(), DecayError> {
        check_step("step", self.step)?;
        check_step("burn_in.initial_step", self.burn_in.initial_step)
    }
}

pub(crate) fn check_step(field: &str, value: f64) -> Result<(), DecayError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        return Ok(());
    }
    Err(DecayError::InvalidConfiguration(
        ErrorInfo::new("invalid-step", "proposal step must lie in (0, 1]")
            .with_context("field", field)
            .with_context("value", value.to_string()),
    ))
}

/// Fixed linear cooling schedule for burn-in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnInSchedule {
    /// Proposal step of the first burn-in iteration.
    #[serde(default = "default_initial_step")]
    pub initial_step: f64,
    /// Number of burn-in iterations.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

fn default_initial_step() -> f64 {
    0.5
}

fn default_iterations() -> usize {
    2000
}

impl Default for BurnInSchedule {
    fn default() -> Self {
        Self {
            initial_step: default_initial_step(),
            iterations: default_iterations(),
        }
    }
}

impl BurnInSchedule {
    /// Step used at `iteration`, decreasing linearly to machine epsilon.
    pub fn step_at(&self, iteration: usize) -> f64 {
        if self.iterations <= 1 {
            return self.initial_step;
        }
        let progress = iteration as f64 / (self.iterations - 1) as f64;
        self.initial_step - (self.initial_step - f64::EPSILON) * progress
    }
}

/// Parallelism settings for normalization estimates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of local worker chains.
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|count| count.get())
        .unwrap_or(1)
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

/// String selectors naming the decay channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Parent species selector (`mu-` or `mu+`).
    #[serde(default = "default_parent")]
    pub parent: String,
    /// Squared-amplitude variant selector (`flat`, `v-a` or `radiative`).
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Minimum photon energy in MeV for radiative channels.
    #[serde(default = "default_photon_cut")]
    pub photon_cut: f64,
}

fn default_parent() -> String {
    "mu+".to_string()
}

fn default_variant() -> String {
    "v-a".to_string()
}

fn default_photon_cut() -> f64 {
    1.0
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            parent: default_parent(),
            variant: default_variant(),
            photon_cut: default_photon_cut(),
        }
    }
}

impl ChannelConfig {
    /// Resolves both selectors into their typed counterparts.
    pub fn resolve(&self) -> Result<(ParentSpecies, AmplitudeVariant), DecayError> {
        if !(self.photon_cut.is_finite() && self.photon_cut > 0.0) {
            return Err(DecayError::InvalidConfiguration(
                ErrorInfo::new("invalid-photon-cut", "photon cut must be positive")
                    .with_context("value", self.photon_cut.to_string()),
            ));
        }
        Ok((self.parent.parse()?, self.variant.parse()?))
    }
}

/// Top-level configuration document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Chain parameters.
    #[serde(default)]
    pub sampler: SamplerConfig,
    /// Normalization estimator parameters.
    #[serde(default)]
    pub estimator: EstimatorConfig,
    /// Decay channel selectors.
    #[serde(default)]
    pub channel: ChannelConfig,
}

impl GeneratorConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(contents: &str) -> Result<Self, DecayError> {
        let config: Self = serde_yaml::from_str(contents).map_err(|err| {
            DecayError::InvalidConfiguration(ErrorInfo::new("config-parse", err.to_string()))
        })?;
        config.sampler.validate()?;
        config.channel.resolve()?;
        Ok(config)
    }

    /// Writes the configuration as YAML.
    pub fn store(&self, path: &Path) -> Result<(), DecayError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                DecayError::Serde(
                    ErrorInfo::new("config-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
        let yaml = serde_yaml::to_string(self).map_err(|err| {
            DecayError::Serde(
                ErrorInfo::new("config-serialize", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        fs::write(path, yaml).map_err(|err| {
            DecayError::Serde(
                ErrorInfo::new("config-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }
}

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<GeneratorConfig, DecayError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        DecayError::Serde(
            ErrorInfo::new("config-read", err.to_string())
                .with_context("path", path.display().to_string()),
        )
    })?;
    GeneratorConfig::from_yaml(&contents)
}
