//! Serializable configuration, decoupled from the runtime-only palette
//! and pixel data that [`crate::api::YarnDitherer`] also needs.
//!
//! Lets a caller load row-constraint settings from JSON/TOML/etc. via
//! `serde` while keeping the palette (arbitrary yarn colors, not
//! sensibly hand-authored as config) a plain constructor argument.

use serde::{Deserialize, Serialize};

use crate::api::Method;
use crate::cost::CostMetric;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricConfig {
    Linear,
    Srgb,
    Oklab,
    Demo,
}

impl Default for MetricConfig {
    fn default() -> Self {
        MetricConfig::Linear
    }
}

impl From<MetricConfig> for CostMetric {
    fn from(m: MetricConfig) -> Self {
        match m {
            MetricConfig::Linear => CostMetric::Linear,
            MetricConfig::Srgb => CostMetric::Srgb,
            MetricConfig::Oklab => CostMetric::Oklab,
            MetricConfig::Demo => CostMetric::Demo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MethodConfig {
    Optimal,
    Beam { beam_width: usize },
}

impl Default for MethodConfig {
    fn default() -> Self {
        MethodConfig::Optimal
    }
}

impl From<MethodConfig> for Method {
    fn from(m: MethodConfig) -> Self {
        match m {
            MethodConfig::Optimal => Method::Optimal,
            MethodConfig::Beam { beam_width } => Method::Beam { beam_width },
        }
    }
}

fn default_true() -> bool {
    true
}

/// The scalar knobs of a dither run, independent of the palette and
/// source image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DitherConfig {
    pub use_within: u32,
    pub cross_within: u32,
    #[serde(default = "default_true")]
    pub diffuse: bool,
    #[serde(default)]
    pub seed: u32,
    /// Worker count for the optimal solver's relaxation pool; 0 means
    /// "use available parallelism".
    #[serde(default)]
    pub threads: u32,
    #[serde(default)]
    pub metric: MetricConfig,
    #[serde(default)]
    pub method: MethodConfig,
}

impl Default for DitherConfig {
    fn default() -> Self {
        Self {
            use_within: 0,
            cross_within: 0,
            diffuse: true,
            seed: 0,
            threads: 0,
            metric: MetricConfig::default(),
            method: MethodConfig::default(),
        }
    }
}
