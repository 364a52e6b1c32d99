//! Pipeline run configuration

use serde::Deserialize;

const DEFAULT_MAX_ITERATIONS: u32 = 2;

/// Settings for one pipeline run
///
/// Constructed once at process entry and passed into the component
/// constructors; there is no ambient global configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    /// Iteration cap of the refinement loop
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whether advisory reports enter the refinement loop at all
    #[serde(default = "default_refine")]
    pub refine: bool,
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_refine() -> bool {
    true
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            refine: true,
        }
    }
}
