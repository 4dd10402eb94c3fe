use regex::Regex;

use crate::error::{Error, Result};
use loadrep_store::DateFilter;

pub const DEFAULT_MOVING_STAT_PERIOD_SECS: u64 = 5;
pub const DEFAULT_SLICE_COUNT: usize = 20;
pub const DEFAULT_SLICE_SIZE: f64 = 20.0;

/// Outlier-rejection parameters; constructing them validates them, so a
/// held value is always usable.
#[derive(Debug, Clone, Copy)]
pub struct CleanupOptions {
    keep_factor: f64,
    keep_percentage: f64,
}

impl CleanupOptions {
    pub fn new(keep_factor: f64, keep_percentage: f64) -> Result<Self> {
        if !(keep_factor > 0.0) {
            return Err(Error::InvalidKeepFactor);
        }
        if !(0.0..100.0).contains(&keep_percentage) {
            return Err(Error::InvalidKeepPercentage);
        }
        Ok(Self {
            keep_factor,
            keep_percentage,
        })
    }

    #[must_use]
    pub fn keep_factor(&self) -> f64 {
        self.keep_factor
    }

    #[must_use]
    pub fn keep_percentage(&self) -> f64 {
        self.keep_percentage
    }
}

/// Analysis configuration for one report build.
///
/// Alias patterns are kept in registration order; the first whole-string
/// match wins. Success patterns are keyed by action type.
#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
    pub date_filter: DateFilter,
    pub cleanup: Option<CleanupOptions>,
    success_patterns: Vec<(String, Regex)>,
    aliases: Vec<(String, Regex)>,
    pub moving_stat_period_secs: u64,
    pub slice_count: usize,
    pub slice_size: f64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyzeConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            date_filter: DateFilter::default(),
            cleanup: None,
            success_patterns: Vec::new(),
            aliases: Vec::new(),
            moving_stat_period_secs: DEFAULT_MOVING_STAT_PERIOD_SECS,
            slice_count: DEFAULT_SLICE_COUNT,
            slice_size: DEFAULT_SLICE_SIZE,
        }
    }

    /// Registers the success pattern for one action type. A sample of
    /// that type is successful only when its result matches the whole
    /// pattern.
    pub fn add_success_pattern(&mut self, action_type: &str, pattern: &str) -> Result<()> {
        let regex = compile_anchored(action_type, pattern)?;
        self.success_patterns.push((action_type.to_string(), regex));
        Ok(())
    }

    /// Registers an alias; aliases apply in registration order.
    pub fn add_alias(&mut self, name: &str, pattern: &str) -> Result<()> {
        let regex = compile_anchored(name, pattern)?;
        self.aliases.push((name.to_string(), regex));
        Ok(())
    }

    #[must_use]
    pub fn success_pattern(&self, action_type: &str) -> Option<&Regex> {
        self.success_patterns
            .iter()
            .find(|(name, _)| name == action_type)
            .map(|(_, regex)| regex)
    }

    #[must_use]
    pub fn aliases(&self) -> &[(String, Regex)] {
        &self.aliases
    }
}

// Whole-string semantics, whatever anchors the pattern itself carries.
fn compile_anchored(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(&format!(r"\A(?:{pattern})\z")).map_err(|source| Error::InvalidPattern {
        name: name.to_string(),
        source,
    })
}
