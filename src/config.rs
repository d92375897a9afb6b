//! Site configuration.
//!
//! SYSTEM CONTEXT
//! ==============
//! The page may embed a JSON document in `#site-enhancer-config` to override
//! class names, selectors, observer tuning, or the scheme-change policy. Every
//! field has a default matching the shipped stylesheet, so an absent or empty
//! document yields [`SiteConfig::default`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    ANCHOR_SELECTOR, DARK_CLASS, REVEAL_BOTTOM_MARGIN_PX, REVEAL_CLASS, REVEAL_SELECTORS, REVEAL_THRESHOLD,
    STORAGE_KEY,
};
use crate::error::EnhanceError;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// How OS scheme changes interact with a preference the user chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemePolicy {
    /// Every OS change is applied and persisted, replacing any earlier choice.
    #[default]
    FollowSystem,
    /// OS-derived values are shown but never persisted, and are ignored once
    /// the user has an explicit choice.
    RespectExplicitChoice,
}

/// Intersection observer tuning for reveal-on-view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealOptions {
    pub selectors: Vec<String>,
    pub marker_class: String,
    pub threshold: f64,
    pub bottom_margin_px: u32,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            selectors: REVEAL_SELECTORS.iter().map(ToString::to_string).collect(),
            marker_class: REVEAL_CLASS.to_string(),
            threshold: REVEAL_THRESHOLD,
            bottom_margin_px: REVEAL_BOTTOM_MARGIN_PX,
        }
    }
}

impl RevealOptions {
    /// CSS `rootMargin` shrinking only the bottom edge of the viewport.
    #[must_use]
    pub fn root_margin(&self) -> String {
        if self.bottom_margin_px == 0 {
            return "0px".to_string();
        }
        format!("0px 0px -{}px 0px", self.bottom_margin_px)
    }

    /// All selectors joined into one selector group.
    #[must_use]
    pub fn selector_group(&self) -> String {
        self.selectors.join(", ")
    }

    fn validate(&self) -> Result<(), EnhanceError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(EnhanceError::Config(format!(
                "reveal.threshold must be within 0.0..=1.0, got {}",
                self.threshold
            )));
        }
        if self.selectors.iter().any(|s| s.trim().is_empty()) {
            return Err(EnhanceError::Config("reveal.selectors must not contain blank entries".into()));
        }
        validate_class_name("reveal.marker_class", &self.marker_class)
    }
}

/// Typed configuration for every enhancement on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub storage_key: String,
    pub dark_class: String,
    pub scheme_policy: SchemePolicy,
    pub anchor_selector: String,
    pub reveal: RevealOptions,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            storage_key: STORAGE_KEY.to_string(),
            dark_class: DARK_CLASS.to_string(),
            scheme_policy: SchemePolicy::default(),
            anchor_selector: ANCHOR_SELECTOR.to_string(),
            reveal: RevealOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl SiteConfig {
    /// Parse and validate a JSON config document.
    ///
    /// A blank document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Config`] for malformed JSON, unknown fields, or
    /// values that fail validation.
    pub fn from_json(raw: &str) -> Result<Self, EnhanceError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(raw).map_err(|e| EnhanceError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`EnhanceError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EnhanceError> {
        if self.storage_key.trim().is_empty() {
            return Err(EnhanceError::Config("storage_key must not be empty".into()));
        }
        validate_class_name("dark_class", &self.dark_class)?;
        if self.anchor_selector.trim().is_empty() {
            return Err(EnhanceError::Config("anchor_selector must not be empty".into()));
        }
        if log::Level::from_str(&self.log_level).is_err() {
            return Err(EnhanceError::Config(format!("unknown log_level {:?}", self.log_level)));
        }
        self.reveal.validate()
    }

    /// Console log level, `Info` when the configured name is unknown.
    #[must_use]
    pub fn log_level(&self) -> log::Level {
        log::Level::from_str(&self.log_level).unwrap_or(log::Level::Info)
    }
}

fn validate_class_name(field: &str, value: &str) -> Result<(), EnhanceError> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(EnhanceError::Config(format!("{field} must be a single class name, got {value:?}")));
    }
    Ok(())
}
