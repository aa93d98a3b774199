//! Configuration types for roadmap layout.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as the CLI's TOML configuration file. Every field
//! falls back to the engine's built-in default when absent.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and collision settings.
//! - [`LayoutConfig`] - Node box size, spacing and the [`SpineEngine`] choice.
//! - [`CollisionConfig`] - Padding and pass budget of the overlap resolver.
//!
//! # Example
//!
//! ```
//! # use trellis::config::{AppConfig, SpineEngine};
//! let config = AppConfig::default();
//! assert_eq!(config.layout().spine_engine(), SpineEngine::Layered);
//! assert_eq!(config.collision().max_passes(), 5);
//! assert!(config.validate().is_ok());
//! ```

use std::{fmt, str::FromStr};

use serde::Deserialize;

use trellis_core::geometry::Size;

/// Available strategies for ranking the spine.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum SpineEngine {
    /// Built-in longest-path layering with barycenter ordering.
    #[default]
    Layered,
    /// Layering delegated to the `rust-sugiyama` crate.
    Sugiyama,
}

impl fmt::Display for SpineEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Layered => f.write_str("layered"),
            Self::Sugiyama => f.write_str("sugiyama"),
        }
    }
}

impl FromStr for SpineEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "layered" => Ok(Self::Layered),
            "sugiyama" => Ok(Self::Sugiyama),
            _ => Err(format!(
                "unknown spine engine `{s}`, valid values: layered, sugiyama"
            )),
        }
    }
}

impl TryFrom<String> for SpineEngine {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Top-level configuration combining layout and collision settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Collision resolver configuration section.
    #[serde(default)]
    collision: CollisionConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(layout: LayoutConfig, collision: CollisionConfig) -> Self {
        Self { layout, collision }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the collision resolver configuration.
    pub fn collision(&self) -> &CollisionConfig {
        &self.collision
    }

    /// Checks that the configured values describe a usable layout.
    ///
    /// # Errors
    ///
    /// Returns a human readable message naming the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.collision.validate()
    }
}

/// Box size and spacing used by the spine ranker, compactor and rib placer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    spine_engine: SpineEngine,
    node_width: f64,
    node_height: f64,
    /// Horizontal gap between spine nodes sharing a rank.
    node_separation: f64,
    /// Vertical gap between spine ranks.
    rank_separation: f64,
    rib_horizontal_spacing: f64,
    rib_vertical_spacing: f64,
    /// Minimum vertical gap between the rib extents of consecutive spine nodes.
    min_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spine_engine: SpineEngine::default(),
            node_width: 300.0,
            node_height: 150.0,
            node_separation: 80.0,
            rank_separation: 150.0,
            rib_horizontal_spacing: 150.0,
            rib_vertical_spacing: 80.0,
            min_gap: 60.0,
        }
    }
}

impl LayoutConfig {
    pub fn spine_engine(&self) -> SpineEngine {
        self.spine_engine
    }

    /// Uniform box size shared by every node.
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn node_separation(&self) -> f64 {
        self.node_separation
    }

    pub fn rank_separation(&self) -> f64 {
        self.rank_separation
    }

    pub fn rib_horizontal_spacing(&self) -> f64 {
        self.rib_horizontal_spacing
    }

    pub fn rib_vertical_spacing(&self) -> f64 {
        self.rib_vertical_spacing
    }

    pub fn min_gap(&self) -> f64 {
        self.min_gap
    }

    /// Sets the spine ranking strategy.
    pub fn with_spine_engine(mut self, engine: SpineEngine) -> Self {
        self.spine_engine = engine;
        self
    }

    /// Sets the uniform node box size.
    pub fn with_node_size(mut self, size: Size) -> Self {
        self.node_width = size.width();
        self.node_height = size.height();
        self
    }

    /// Sets the within-rank and between-rank spine spacing.
    pub fn with_spine_spacing(mut self, node_separation: f64, rank_separation: f64) -> Self {
        self.node_separation = node_separation;
        self.rank_separation = rank_separation;
        self
    }

    /// Sets the horizontal and vertical rib spacing.
    pub fn with_rib_spacing(mut self, horizontal: f64, vertical: f64) -> Self {
        self.rib_horizontal_spacing = horizontal;
        self.rib_vertical_spacing = vertical;
        self
    }

    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("layout.node_width", self.node_width),
            ("layout.node_height", self.node_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("{name} must be a positive number, got {value}"));
            }
        }

        for (name, value) in [
            ("layout.node_separation", self.node_separation),
            ("layout.rank_separation", self.rank_separation),
            ("layout.rib_horizontal_spacing", self.rib_horizontal_spacing),
            ("layout.rib_vertical_spacing", self.rib_vertical_spacing),
            ("layout.min_gap", self.min_gap),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} must not be negative, got {value}"));
            }
        }

        Ok(())
    }
}

/// Settings of the pairwise overlap resolver.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Extra clearance added to the box size when testing for overlap.
    padding: f64,
    max_passes: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            padding: 30.0,
            max_passes: 5,
        }
    }
}

impl CollisionConfig {
    /// Creates a new [`CollisionConfig`].
    pub fn new(padding: f64, max_passes: usize) -> Self {
        Self {
            padding,
            max_passes,
        }
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    fn validate(&self) -> Result<(), String> {
        if !self.padding.is_finite() || self.padding < 0.0 {
            return Err(format!(
                "collision.padding must not be negative, got {}",
                self.padding
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        let layout = config.layout();

        assert_eq!(layout.spine_engine(), SpineEngine::Layered);
        assert_eq!(layout.node_size(), Size::new(300.0, 150.0));
        assert_eq!(layout.node_separation(), 80.0);
        assert_eq!(layout.rank_separation(), 150.0);
        assert_eq!(layout.rib_horizontal_spacing(), 150.0);
        assert_eq!(layout.rib_vertical_spacing(), 80.0);
        assert_eq!(layout.min_gap(), 60.0);
        assert_eq!(config.collision().padding(), 30.0);
        assert_eq!(config.collision().max_passes(), 5);
    }

    #[test]
    fn test_spine_engine_from_str() {
        assert_eq!("layered".parse::<SpineEngine>(), Ok(SpineEngine::Layered));
        assert_eq!("sugiyama".parse::<SpineEngine>(), Ok(SpineEngine::Sugiyama));
        assert!("force".parse::<SpineEngine>().is_err());
    }

    #[test]
    fn test_spine_engine_display_matches_from_str() {
        for engine in [SpineEngine::Layered, SpineEngine::Sugiyama] {
            assert_eq!(engine.to_string().parse::<SpineEngine>(), Ok(engine));
        }
    }

    #[test]
    fn test_validate_rejects_non_positive_size() {
        let layout = LayoutConfig::default().with_node_size(Size::new(0.0, 150.0));
        let config = AppConfig::new(layout, CollisionConfig::default());

        let err = config.validate().unwrap_err();
        assert!(err.contains("layout.node_width"));
    }

    #[test]
    fn test_validate_rejects_negative_spacing() {
        let layout = LayoutConfig::default().with_rib_spacing(150.0, -1.0);
        let config = AppConfig::new(layout, CollisionConfig::default());

        let err = config.validate().unwrap_err();
        assert!(err.contains("layout.rib_vertical_spacing"));
    }

    #[test]
    fn test_validate_rejects_negative_padding() {
        let config = AppConfig::new(LayoutConfig::default(), CollisionConfig::new(-5.0, 5));
        assert!(config.validate().is_err());
    }
}
