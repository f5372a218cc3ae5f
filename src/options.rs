//! Engine configuration supplied by the host page.
//!
//! One options struct covers both deployment shapes of the viewer: a
//! fixed-size embed without filter UI, and a responsive page with the type
//! filter and legend. The sizing heuristics (large-model threshold, marker
//! sizes) have no derivation behind them, so they live here as tunables
//! rather than as invariants.

#[cfg(test)]
#[path = "options_test.rs"]
mod options_test;

use serde::Deserialize;

pub const DEFAULT_LARGE_DATASET_THRESHOLD: usize = 1000;
pub const DEFAULT_HIT_RADIUS_PX: f64 = 20.0;
pub const DEFAULT_MIN_ZOOM: f64 = 0.5;
pub const DEFAULT_MAX_ZOOM: f64 = 10.0;
pub const DEFAULT_ZOOM_IN_FACTOR: f64 = 1.5;
pub const DEFAULT_ZOOM_OUT_FACTOR: f64 = 0.75;
pub const DEFAULT_ZOOM_ANIMATION_MS: f64 = 300.0;
pub const DEFAULT_FETCH_DEBOUNCE_MS: u32 = 300;
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u32 = 100;

/// Error returned by [`EngineOptions::from_json`] and [`EngineOptions::validate`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The options payload was not valid JSON for this struct.
    #[error("failed to parse engine options: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field parsed but holds an unusable value.
    #[error("invalid engine option: {0}")]
    Invalid(String),
}

/// How the canvas backing store is sized.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CanvasSizing {
    /// Fixed CSS pixel dimensions; resize events are ignored.
    Fixed { width: f64, height: f64 },
    /// Track the container's client size.
    #[default]
    Responsive,
}

/// Modifier key that turns a click into a pan/zoom gesture instead of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BypassModifier {
    Shift,
    Ctrl,
    #[default]
    Alt,
    Meta,
}

/// Marker radius model: `base_px / k^exponent` in pre-zoom pixels.
///
/// After the zoom transform the on-screen radius is `base_px * k^(1 - exponent)`,
/// so an exponent of 1 keeps markers a constant screen size.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarkerSizing {
    pub base_px: f64,
    pub exponent: f64,
}

impl MarkerSizing {
    /// Marker radius in pre-zoom pixels at zoom `k`.
    #[must_use]
    pub fn radius(&self, k: f64) -> f64 {
        self.base_px / k.max(f64::MIN_POSITIVE).powf(self.exponent)
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineOptions {
    pub sizing: CanvasSizing,
    /// Whether the host shows the type filter and legend.
    pub show_filter: bool,
    /// Component count above which the dataset uses large-model sizing.
    pub large_dataset_threshold: usize,
    /// Screen-space click radius.
    pub hit_radius_px: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub zoom_animation_ms: f64,
    pub fetch_debounce_ms: u32,
    pub resize_debounce_ms: u32,
    pub bypass_modifier: BypassModifier,
    pub marker: MarkerSizing,
    pub large_marker: MarkerSizing,
    /// Line stroke color.
    pub line_color: String,
    /// Line stroke width in screen pixels.
    pub line_width_px: f64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            sizing: CanvasSizing::default(),
            show_filter: true,
            large_dataset_threshold: DEFAULT_LARGE_DATASET_THRESHOLD,
            hit_radius_px: DEFAULT_HIT_RADIUS_PX,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_in_factor: DEFAULT_ZOOM_IN_FACTOR,
            zoom_out_factor: DEFAULT_ZOOM_OUT_FACTOR,
            zoom_animation_ms: DEFAULT_ZOOM_ANIMATION_MS,
            fetch_debounce_ms: DEFAULT_FETCH_DEBOUNCE_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            bypass_modifier: BypassModifier::default(),
            marker: MarkerSizing { base_px: 6.0, exponent: 0.5 },
            large_marker: MarkerSizing { base_px: 3.0, exponent: 0.8 },
            line_color: "#ffc107".to_owned(),
            line_width_px: 1.0,
        }
    }
}

impl EngineOptions {
    /// Parse and validate host-supplied JSON. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Parse` for malformed JSON or unknown keys, and
    /// `OptionsError::Invalid` when a value fails [`Self::validate`].
    pub fn from_json(raw: &str) -> Result<Self, OptionsError> {
        let options: Self = serde_json::from_str(raw)?;
        options.validate()?;
        Ok(options)
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `OptionsError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.min_zoom > 0.0 && self.min_zoom < self.max_zoom) {
            return Err(OptionsError::Invalid(format!(
                "zoom range must satisfy 0 < min_zoom < max_zoom (got {}..{})",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_in_factor <= 1.0 {
            return Err(OptionsError::Invalid(format!("zoom_in_factor must be > 1 (got {})", self.zoom_in_factor)));
        }
        if !(self.zoom_out_factor > 0.0 && self.zoom_out_factor < 1.0) {
            return Err(OptionsError::Invalid(format!(
                "zoom_out_factor must be in (0, 1) (got {})",
                self.zoom_out_factor
            )));
        }
        if self.hit_radius_px <= 0.0 {
            return Err(OptionsError::Invalid(format!("hit_radius_px must be positive (got {})", self.hit_radius_px)));
        }
        for (name, m) in [("marker", self.marker), ("large_marker", self.large_marker)] {
            if m.base_px <= 0.0 {
                return Err(OptionsError::Invalid(format!("{name}.base_px must be positive (got {})", m.base_px)));
            }
        }
        if let CanvasSizing::Fixed { width, height } = self.sizing {
            if width <= 0.0 || height <= 0.0 {
                return Err(OptionsError::Invalid(format!("fixed canvas size must be positive (got {width}x{height})")));
            }
        }
        Ok(())
    }

    /// Marker sizing for a dataset of the given largeness.
    #[must_use]
    pub fn marker_for(&self, large: bool) -> MarkerSizing {
        if large { self.large_marker } else { self.marker }
    }

    /// Clamp a zoom factor to the configured range.
    #[must_use]
    pub fn clamp_zoom(&self, k: f64) -> f64 {
        k.clamp(self.min_zoom, self.max_zoom)
    }

    /// CSS `width` and `height` the canvas element must take, if sizing is fixed.
    #[must_use]
    pub fn fixed_css_size(&self) -> Option<(String, String)> {
        match self.sizing {
            CanvasSizing::Fixed { width, height } => Some((format!("{width}px"), format!("{height}px"))),
            CanvasSizing::Responsive => None,
        }
    }
}
