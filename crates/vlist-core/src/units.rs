#![forbid(unsafe_code)]

//! Viewport geometry and host-unit conversion.
//!
//! Hosts that lay out in a resolution-independent unit (for example a
//! 750-wide design grid) report the window size once, and the engine derives
//! a single pixels-per-unit ratio from it:
//!
//! ```text
//! unit_px = window_width / reference_width
//! ```
//!
//! Everything stored inside the engine is in pixels. The ratio is only
//! applied where a native-unit value (an estimated item height) enters.

/// Clamp a host-supplied pixel value to a usable non-negative number.
///
/// Negative, NaN and infinite inputs collapse to `0.0`.
#[inline]
#[must_use]
pub fn sanitize_px(px: f64) -> f64 {
    if px.is_finite() && px > 0.0 { px } else { 0.0 }
}

/// Size of the host viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Window width in pixels.
    pub width: f64,
    /// Window height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Create a viewport, clamping both dimensions to be non-negative.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: sanitize_px(width),
            height: sanitize_px(height),
        }
    }
}

/// Pixels per host-native unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    px_per_unit: f64,
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl UnitScale {
    /// One native unit is one pixel.
    pub const IDENTITY: Self = Self { px_per_unit: 1.0 };

    /// Build a scale from an explicit ratio.
    ///
    /// Non-positive or non-finite ratios fall back to [`Self::IDENTITY`].
    #[must_use]
    pub fn new(px_per_unit: f64) -> Self {
        if px_per_unit.is_finite() && px_per_unit > 0.0 {
            Self { px_per_unit }
        } else {
            Self::IDENTITY
        }
    }

    /// Derive `width / reference_width` from a reported viewport.
    #[must_use]
    pub fn from_viewport(viewport: Viewport, reference_width: f64) -> Self {
        if !(reference_width.is_finite() && reference_width > 0.0) || viewport.width <= 0.0 {
            return Self::IDENTITY;
        }
        Self::new(viewport.width / reference_width)
    }

    /// The raw ratio.
    #[inline]
    #[must_use]
    pub fn px_per_unit(&self) -> f64 {
        self.px_per_unit
    }

    /// Convert a native-unit length to pixels.
    #[inline]
    #[must_use]
    pub fn to_px(&self, units: f64) -> f64 {
        sanitize_px(units * self.px_per_unit)
    }
}
