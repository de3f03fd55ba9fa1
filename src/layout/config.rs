//! Layout engine configuration (§4, ambient "configuration" concerns).
//!
//! Grounded on the teacher's `LayoutConfig` (`max_system_width`,
//! `units_per_space`, `system_spacing`, `system_height`, each with a
//! `Default` impl) and `spacer::SpacingConfig`, split into the
//! sub-configuration groups §4's modules each need, with the same
//! smart-constructor-returns-`Result` idiom the domain value objects use
//! so a misconfigured engine fails fast (§7) rather than producing
//! garbage geometry.

use crate::error::ConfigError;

/// Horizontal spacing parameters (§4.2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingConfiguration {
    /// Staff-spaces allotted to one quarter note before the logarithmic
    /// term is applied.
    pub quarter_note_spacing: f64,
    /// Exponent scale in `width = quarter_note_spacing · (1 + factor ·
    /// log2(quarter_notes))`. Must lie within `[0, 2]`.
    pub spacing_factor: f64,
    pub minimum_measure_width: f64,
}

impl SpacingConfiguration {
    pub fn new(
        quarter_note_spacing: f64,
        spacing_factor: f64,
        minimum_measure_width: f64,
    ) -> Result<Self, ConfigError> {
        if !(0.0..=2.0).contains(&spacing_factor) {
            return Err(ConfigError::SpacingFactorOutOfRange(spacing_factor));
        }
        if minimum_measure_width <= 0.0 {
            return Err(ConfigError::NonPositiveMinimumMeasureWidth(
                minimum_measure_width,
            ));
        }
        Ok(Self {
            quarter_note_spacing,
            spacing_factor,
            minimum_measure_width,
        })
    }
}

impl Default for SpacingConfiguration {
    fn default() -> Self {
        Self {
            quarter_note_spacing: 2.0,
            spacing_factor: 1.0,
            minimum_measure_width: 6.0,
        }
    }
}

/// Page geometry (§4.3, §4.8).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfiguration {
    pub width_points: f64,
    pub height_points: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    pub margin_right: f64,
    /// Extra top margin reserved on page one only, for title/composer
    /// credits, before the page breaker lays out the first page's systems.
    pub first_page_top_offset: f64,
}

impl PageConfiguration {
    pub fn new(
        width_points: f64,
        height_points: f64,
        margin_top: f64,
        margin_bottom: f64,
        margin_left: f64,
        margin_right: f64,
        first_page_top_offset: f64,
    ) -> Result<Self, ConfigError> {
        if width_points <= 0.0 {
            return Err(ConfigError::NonPositivePageWidth(width_points));
        }
        if height_points <= 0.0 {
            return Err(ConfigError::NonPositivePageHeight(height_points));
        }
        for (side, value) in [
            ("top", margin_top),
            ("bottom", margin_bottom),
            ("left", margin_left),
            ("right", margin_right),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeMargin { side, value });
            }
        }
        if first_page_top_offset < 0.0 {
            return Err(ConfigError::NegativeMargin {
                side: "first_page_top_offset",
                value: first_page_top_offset,
            });
        }
        Ok(Self {
            width_points,
            height_points,
            margin_top,
            margin_bottom,
            margin_left,
            margin_right,
            first_page_top_offset,
        })
    }

    pub fn letter_size() -> Self {
        Self::new(612.0, 792.0, 72.0, 72.0, 72.0, 72.0, 80.0).expect("letter preset is always valid")
    }

    pub fn a4_size() -> Self {
        Self::new(595.0, 842.0, 56.7, 56.7, 56.7, 56.7, 80.0).expect("a4 preset is always valid")
    }

    pub fn content_width(&self) -> f64 {
        self.width_points - self.margin_left - self.margin_right
    }

    pub fn content_height(&self) -> f64 {
        self.height_points - self.margin_top - self.margin_bottom
    }

    /// Usable vertical space on page one, after reserving
    /// `first_page_top_offset` for credits (§4.8).
    pub fn first_page_content_height(&self) -> f64 {
        (self.content_height() - self.first_page_top_offset).max(0.0)
    }
}

/// Staff and system geometry (§4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaffConfiguration {
    pub staff_height_points: f64,
    pub inter_staff_spacing: f64,
    pub inter_system_spacing: f64,
    pub minimum_staff_clearance: f64,
}

impl StaffConfiguration {
    pub fn new(
        staff_height_points: f64,
        inter_staff_spacing: f64,
        inter_system_spacing: f64,
        minimum_staff_clearance: f64,
    ) -> Result<Self, ConfigError> {
        if staff_height_points <= 0.0 {
            return Err(ConfigError::NonPositiveStaffHeight(staff_height_points));
        }
        Ok(Self {
            staff_height_points,
            inter_staff_spacing,
            inter_system_spacing,
            minimum_staff_clearance,
        })
    }
}

impl Default for StaffConfiguration {
    fn default() -> Self {
        Self {
            staff_height_points: 40.0,
            inter_staff_spacing: 140.0,
            inter_system_spacing: 200.0,
            minimum_staff_clearance: 16.0,
        }
    }
}

/// Beam geometry parameters (§4.7), generalized from the teacher's
/// `beams::{BEAM_THICKNESS, MAX_SLOPE, INTER_BEAM_GAP, BEAM_HOOK_LENGTH}`
/// module-level constants into configuration so callers can retune them
/// per house style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamConfiguration {
    pub thickness: f64,
    pub max_slope: f64,
    pub inter_beam_gap: f64,
    pub hook_length: f64,
}

impl Default for BeamConfiguration {
    fn default() -> Self {
        Self {
            thickness: 0.5,
            max_slope: 0.25,
            inter_beam_gap: 0.25,
            hook_length: 0.75,
        }
    }
}

/// Stem geometry parameters (§4.7), generalized from the teacher's
/// `stems::{STEM_LENGTH, STEM_THICKNESS, NOTEHEAD_WIDTH,
/// MIN_BEAMED_STEM_LENGTH, MIN_LEDGER_STEM_LENGTH}` constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StemConfiguration {
    pub length: f64,
    pub thickness: f64,
    pub notehead_width: f64,
    pub minimum_beamed_length: f64,
    pub minimum_ledger_length: f64,
}

impl Default for StemConfiguration {
    fn default() -> Self {
        Self {
            length: 3.5,
            thickness: 0.12,
            notehead_width: 1.18,
            minimum_beamed_length: 2.5,
            minimum_ledger_length: 3.0,
        }
    }
}

/// Page-breaking cost parameters (§4.3), mirroring the breaker's own
/// stretch/compress penalties but for systems-to-pages instead of
/// measures-to-systems.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBreakConfiguration {
    /// Fill ratio below which a page is considered underfull.
    pub min_page_fill: f64,
    pub underfill_penalty: f64,
    /// Flat penalty (divided by system count) discouraging pages with few
    /// systems when more would have fit.
    pub few_systems_penalty: f64,
}

impl Default for PageBreakConfiguration {
    fn default() -> Self {
        Self {
            min_page_fill: 0.6,
            underfill_penalty: 500.0,
            few_systems_penalty: 30.0,
        }
    }
}

/// Aggregate configuration for one layout run, mirroring the way the
/// teacher's `LayoutConfig` bundles its constants, split into the
/// sub-configurations above so each layout module only depends on the
/// slice it needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfiguration {
    pub page: PageConfiguration,
    pub staff: StaffConfiguration,
    pub spacing: SpacingConfiguration,
    pub beam: BeamConfiguration,
    pub stem: StemConfiguration,
    pub page_break: PageBreakConfiguration,
    /// Tenths per staff-space; fixed at 40 by MusicXML convention unless a
    /// score's defaults override it.
    pub tenths_per_staff_space: f64,
}

impl LayoutConfiguration {
    pub fn new(page: PageConfiguration, staff: StaffConfiguration) -> Self {
        Self {
            page,
            staff,
            spacing: SpacingConfiguration::default(),
            beam: BeamConfiguration::default(),
            stem: StemConfiguration::default(),
            page_break: PageBreakConfiguration::default(),
            tenths_per_staff_space: 40.0,
        }
    }

    pub fn letter_size() -> Self {
        Self::new(PageConfiguration::letter_size(), StaffConfiguration::default())
    }

    pub fn a4_size() -> Self {
        Self::new(PageConfiguration::a4_size(), StaffConfiguration::default())
    }
}

impl Default for LayoutConfiguration {
    fn default() -> Self {
        Self::letter_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_margin_is_rejected() {
        let err = PageConfiguration::new(612.0, 792.0, -1.0, 72.0, 72.0, 72.0, 80.0).unwrap_err();
        assert!(matches!(err, ConfigError::NegativeMargin { side: "top", .. }));
    }

    #[test]
    fn non_positive_staff_height_is_rejected() {
        assert!(StaffConfiguration::new(0.0, 140.0, 200.0, 16.0).is_err());
    }

    #[test]
    fn spacing_factor_out_of_range_is_rejected() {
        assert!(SpacingConfiguration::new(2.0, 2.5, 6.0).is_err());
    }

    #[test]
    fn presets_are_internally_valid() {
        let _ = LayoutConfiguration::letter_size();
        let _ = LayoutConfiguration::a4_size();
    }
}
