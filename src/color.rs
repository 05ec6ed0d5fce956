use eframe::egui::Color32;
use palette::Srgb;
use serde::Serialize;

use crate::data::model::Classification;

// ---------------------------------------------------------------------------
// Fixed categorical fill scale: classification → colour
// ---------------------------------------------------------------------------

/// A named sRGB colour as it appears in an exported chart spec.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

impl NamedColor {
    fn new(name: &'static str, c: Srgb<u8>) -> Self {
        NamedColor {
            name,
            rgb: [c.red, c.green, c.blue],
        }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.rgb[0], self.rgb[1], self.rgb[2])
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgb(self.rgb[0], self.rgb[1], self.rgb[2])
    }
}

/// Two-colour scale; limits are ordered wildtype, resistant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillScale {
    pub wildtype: NamedColor,
    pub resistant: NamedColor,
}

impl Default for FillScale {
    fn default() -> Self {
        FillScale {
            wildtype: NamedColor::new("blue", palette::named::BLUE),
            resistant: NamedColor::new("red", palette::named::RED),
        }
    }
}

impl FillScale {
    pub fn color_for(&self, class: Classification) -> NamedColor {
        match class {
            Classification::Wildtype => self.wildtype,
            Classification::Resistant => self.resistant,
        }
    }

    /// Return the legend entries (label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(&'static str, Color32)> {
        [Classification::Wildtype, Classification::Resistant]
            .into_iter()
            .map(|c| (c.label(), self.color_for(c).to_color32()))
            .collect()
    }
}

/// Bar colour when no classification is drawn.
pub const NEUTRAL_FILL: Color32 = Color32::from_rgb(0x59, 0x59, 0x59);
