//! Visual templates and their color palettes.

use crate::writer::Color;
use serde::{Deserialize, Serialize};

/// The three visual identities a quote PDF can use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Indigo accent on light slate panels
    #[default]
    Modern,
    /// Navy and steel blue, the most conservative look
    Corporate,
    /// Orange on warm cream panels
    Creative,
}

impl Template {
    /// Resolve a stored template name.
    ///
    /// Unknown names fall back to [`Template::Modern`] so that documents
    /// saved under a retired template keep rendering.
    pub fn from_name(name: &str) -> Self {
        match name {
            "corporate" => Template::Corporate,
            "creative" => Template::Creative,
            _ => Template::Modern,
        }
    }

    /// Canonical name used in storage and file naming.
    pub fn name(self) -> &'static str {
        match self {
            Template::Modern => "modern",
            Template::Corporate => "corporate",
            Template::Creative => "creative",
        }
    }

    /// The template's color palette.
    pub fn palette(self) -> Palette {
        match self {
            Template::Modern => Palette {
                primary: Color::from_rgb8(99, 102, 241),
                secondary: Color::from_rgb8(248, 250, 252),
                accent: Color::from_rgb8(99, 102, 241),
            },
            Template::Corporate => Palette {
                primary: Color::from_rgb8(30, 58, 138),
                secondary: Color::from_rgb8(243, 244, 246),
                accent: Color::from_rgb8(59, 130, 246),
            },
            Template::Creative => Palette {
                primary: Color::from_rgb8(249, 115, 22),
                secondary: Color::from_rgb8(254, 252, 232),
                accent: Color::from_rgb8(234, 88, 12),
            },
        }
    }
}

/// Colors driving a template's header, panels and accents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Header band, table header and strong text
    pub primary: Color,
    /// Background of the issuer and client panels
    pub secondary: Color,
    /// Separator lines and highlights
    pub accent: Color,
}

impl Palette {
    /// Background of every other table row, shared by all templates.
    pub fn zebra_row(&self) -> Color {
        Color::from_rgb8(249, 250, 251)
    }
}
