//! Reform-type color palette.

use std::collections::HashMap;

use currency_atlas_core::event::ReformType;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fill color for countries with no event, and for types a palette does not
/// cover.
pub const DEFAULT_COLOR: &str = "#627BC1";

const STANDARD_COLORS: [(ReformType, &str); 20] = [
    (ReformType::NewCurrency, "#e6194b"),
    (ReformType::Redenomination, "#3cb44b"),
    (ReformType::Decimalization, "#ffe119"),
    (ReformType::Devaluation, "#4363d8"),
    (ReformType::Revaluation, "#f58231"),
    (ReformType::JoinEuro, "#911eb4"),
    (ReformType::LeaveEuro, "#46f0f0"),
    (ReformType::Dollarization, "#f032e6"),
    (ReformType::DeDollarization, "#bcf60c"),
    (ReformType::PegChange, "#fabebe"),
    (ReformType::CurrencyBoard, "#008080"),
    (ReformType::MonetaryUnion, "#e6beff"),
    (ReformType::ExitUnion, "#9a6324"),
    (ReformType::GoldStandard, "#fffac8"),
    (ReformType::AbandonGold, "#800000"),
    (ReformType::BanknotesRedesign, "#aaffc3"),
    (ReformType::ExchangeRegimeChange, "#808000"),
    (ReformType::Cryptocurrency, "#ffd8b1"),
    (ReformType::InstitutionReform, "#000075"),
    (ReformType::Other, "#808080"),
];

/// Errors raised while building a palette.
#[derive(Debug, Error)]
pub enum PaletteError {
    /// A color is not `#rgb` or `#rrggbb`.
    #[error("invalid color {color:?} for {name:?}")]
    InvalidColor {
        /// The type name, or `defaultColor`.
        name: String,
        /// The offending value.
        color: String,
    },

    /// The palette document is not valid JSON of the expected shape.
    #[error("invalid palette document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One row of the palette as shown to editors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Reform category.
    #[serde(rename = "type")]
    pub reform_type: ReformType,
    /// Resolved fill color.
    pub color: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaletteDocument {
    #[serde(default)]
    default_color: Option<String>,
    #[serde(default)]
    colors: HashMap<String, String>,
}

/// Maps reform type names to fill colors, with a fallback color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: HashMap<String, String>,
    default_color: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

impl Palette {
    /// The built-in palette: one distinct color per reform category.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            colors: STANDARD_COLORS
                .iter()
                .map(|(t, c)| (t.as_str().to_owned(), (*c).to_owned()))
                .collect(),
            default_color: DEFAULT_COLOR.to_owned(),
        }
    }

    /// Builds a palette from `(type name, color)` pairs. The pairs may cover
    /// only some of the categories.
    ///
    /// # Errors
    ///
    /// Returns `PaletteError::InvalidColor` if any color is not a hex color.
    pub fn new<I>(colors: I, default_color: &str) -> Result<Self, PaletteError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        check_color("defaultColor", default_color)?;
        let colors = colors
            .into_iter()
            .map(|(name, color)| {
                check_color(&name, &color)?;
                Ok((name, color))
            })
            .collect::<Result<HashMap<_, _>, PaletteError>>()?;
        Ok(Self {
            colors,
            default_color: default_color.to_owned(),
        })
    }

    /// Parses `{"defaultColor": "#...", "colors": {"<type>": "#..."}}`.
    /// `defaultColor` is optional.
    ///
    /// # Errors
    ///
    /// Returns `PaletteError::Parse` for malformed JSON and
    /// `PaletteError::InvalidColor` for a bad color value.
    pub fn from_json(json: &str) -> Result<Self, PaletteError> {
        let document: PaletteDocument = serde_json::from_str(json)?;
        let default_color = document
            .default_color
            .unwrap_or_else(|| DEFAULT_COLOR.to_owned());
        Self::new(document.colors, &default_color)
    }

    /// Color for a reform type name; the default color when the palette has
    /// no entry for it.
    #[must_use]
    pub fn color_for(&self, type_name: &str) -> &str {
        self.colors
            .get(type_name)
            .map_or(self.default_color.as_str(), String::as_str)
    }

    /// The fallback color.
    #[must_use]
    pub fn default_color(&self) -> &str {
        &self.default_color
    }

    /// Every reform category in display order, with its resolved color.
    #[must_use]
    pub fn entries(&self) -> Vec<PaletteEntry> {
        ReformType::ALL
            .into_iter()
            .map(|reform_type| PaletteEntry {
                reform_type,
                color: self.color_for(reform_type.as_str()).to_owned(),
            })
            .collect()
    }
}

fn check_color(name: &str, color: &str) -> Result<(), PaletteError> {
    let valid = color
        .strip_prefix('#')
        .is_some_and(|hex| matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()));
    if valid {
        Ok(())
    } else {
        Err(PaletteError::InvalidColor {
            name: name.to_owned(),
            color: color.to_owned(),
        })
    }
}
