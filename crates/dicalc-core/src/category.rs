//! # Product Categories
//!
//! The closed set of NCM-derived product categories the engine knows
//! about, and the `Classification` record the classifier attaches to a
//! product.
//!
//! A product outside every category is ordinary-regime goods: it
//! classifies to `category: None, is_monophasic: false`, which is not an
//! error.

use serde::{Deserialize, Serialize};

/// An NCM-derived product category.
///
/// Categories exist to drive tax treatment (monophasic PIS/COFINS,
/// vedation reporting); they are not a full nomenclature taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    /// Fuels and petroleum derivatives (chapter 27 headings 2710/2711).
    PetroleumDerivatives,
    /// Medicaments and pharmaceutical preparations (3003/3004).
    Pharmaceuticals,
    /// Perfumery, cosmetics and personal hygiene (3303-3307).
    Cosmetics,
    /// Beverages: waters, soft drinks, beer (2201-2203).
    Beverages,
    /// Auto parts: tyres and listed components (4011, 4013).
    AutoParts,
    /// Road vehicles (chapter 87 headings 8701-8703).
    Vehicles,
    /// Industrial machinery (8429, 8433).
    Machinery,
    /// Telecom and electronic equipment (8517).
    Electronics,
    /// Optical and measuring instruments (9013).
    OpticalInstruments,
    /// Arms and ammunition (chapter 93).
    ArmsAndAmmunition,
}

impl ProductCategory {
    /// The snake_case identifier, matching the serde wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PetroleumDerivatives => "petroleum_derivatives",
            Self::Pharmaceuticals => "pharmaceuticals",
            Self::Cosmetics => "cosmetics",
            Self::Beverages => "beverages",
            Self::AutoParts => "auto_parts",
            Self::Vehicles => "vehicles",
            Self::Machinery => "machinery",
            Self::Electronics => "electronics",
            Self::OpticalInstruments => "optical_instruments",
            Self::ArmsAndAmmunition => "arms_and_ammunition",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classifier's verdict for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    /// Matched category, or `None` for ordinary-regime goods.
    pub category: Option<ProductCategory>,
    /// Whether PIS/COFINS is collected single-phase for this product.
    pub is_monophasic: bool,
}

impl Classification {
    /// The classification of ordinary-regime goods (no category match).
    pub fn ordinary() -> Self {
        Self {
            category: None,
            is_monophasic: false,
        }
    }
}
