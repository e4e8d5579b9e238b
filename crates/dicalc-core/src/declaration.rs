//! # Import Declaration Data Model
//!
//! The Declaration → Addition → Product hierarchy as received from the
//! upstream parsing collaborator. Records are constructed once and never
//! mutated except to attach derived fields (classification, cost layers)
//! computed by the engine.
//!
//! ## Invariant
//!
//! Monetary fields arrive as `Option<Decimal>` because upstream sources
//! can omit them. Every computation resolves an amount through a checked
//! accessor: absence fails with [`EngineError::MissingField`] naming the
//! field and the addition, negatives fail with `InvalidAmount`. Nothing
//! is ever defaulted to zero.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::category::Classification;
use crate::error::EngineError;
use crate::layers::CostLayers;
use crate::money::require_amount;
use crate::ncm::Ncm;
use crate::tax::TaxKind;
use crate::uf::Uf;

/// The importer of record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Importer {
    /// Corporate name.
    pub name: String,
    /// Tax id (CNPJ), digits as issued.
    pub cnpj: String,
    /// State of establishment.
    pub uf: Uf,
}

/// A customs import declaration: one header, N additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Registry number of the declaration.
    pub numero_di: String,
    /// The importer of record.
    pub importer: Importer,
    /// Registration date at the customs registry.
    pub registered_on: NaiveDate,
    /// The declared import lines, in declaration order.
    pub additions: Vec<Addition>,
}

/// A declared import line (adição).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Addition {
    /// Sequential number within the declaration (1-based).
    pub number: u32,
    /// Tariff classification of the line.
    pub ncm: Ncm,
    /// Customs value (VA) of the line.
    pub customs_value: Option<Decimal>,
    /// Freight allocated to the line.
    pub freight: Option<Decimal>,
    /// Insurance allocated to the line.
    pub insurance: Option<Decimal>,
    /// Apportioned customs expenses (registry fees, port handling).
    pub expenses: Option<Decimal>,
    /// Amount due per tax kind. All five kinds must be present, possibly
    /// zero, for cost computation.
    pub taxes: BTreeMap<TaxKind, Decimal>,
    /// Products declared under this line.
    pub products: Vec<Product>,
}

impl Addition {
    /// Identifier used in error reporting: `"adicao-003"`.
    pub fn id(&self) -> String {
        format!("adicao-{:03}", self.number)
    }

    /// Customs value, required.
    pub fn customs_value(&self) -> Result<Decimal, EngineError> {
        require_amount(self.customs_value, "customs_value", &self.id())
    }

    /// Apportioned customs expenses, required.
    pub fn expenses(&self) -> Result<Decimal, EngineError> {
        require_amount(self.expenses, "expenses", &self.id())
    }

    /// Amount due for one tax kind, required.
    ///
    /// A tax absent from the map is a hard error — a declaration that
    /// never reached assessment for a kind must say so upstream with an
    /// explicit zero.
    pub fn tax(&self, kind: TaxKind) -> Result<Decimal, EngineError> {
        require_amount(self.taxes.get(&kind).copied(), kind.as_str(), &self.id())
    }

    /// Sum of all products' declared value (unit price × quantity).
    ///
    /// Used to apportion the addition's rateable amounts across products.
    pub fn declared_products_value(&self) -> Result<Decimal, EngineError> {
        let mut total = Decimal::ZERO;
        for product in &self.products {
            total += product.value(&self.id())?;
        }
        Ok(total)
    }
}

/// A product declared under an addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Sequence within the addition (1-based).
    pub sequence: u32,
    /// Commercial description.
    pub description: String,
    /// Tariff classification; usually equals the addition's NCM but may
    /// be more specific.
    pub ncm: Ncm,
    /// Declared unit price.
    pub unit_price: Option<Decimal>,
    /// Declared quantity.
    pub quantity: Option<Decimal>,
    /// Attached by the classifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<Classification>,
    /// Attached by the cost engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_layers: Option<CostLayers>,
}

impl Product {
    /// Identifier used in error reporting: `"adicao-003/produto-02"`.
    pub fn id(&self, addition_id: &str) -> String {
        format!("{addition_id}/produto-{:02}", self.sequence)
    }

    /// Declared value of the product: unit price × quantity, both required.
    pub fn value(&self, addition_id: &str) -> Result<Decimal, EngineError> {
        let id = self.id(addition_id);
        let unit_price = require_amount(self.unit_price, "unit_price", &id)?;
        let quantity = require_amount(self.quantity, "quantity", &id)?;
        Ok(unit_price * quantity)
    }
}
