//! # Calculation Session — Declaration Orchestrator
//!
//! Walks a whole declaration: classifies every product, computes
//! per-product cost layers (value-share apportioned within each
//! addition), aggregates per-addition subtotals and declaration totals,
//! and attaches the NF deferral fields per addition when an incentive
//! program is requested and passes eligibility.
//!
//! The eligibility report is part of the output either way — an
//! ineligible program is reported, never silently dropped.
//!
//! Session-level processing runs with zero cost adjustments; callers
//! that supply per-product financial charges or margins use
//! [`compute_layers`] directly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use dicalc_config::ConfigSnapshot;
use dicalc_core::{
    Addition, Classification, CostLayers, Declaration, EngineError, Ncm, TaxRegime,
};

use crate::classify::Classifier;
use crate::cost::{compute_layers, CostAdjustments};
use crate::incentive::{EligibilityReport, IncentiveService, NfFields};

/// Computed costs for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCosts {
    /// Product sequence within its addition.
    pub sequence: u32,
    /// The product's tariff code.
    pub ncm: Ncm,
    /// Classifier verdict.
    pub classification: Classification,
    /// Fraction of the addition's totals attributed to this product.
    pub share: Decimal,
    /// The four cost layers, full precision.
    pub layers: CostLayers,
}

/// Computed costs for one addition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionCosts {
    /// Addition number within the declaration.
    pub number: u32,
    /// The addition's tariff code.
    pub ncm: Ncm,
    /// Per-product breakdown, in declaration order.
    pub products: Vec<ProductCosts>,
    /// Sum of the product layers (equals the addition's own layers
    /// within a cent).
    pub subtotal: CostLayers,
    /// Deferral fields, attached when a program was requested and
    /// eligibility passed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nf_fields: Option<NfFields>,
}

/// The outbound record for a whole declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationCosts {
    /// Registry number of the declaration.
    pub numero_di: String,
    /// Regime the costs were computed under.
    pub regime: TaxRegime,
    /// Eligibility report, present when a program was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<EligibilityReport>,
    /// Per-addition breakdown, in declaration order.
    pub additions: Vec<AdditionCosts>,
    /// Declaration-wide totals, full precision.
    pub totals: CostLayers,
}

/// Stateless orchestrator over one snapshot and one regime.
#[derive(Debug)]
pub struct CalculationSession<'a> {
    classifier: Classifier<'a>,
    incentives: IncentiveService<'a>,
    regime: TaxRegime,
}

impl<'a> CalculationSession<'a> {
    /// Build a session for a regime over a configuration snapshot.
    pub fn new(snapshot: &'a ConfigSnapshot, regime: TaxRegime) -> Self {
        Self {
            classifier: Classifier::new(snapshot),
            incentives: IncentiveService::new(snapshot),
            regime,
        }
    }

    /// Process a whole declaration.
    ///
    /// When `program_code` is given, eligibility is checked over every
    /// product NCM in the declaration against the importer-state
    /// program; NF fields are attached per addition only when the check
    /// passes.
    pub fn process(
        &self,
        declaration: &Declaration,
        program_code: Option<&str>,
    ) -> Result<DeclarationCosts, EngineError> {
        let span =
            tracing::info_span!("process_declaration", numero_di = %declaration.numero_di);
        let _guard = span.enter();

        let eligibility = match program_code {
            Some(code) => Some(self.incentives.validate_eligibility(
                declaration.importer.uf,
                code,
                &declared_ncms(declaration),
            )?),
            None => None,
        };
        let apply_program = matches!(&eligibility, Some(report) if report.eligible);

        let mut additions = Vec::with_capacity(declaration.additions.len());
        let mut totals = CostLayers::zero();
        for addition in &declaration.additions {
            let computed = self.process_addition(addition, declaration, apply_program, program_code)?;
            totals.accumulate(&computed.subtotal);
            additions.push(computed);
        }

        tracing::info!(
            additions = additions.len(),
            base = %totals.base,
            "declaration processed"
        );

        Ok(DeclarationCosts {
            numero_di: declaration.numero_di.clone(),
            regime: self.regime,
            eligibility,
            additions,
            totals,
        })
    }

    /// Return a copy of the declaration with classification and cost
    /// layers attached to every product, for the persistence
    /// collaborator.
    pub fn annotate(&self, declaration: &Declaration) -> Result<Declaration, EngineError> {
        let costs = self.process(declaration, None)?;
        let mut annotated = declaration.clone();
        for (addition, computed) in annotated.additions.iter_mut().zip(&costs.additions) {
            for (product, product_costs) in addition.products.iter_mut().zip(&computed.products)
            {
                product.classification = Some(product_costs.classification);
                product.cost_layers = Some(product_costs.layers);
            }
        }
        Ok(annotated)
    }

    fn process_addition(
        &self,
        addition: &Addition,
        declaration: &Declaration,
        apply_program: bool,
        program_code: Option<&str>,
    ) -> Result<AdditionCosts, EngineError> {
        let mut products = Vec::with_capacity(addition.products.len());
        let mut subtotal = CostLayers::zero();

        if addition.products.is_empty() {
            // A line declared without a product breakdown is costed as a
            // single unit.
            let classification = self.classifier.classify(&addition.ncm);
            subtotal = compute_layers(
                addition,
                Decimal::ONE,
                self.regime,
                &classification,
                &CostAdjustments::default(),
            )?;
        } else {
            let total_value = addition.declared_products_value()?;
            if total_value.is_zero() {
                return Err(EngineError::InvalidAmount {
                    field: "declared_products_value".to_string(),
                    addition_id: addition.id(),
                    value: "0".to_string(),
                });
            }
            for product in &addition.products {
                let share = product.value(&addition.id())? / total_value;
                let classification = self.classifier.classify(&product.ncm);
                let layers = compute_layers(
                    addition,
                    share,
                    self.regime,
                    &classification,
                    &CostAdjustments::default(),
                )?;
                subtotal.accumulate(&layers);
                products.push(ProductCosts {
                    sequence: product.sequence,
                    ncm: product.ncm.clone(),
                    classification,
                    share,
                    layers,
                });
            }
        }

        let nf_fields = match (apply_program, program_code) {
            (true, Some(code)) => Some(self.incentives.calculate_nf_fields(
                addition,
                declaration.importer.uf,
                code,
            )?),
            _ => None,
        };

        Ok(AdditionCosts {
            number: addition.number,
            ncm: addition.ncm.clone(),
            products,
            subtotal,
            nf_fields,
        })
    }
}

/// Every product NCM in the declaration, falling back to the addition
/// NCM for lines without a product breakdown.
fn declared_ncms(declaration: &Declaration) -> Vec<Ncm> {
    let mut ncms = Vec::new();
    for addition in &declaration.additions {
        if addition.products.is_empty() {
            ncms.push(addition.ncm.clone());
        } else {
            for product in &addition.products {
                ncms.push(product.ncm.clone());
            }
        }
    }
    ncms
}
