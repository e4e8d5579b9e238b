//! # NCM Classifier
//!
//! Maps a tariff code to a product category and monophasic flag by
//! matching its leading digits against the configured pattern table.
//!
//! ## Precedence
//!
//! Rules are evaluated longest-prefix-first, so an 8-digit rule always
//! shadows a heading-level (4-digit) rule over the same digits. Ties in
//! length keep document order (stable sort), which makes the tie-break
//! deterministic and testable.
//!
//! No match is not an error: most NCMs are ordinary-regime goods and
//! classify to `category: None, is_monophasic: false`.

use dicalc_config::{CategoryRule, ConfigSnapshot};
use dicalc_core::{Classification, Ncm};

/// A pure lookup service over the category pattern table.
#[derive(Debug)]
pub struct Classifier<'a> {
    /// Rules sorted longest-prefix-first, stable on document order.
    rules: Vec<&'a CategoryRule>,
}

impl<'a> Classifier<'a> {
    /// Build a classifier over the snapshot's category table.
    pub fn new(snapshot: &'a ConfigSnapshot) -> Self {
        let mut rules: Vec<&CategoryRule> = snapshot.categories().iter().collect();
        rules.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
        Self { rules }
    }

    /// Classify one tariff code. First matching prefix wins.
    pub fn classify(&self, ncm: &Ncm) -> Classification {
        for rule in &self.rules {
            if ncm.has_prefix(&rule.prefix) {
                return Classification {
                    category: Some(rule.category),
                    is_monophasic: rule.monophasic,
                };
            }
        }
        Classification::ordinary()
    }
}
