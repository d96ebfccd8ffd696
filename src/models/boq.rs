//! Bill-of-Quantities item model.
//!
//! A BOQ item is the unit of input: one priced line of construction work.
//! Items are supplied once per run and never mutated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::ConfigError;

/// A Bill-of-Quantities line item.
///
/// `specification` is optional free text (technical specification clause)
/// mined by the specification-text decomposer. When absent, the
/// description is used instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoqItem {
    /// Unique item identifier.
    pub id: String,
    /// Free-text line description (Arabic or English).
    pub description: String,
    /// Measured quantity (> 0).
    pub quantity: f64,
    /// Unit of measure (e.g. "m3", "m2", "ton").
    pub unit: String,
    /// Price per unit.
    pub unit_price: f64,
    /// Specification text, if the BOQ carries one.
    #[serde(default)]
    pub specification: Option<String>,
    /// Domain-specific key-value metadata.
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl BoqItem {
    /// Creates a new item.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            quantity,
            unit: unit.into(),
            unit_price: 0.0,
            specification: None,
            attributes: HashMap::new(),
        }
    }

    /// Sets the unit price.
    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = unit_price;
        self
    }

    /// Sets the specification text.
    pub fn with_specification(mut self, specification: impl Into<String>) -> Self {
        self.specification = Some(specification.into());
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Total line cost (quantity × unit price).
    pub fn total_cost(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Text mined by keyword rules: the specification if present and
    /// non-blank, else the description.
    pub fn specification_text(&self) -> &str {
        match self.specification.as_deref() {
            Some(spec) if !spec.trim().is_empty() => spec,
            _ => &self.description,
        }
    }

    /// Rejects quantities that are not positive and finite, and negative
    /// unit prices.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.quantity.is_finite() || self.quantity <= 0.0 {
            return Err(ConfigError::InvalidQuantity {
                item_id: self.id.clone(),
                quantity: self.quantity,
            });
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(ConfigError::NegativeUnitPrice {
                item_id: self.id.clone(),
                unit_price: self.unit_price,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_builder() {
        let item = BoqItem::new("B1", "Reinforced concrete columns", 50.0, "m3")
            .with_unit_price(1200.0)
            .with_specification("C30 concrete with rebar")
            .with_attribute("section", "Substructure");

        assert_eq!(item.id, "B1");
        assert_eq!(item.unit, "m3");
        assert!((item.total_cost() - 60_000.0).abs() < 1e-9);
        assert_eq!(item.specification_text(), "C30 concrete with rebar");
        assert_eq!(item.attributes.get("section"), Some(&"Substructure".to_string()));
    }

    #[test]
    fn test_specification_falls_back_to_description() {
        let item = BoqItem::new("B1", "Block work 20cm", 100.0, "m2");
        assert_eq!(item.specification_text(), "Block work 20cm");

        let blank = item.clone().with_specification("   ");
        assert_eq!(blank.specification_text(), "Block work 20cm");
    }

    #[test]
    fn test_validate() {
        assert!(BoqItem::new("B1", "Paint", 10.0, "m2").validate().is_ok());
        assert_eq!(
            BoqItem::new("B2", "Paint", 0.0, "m2").validate(),
            Err(ConfigError::InvalidQuantity {
                item_id: "B2".into(),
                quantity: 0.0
            })
        );
        assert!(BoqItem::new("B3", "Paint", -4.0, "m2").validate().is_err());
        assert!(BoqItem::new("B4", "Paint", f64::NAN, "m2").validate().is_err());
        assert!(matches!(
            BoqItem::new("B5", "Paint", 1.0, "m2").with_unit_price(-1.0).validate(),
            Err(ConfigError::NegativeUnitPrice { .. })
        ));
    }

    #[test]
    fn test_deserialize_without_optional_fields() {
        let json = r#"{"id":"B7","description":"Paint","quantity":10.0,"unit":"m2","unit_price":5.0}"#;
        let item: BoqItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.specification, None);
        assert!(item.attributes.is_empty());
    }
}
