//! Completeness and plausibility policy for captured fields.
//!
//! Price, total area, bathrooms and address are sacred: they are never
//! fabricated by extraction, and an implausible value blocks completeness
//! even when the field is nominally present. Missing nice-to-have fields
//! only produce warnings and never block progression.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

use super::fields::{Currency, ListingFields};

/// Plausible price bounds per currency (Chilean market).
const PRICE_RANGE_CLP: (f64, f64) = (10_000_000.0, 50_000_000_000.0);
const PRICE_RANGE_UF: (f64, f64) = (500.0, 100_000.0);
const PRICE_RANGE_USD: (f64, f64) = (10_000.0, 50_000_000.0);

/// Plausible surface bounds in m².
const AREA_RANGE_M2: (f64, f64) = (10.0, 10_000.0);

/// Plausible bound for room-like counts (bathrooms, bedrooms, parking).
const MAX_ROOM_COUNT: u32 = 20;

/// The fields a capture cannot be published without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequiredField {
    Price,
    Area,
    Bathrooms,
    Address,
}

/// All required fields, in prompt order.
pub const REQUIRED_FIELDS: [RequiredField; 4] = [
    RequiredField::Price,
    RequiredField::Area,
    RequiredField::Bathrooms,
    RequiredField::Address,
];

impl RequiredField {
    /// Stable machine name.
    pub fn name(&self) -> &'static str {
        match self {
            RequiredField::Price => "price",
            RequiredField::Area => "area",
            RequiredField::Bathrooms => "bathrooms",
            RequiredField::Address => "address",
        }
    }

    /// Spanish label used when prompting the broker.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Price => "precio",
            RequiredField::Area => "superficie",
            RequiredField::Bathrooms => "baños",
            RequiredField::Address => "dirección",
        }
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Returns the required fields that are still absent.
pub fn compute_missing(fields: &ListingFields) -> BTreeSet<RequiredField> {
    let mut missing = BTreeSet::new();

    if !fields.price.is_present() {
        missing.insert(RequiredField::Price);
    }
    if !fields.area.is_present() {
        missing.insert(RequiredField::Area);
    }
    if fields.bathrooms.is_none() {
        missing.insert(RequiredField::Bathrooms);
    }
    if !fields.address.is_present() {
        missing.insert(RequiredField::Address);
    }

    missing
}

/// Outcome of a plausibility pass over the captured fields.
///
/// Errors block completeness; warnings are advisory only.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// True when no blocking errors were found.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Range-checks every present sacred value and flags missing
/// nice-to-have fields.
pub fn validate(fields: &ListingFields) -> ValidationReport {
    let mut report = ValidationReport::default();

    if let Some(amount) = fields.price.amount {
        // A present amount with no currency is treated as CLP.
        let currency = fields.price.currency.unwrap_or(Currency::Clp);
        let (min, max) = match currency {
            Currency::Clp => PRICE_RANGE_CLP,
            Currency::Uf => PRICE_RANGE_UF,
            Currency::Usd => PRICE_RANGE_USD,
        };
        if amount < min || amount > max {
            report
                .errors
                .push(ValidationError::out_of_range("price", min, max, amount));
        }
    }

    if let Some(total) = fields.area.total {
        let (min, max) = AREA_RANGE_M2;
        if total < min || total > max {
            report
                .errors
                .push(ValidationError::out_of_range("area.total", min, max, total));
        }
    }

    for (name, count) in [
        ("bathrooms", fields.bathrooms),
        ("bedrooms", fields.bedrooms),
        ("parking_spots", fields.parking_spots),
    ] {
        if let Some(count) = count {
            if count > MAX_ROOM_COUNT {
                report.errors.push(ValidationError::out_of_range(
                    name,
                    0.0,
                    MAX_ROOM_COUNT as f64,
                    count as f64,
                ));
            }
        }
    }

    if fields.address.district.is_none() {
        report.warnings.push("no district detected".to_string());
    }
    if fields.bedrooms.is_none() {
        report.warnings.push("no bedroom count detected".to_string());
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::fields::{Address, Area, Price};

    #[test]
    fn compute_missing_reports_absent_sacred_fields() {
        let fields = ListingFields {
            area: Area {
                total: Some(80.0),
                usable: None,
            },
            bathrooms: Some(2),
            ..Default::default()
        };

        let missing = compute_missing(&fields);

        assert_eq!(
            missing.into_iter().collect::<Vec<_>>(),
            vec![RequiredField::Price, RequiredField::Address]
        );
    }

    #[test]
    fn compute_missing_is_empty_when_all_present() {
        let fields = ListingFields {
            price: Price {
                amount: Some(3500.0),
                currency: Some(Currency::Uf),
            },
            area: Area {
                total: Some(60.0),
                usable: None,
            },
            bathrooms: Some(1),
            address: Address {
                street: Some("Av. Italia".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(compute_missing(&fields).is_empty());
    }

    #[test]
    fn plausible_clp_price_passes() {
        let fields = ListingFields {
            price: Price {
                amount: Some(2_500_000_000.0),
                currency: Some(Currency::Clp),
            },
            area: Area {
                total: Some(80.0),
                usable: None,
            },
            ..Default::default()
        };

        let report = validate(&fields);
        assert!(report.is_ok(), "unexpected errors: {:?}", report.errors);
    }

    #[test]
    fn implausible_clp_price_is_an_error() {
        let fields = ListingFields {
            price: Price {
                amount: Some(500.0),
                currency: Some(Currency::Clp),
            },
            ..Default::default()
        };

        let report = validate(&fields);
        assert!(!report.is_ok());
        assert!(report.errors[0].to_string().contains("price"));
    }

    #[test]
    fn price_without_currency_is_checked_as_clp() {
        let fields = ListingFields {
            price: Price {
                amount: Some(3500.0),
                currency: None,
            },
            ..Default::default()
        };

        // 3500 would be fine in UF but is implausible in CLP.
        let report = validate(&fields);
        assert!(!report.is_ok());
    }

    #[test]
    fn uf_price_uses_uf_bounds() {
        let fields = ListingFields {
            price: Price {
                amount: Some(3500.0),
                currency: Some(Currency::Uf),
            },
            ..Default::default()
        };

        assert!(validate(&fields).is_ok());
    }

    #[test]
    fn area_out_of_range_is_an_error() {
        let fields = ListingFields {
            area: Area {
                total: Some(5.0),
                usable: None,
            },
            ..Default::default()
        };

        let report = validate(&fields);
        assert!(!report.is_ok());
        assert!(report.errors[0].to_string().contains("area.total"));
    }

    #[test]
    fn absurd_room_count_is_an_error() {
        let fields = ListingFields {
            bathrooms: Some(42),
            ..Default::default()
        };

        let report = validate(&fields);
        assert!(!report.is_ok());
        assert!(report.errors[0].to_string().contains("bathrooms"));
    }

    #[test]
    fn missing_district_and_bedrooms_are_warnings_only() {
        let fields = ListingFields::default();

        let report = validate(&fields);
        assert!(report.is_ok());
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn absent_fields_are_not_range_checked() {
        let report = validate(&ListingFields::default());
        assert!(report.errors.is_empty());
    }
}
