//! Listing attribute tree built up across conversation turns.
//!
//! Every leaf is optional: extraction collaborators report `null` for
//! anything not explicitly mentioned, and the merge engine folds successive
//! partial extractions into one record. A present leaf is never regressed
//! to absent by a later merge.

use serde::{Deserialize, Serialize};

/// Structural merge of a partial value into an existing one.
///
/// Leaves overwrite only when the incoming side is present; groups recurse.
/// Merging the same partial twice is equivalent to merging it once.
pub trait Merge {
    fn merge_from(&mut self, incoming: Self);
}

impl<T> Merge for Option<T> {
    fn merge_from(&mut self, incoming: Self) {
        if incoming.is_some() {
            *self = incoming;
        }
    }
}

impl<T> Merge for Vec<T> {
    // A list is a leaf: a non-empty incoming list replaces, an empty one
    // never erases what was already captured.
    fn merge_from(&mut self, incoming: Self) {
        if !incoming.is_empty() {
            *self = incoming;
        }
    }
}

/// Kind of property being captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "departamento")]
    Apartment,
    #[serde(rename = "casa")]
    House,
    #[serde(rename = "oficina")]
    Office,
    #[serde(rename = "terreno")]
    Land,
    #[serde(rename = "local")]
    Commercial,
    #[serde(rename = "bodega")]
    Warehouse,
    #[serde(rename = "estacionamiento")]
    Parking,
}

impl PropertyKind {
    /// Human-readable Spanish label, as used in generated listing copy.
    pub fn label(&self) -> &'static str {
        match self {
            PropertyKind::Apartment => "Departamento",
            PropertyKind::House => "Casa",
            PropertyKind::Office => "Oficina",
            PropertyKind::Land => "Terreno",
            PropertyKind::Commercial => "Local",
            PropertyKind::Warehouse => "Bodega",
            PropertyKind::Parking => "Estacionamiento",
        }
    }
}

/// Sale vs. rental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    #[serde(rename = "venta")]
    Sale,
    #[serde(rename = "arriendo")]
    Rent,
}

/// Currency a price was quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Clp,
    Uf,
    Usd,
}

/// Asking price. Currency stays absent until explicitly mentioned;
/// validation assumes CLP for a present amount with no currency.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Price {
    pub amount: Option<f64>,
    pub currency: Option<Currency>,
}

impl Price {
    /// A price satisfies the requirement once an amount is known.
    pub fn is_present(&self) -> bool {
        self.amount.is_some()
    }
}

impl Merge for Price {
    fn merge_from(&mut self, incoming: Self) {
        self.amount.merge_from(incoming.amount);
        self.currency.merge_from(incoming.currency);
    }
}

/// Surface in square meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Area {
    pub total: Option<f64>,
    pub usable: Option<f64>,
}

impl Area {
    /// The area requirement is on the total surface.
    pub fn is_present(&self) -> bool {
        self.total.is_some()
    }
}

impl Merge for Area {
    fn merge_from(&mut self, incoming: Self) {
        self.total.merge_from(incoming.total);
        self.usable.merge_from(incoming.usable);
    }
}

/// Geographic coordinates shared as a location pin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Street address, filled in from extraction or a shared pin.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub district: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Address {
    /// The address requirement is satisfied by a usable location anchor:
    /// either a street name or coordinates. District alone is not enough.
    pub fn is_present(&self) -> bool {
        self.street.is_some() || self.coordinates.is_some()
    }
}

impl Merge for Address {
    fn merge_from(&mut self, incoming: Self) {
        self.street.merge_from(incoming.street);
        self.number.merge_from(incoming.number);
        self.district.merge_from(incoming.district);
        self.coordinates.merge_from(incoming.coordinates);
    }
}

/// Everything known so far about the property under capture.
///
/// Grows monotonically in coverage; individual leaves may be overwritten
/// by later, more specific extractions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingFields {
    pub kind: Option<PropertyKind>,
    pub operation: Option<OperationKind>,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub area: Area,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub parking_spots: Option<u32>,
    pub storage: Option<bool>,
    #[serde(default)]
    pub address: Address,
    pub summary: Option<String>,
    #[serde(default)]
    pub selling_points: Vec<String>,
}

impl Merge for ListingFields {
    fn merge_from(&mut self, incoming: Self) {
        self.kind.merge_from(incoming.kind);
        self.operation.merge_from(incoming.operation);
        self.price.merge_from(incoming.price);
        self.area.merge_from(incoming.area);
        self.bedrooms.merge_from(incoming.bedrooms);
        self.bathrooms.merge_from(incoming.bathrooms);
        self.parking_spots.merge_from(incoming.parking_spots);
        self.storage.merge_from(incoming.storage);
        self.address.merge_from(incoming.address);
        self.summary.merge_from(incoming.summary);
        self.selling_points.merge_from(incoming.selling_points);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields_with_price(amount: f64, currency: Currency) -> ListingFields {
        ListingFields {
            price: Price {
                amount: Some(amount),
                currency: Some(currency),
            },
            ..Default::default()
        }
    }

    #[test]
    fn absent_leaf_never_overwrites_present_value() {
        let mut existing = fields_with_price(3500.0, Currency::Uf);
        existing.bathrooms = Some(2);

        let incoming = ListingFields {
            bedrooms: Some(3),
            ..Default::default()
        };

        existing.merge_from(incoming);

        assert_eq!(existing.price.amount, Some(3500.0));
        assert_eq!(existing.price.currency, Some(Currency::Uf));
        assert_eq!(existing.bathrooms, Some(2));
        assert_eq!(existing.bedrooms, Some(3));
    }

    #[test]
    fn later_specific_value_wins() {
        let mut existing = fields_with_price(3500.0, Currency::Uf);

        let correction = fields_with_price(3200.0, Currency::Uf);
        existing.merge_from(correction);

        assert_eq!(existing.price.amount, Some(3200.0));
    }

    #[test]
    fn nested_groups_merge_per_leaf() {
        let mut existing = ListingFields {
            address: Address {
                street: Some("Av. Providencia".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let incoming = ListingFields {
            address: Address {
                district: Some("Providencia".to_string()),
                coordinates: Some(Coordinates {
                    lat: -33.43,
                    lng: -70.61,
                }),
                ..Default::default()
            },
            ..Default::default()
        };

        existing.merge_from(incoming);

        assert_eq!(existing.address.street.as_deref(), Some("Av. Providencia"));
        assert_eq!(existing.address.district.as_deref(), Some("Providencia"));
        assert!(existing.address.coordinates.is_some());
    }

    #[test]
    fn merge_is_idempotent() {
        let incoming = ListingFields {
            bathrooms: Some(1),
            area: Area {
                total: Some(60.0),
                usable: None,
            },
            selling_points: vec!["vista despejada".to_string()],
            ..Default::default()
        };

        let mut once = ListingFields::default();
        once.merge_from(incoming.clone());

        let mut twice = once.clone();
        twice.merge_from(incoming);

        assert_eq!(once, twice);
    }

    #[test]
    fn empty_list_does_not_erase_selling_points() {
        let mut existing = ListingFields {
            selling_points: vec!["cerca del metro".to_string()],
            ..Default::default()
        };

        existing.merge_from(ListingFields::default());

        assert_eq!(existing.selling_points, vec!["cerca del metro".to_string()]);
    }

    #[test]
    fn address_presence_requires_anchor() {
        let mut address = Address::default();
        assert!(!address.is_present());

        address.district = Some("Ñuñoa".to_string());
        assert!(!address.is_present());

        address.street = Some("Irarrázaval".to_string());
        assert!(address.is_present());

        let pin_only = Address {
            coordinates: Some(Coordinates {
                lat: -33.45,
                lng: -70.66,
            }),
            ..Default::default()
        };
        assert!(pin_only.is_present());
    }

    #[test]
    fn deserializes_with_missing_groups() {
        let fields: ListingFields = serde_json::from_str(r#"{"bathrooms": 2}"#).unwrap();
        assert_eq!(fields.bathrooms, Some(2));
        assert!(fields.price.amount.is_none());
        assert!(fields.address.street.is_none());
    }

    #[test]
    fn property_kind_uses_spanish_wire_names() {
        let json = serde_json::to_string(&PropertyKind::Apartment).unwrap();
        assert_eq!(json, "\"departamento\"");
        let parsed: PropertyKind = serde_json::from_str("\"casa\"").unwrap();
        assert_eq!(parsed, PropertyKind::House);
    }

    #[test]
    fn currency_uses_uppercase_wire_names() {
        assert_eq!(serde_json::to_string(&Currency::Uf).unwrap(), "\"UF\"");
        let parsed: Currency = serde_json::from_str("\"CLP\"").unwrap();
        assert_eq!(parsed, Currency::Clp);
    }
}
