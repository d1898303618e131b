//! The finished listing assembled from a completed capture.

use serde::{Deserialize, Serialize};

use crate::domain::capture::{CaptureRecord, ListingFields};
use crate::domain::foundation::{ListingId, Timestamp};

/// Lifecycle of a published listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Pending,
    Approved,
    Published,
    Paused,
    Sold,
}

/// Generated marketing copy for a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingCopy {
    /// Headline, at most 80 characters.
    pub title: String,
    pub description: String,
    pub hashtags: Vec<String>,
}

impl ListingCopy {
    /// Deterministic copy built from the captured fields alone, used when
    /// the generation collaborator is unavailable.
    pub fn fallback(fields: &ListingFields) -> Self {
        let kind = fields
            .kind
            .map(|k| k.label().to_string())
            .unwrap_or_else(|| "Propiedad".to_string());
        let district = fields.address.district.clone().unwrap_or_default();
        let m2 = fields
            .area
            .total
            .map(|t| format!(" | {}m²", t))
            .unwrap_or_default();

        let mut title = if district.is_empty() {
            format!("{}{}", kind, m2)
        } else {
            format!("{} en {}{}", kind, district, m2)
        };
        title.truncate(80);

        let mut parts = Vec::new();
        if let Some(bedrooms) = fields.bedrooms {
            parts.push(format!("{} dormitorios", bedrooms));
        }
        if let Some(bathrooms) = fields.bathrooms {
            parts.push(format!("{} baños", bathrooms));
        }
        if let Some(total) = fields.area.total {
            parts.push(format!("{}m² totales", total));
        }
        if let Some(parking) = fields.parking_spots {
            parts.push(format!("{} estacionamientos", parking));
        }
        let description = if parts.is_empty() {
            "Excelente propiedad.".to_string()
        } else {
            format!("Excelente propiedad con {}.", parts.join(", "))
        };

        Self {
            title,
            description,
            hashtags: vec![
                "#propiedades".to_string(),
                "#inmobiliaria".to_string(),
                "#chile".to_string(),
            ],
        }
    }
}

/// A listing ready to push to external catalogs.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub id: ListingId,
    pub fields: ListingFields,
    pub copy: ListingCopy,
    /// Photo references to publish, curation order.
    pub photos: Vec<String>,
    /// Neighborhood selling points ("A 350m de ...").
    pub usps: Vec<String>,
    pub status: ListingStatus,
    pub created_at: Timestamp,
}

impl Listing {
    /// Assembles a listing from a completed capture.
    pub fn from_capture(record: &CaptureRecord, copy: ListingCopy, usps: Vec<String>) -> Self {
        let photos = record
            .processed_photos()
            .iter()
            .map(|p| p.best_reference().as_str().to_string())
            .collect();

        Self {
            id: ListingId::new(),
            fields: record.fields().clone(),
            copy,
            photos,
            usps,
            status: ListingStatus::Pending,
            created_at: Timestamp::now(),
        }
    }
}

/// Result of pushing a listing to one destination catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicationOutcome {
    pub destination: String,
    pub success: bool,
    /// Destination-assigned id, when the push succeeded.
    pub id: Option<String>,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl PublicationOutcome {
    pub fn success(
        destination: impl Into<String>,
        id: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            success: true,
            id: Some(id.into()),
            url: Some(url.into()),
            error: None,
        }
    }

    pub fn failure(destination: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            success: false,
            id: None,
            url: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{Area, PropertyKind};

    #[test]
    fn fallback_copy_uses_captured_fields() {
        let fields = ListingFields {
            kind: Some(PropertyKind::Apartment),
            area: Area {
                total: Some(60.0),
                usable: None,
            },
            bedrooms: Some(2),
            bathrooms: Some(1),
            address: crate::domain::capture::Address {
                district: Some("Providencia".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        let copy = ListingCopy::fallback(&fields);
        assert_eq!(copy.title, "Departamento en Providencia | 60m²");
        assert!(copy.description.contains("2 dormitorios"));
        assert!(copy.description.contains("1 baños"));
        assert_eq!(copy.hashtags.len(), 3);
    }

    #[test]
    fn fallback_copy_handles_empty_fields() {
        let copy = ListingCopy::fallback(&ListingFields::default());
        assert_eq!(copy.title, "Propiedad");
        assert_eq!(copy.description, "Excelente propiedad.");
    }

    #[test]
    fn fallback_title_is_capped_at_80_chars() {
        let fields = ListingFields {
            address: crate::domain::capture::Address {
                district: Some("x".repeat(120)),
                ..Default::default()
            },
            ..Default::default()
        };

        let copy = ListingCopy::fallback(&fields);
        assert!(copy.title.len() <= 80);
    }

    #[test]
    fn outcome_constructors_fill_the_right_sides() {
        let ok = PublicationOutcome::success("prop360", "p-1", "https://prop360.cl/p/1");
        assert!(ok.success);
        assert_eq!(ok.id.as_deref(), Some("p-1"));
        assert!(ok.error.is_none());

        let failed = PublicationOutcome::failure("portal", "timeout");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("timeout"));
        assert!(failed.id.is_none());
    }

    #[test]
    fn listing_from_capture_prefers_enhanced_photos() {
        use crate::domain::capture::{CurationPolicy, PhotoCategory, ProcessedPhoto};
        use crate::domain::foundation::{BrokerId, ChannelAddress, MediaRef};

        let mut record = CaptureRecord::new(
            BrokerId::new("b1").unwrap(),
            ChannelAddress::new("569").unwrap(),
        );
        record.add_processed_photos(
            vec![ProcessedPhoto {
                reference: MediaRef::new("orig"),
                enhanced_reference: Some(MediaRef::new("enhanced")),
                category: PhotoCategory::Facade,
                score: 88.0,
                accepted: true,
            }],
            &CurationPolicy::default(),
        );

        let listing = Listing::from_capture(
            &record,
            ListingCopy::fallback(record.fields()),
            vec!["A 200m de Metro Los Leones".to_string()],
        );

        assert_eq!(listing.photos, vec!["enhanced".to_string()]);
        assert_eq!(listing.status, ListingStatus::Pending);
        assert_eq!(listing.usps.len(), 1);
    }
}
