//! Processed listing photos and the curation policy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::MediaRef;

/// What a listing photo shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhotoCategory {
    #[serde(rename = "fachada")]
    Facade,
    #[serde(rename = "living")]
    Living,
    #[serde(rename = "cocina")]
    Kitchen,
    #[serde(rename = "dormitorio")]
    Bedroom,
    #[serde(rename = "bano")]
    Bathroom,
    #[serde(rename = "terraza")]
    Terrace,
    #[serde(rename = "vista")]
    View,
    #[serde(rename = "plano")]
    FloorPlan,
    #[serde(rename = "otro")]
    Other,
}

/// Result of running one photo through the processing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedPhoto {
    /// Original media reference as received.
    pub reference: MediaRef,
    /// Enhanced version, when the collaborator produced one.
    pub enhanced_reference: Option<MediaRef>,
    pub category: PhotoCategory,
    /// Quality score, 0–100.
    pub score: f64,
    /// False when the collaborator rejected the photo (unsafe or
    /// sensitive content); rejected photos never reach the record.
    pub accepted: bool,
}

impl ProcessedPhoto {
    /// The reference to publish: enhanced when available.
    pub fn best_reference(&self) -> &MediaRef {
        self.enhanced_reference.as_ref().unwrap_or(&self.reference)
    }
}

/// Caps applied when selecting photos for publication.
#[derive(Debug, Clone, Copy)]
pub struct CurationPolicy {
    pub max_per_category: usize,
    pub max_total: usize,
}

impl Default for CurationPolicy {
    fn default() -> Self {
        Self {
            max_per_category: 2,
            max_total: 10,
        }
    }
}

/// Selects the best photos: descending score, capped per category and in
/// total. A photo already selected is never displaced by a later,
/// lower-scoring arrival, since selection always re-runs over the full
/// set in score order.
pub fn curate(mut photos: Vec<ProcessedPhoto>, policy: &CurationPolicy) -> Vec<ProcessedPhoto> {
    photos.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let mut per_category: std::collections::HashMap<PhotoCategory, usize> =
        std::collections::HashMap::new();
    let mut selected = Vec::new();

    for photo in photos {
        let count = per_category.entry(photo.category).or_insert(0);
        if *count < policy.max_per_category {
            *count += 1;
            selected.push(photo);

            if selected.len() >= policy.max_total {
                break;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, category: PhotoCategory, score: f64) -> ProcessedPhoto {
        ProcessedPhoto {
            reference: MediaRef::new(id),
            enhanced_reference: None,
            category,
            score,
            accepted: true,
        }
    }

    #[test]
    fn keeps_two_best_per_category() {
        let photos = vec![
            photo("k1", PhotoCategory::Kitchen, 90.0),
            photo("k2", PhotoCategory::Kitchen, 85.0),
            photo("k3", PhotoCategory::Kitchen, 80.0),
            photo("k4", PhotoCategory::Kitchen, 75.0),
            photo("k5", PhotoCategory::Kitchen, 70.0),
        ];

        let selected = curate(photos, &CurationPolicy::default());

        let ids: Vec<&str> = selected.iter().map(|p| p.reference.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k2"]);
    }

    #[test]
    fn caps_total_across_categories() {
        let mut photos = Vec::new();
        for (i, category) in [
            PhotoCategory::Facade,
            PhotoCategory::Living,
            PhotoCategory::Kitchen,
            PhotoCategory::Bedroom,
            PhotoCategory::Bathroom,
            PhotoCategory::Terrace,
            PhotoCategory::View,
        ]
        .iter()
        .enumerate()
        {
            photos.push(photo(&format!("a{}", i), *category, 90.0 - i as f64));
            photos.push(photo(&format!("b{}", i), *category, 80.0 - i as f64));
        }

        let selected = curate(photos, &CurationPolicy::default());
        assert_eq!(selected.len(), 10);
    }

    #[test]
    fn prefers_higher_scores_across_categories() {
        let photos = vec![
            photo("low", PhotoCategory::View, 40.0),
            photo("high", PhotoCategory::Kitchen, 95.0),
            photo("mid", PhotoCategory::Facade, 70.0),
        ];

        let selected = curate(photos, &CurationPolicy::default());

        let ids: Vec<&str> = selected.iter().map(|p| p.reference.as_str()).collect();
        assert_eq!(ids, vec!["high", "mid", "low"]);
    }

    #[test]
    fn earlier_arrival_wins_ties() {
        let photos = vec![
            photo("first", PhotoCategory::Kitchen, 80.0),
            photo("second", PhotoCategory::Kitchen, 80.0),
            photo("third", PhotoCategory::Kitchen, 80.0),
        ];

        let selected = curate(photos, &CurationPolicy::default());

        let ids: Vec<&str> = selected.iter().map(|p| p.reference.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[test]
    fn best_reference_prefers_enhanced() {
        let mut p = photo("orig", PhotoCategory::Living, 75.0);
        assert_eq!(p.best_reference().as_str(), "orig");

        p.enhanced_reference = Some(MediaRef::new("enhanced"));
        assert_eq!(p.best_reference().as_str(), "enhanced");
    }
}
