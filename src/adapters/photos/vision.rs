//! Vision Photo Processor - classification, scoring and screening via the
//! Google Vision API.
//!
//! A photo is rejected (never merged into the capture) when safe-search
//! flags it or when it contains sensitive text such as license plates or
//! RUT numbers. Faces only produce a log warning.

use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::capture::{PhotoCategory, ProcessedPhoto};
use crate::domain::foundation::MediaRef;
use crate::ports::{PhotoProcessingError, PhotoProcessor};

/// License plates (Chilean format) and RUT numbers.
static SENSITIVE_TEXT: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"[A-Z]{2,4}[\s-]?\d{2,4}").unwrap(),
        Regex::new(r"\d{1,2}\.\d{3}\.\d{3}-[0-9Kk]").unwrap(),
    ]
});

/// Category weight bonus for photos that classified into a real listing
/// category rather than "other".
const CATEGORY_WEIGHT: f64 = 1.2;

/// Configuration for the Vision processor.
#[derive(Debug, Clone)]
pub struct VisionConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl VisionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://vision.googleapis.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Vision-API-backed photo collaborator.
pub struct VisionPhotoProcessor {
    config: VisionConfig,
    client: Client,
}

impl VisionPhotoProcessor {
    pub fn new(config: VisionConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn annotate_url(&self) -> String {
        format!("{}/v1/images:annotate", self.config.base_url)
    }

    async fn annotate(&self, media: &MediaRef) -> Result<AnnotateResult, PhotoProcessingError> {
        let request = AnnotateRequest {
            requests: vec![ImageRequest {
                image: ImageSource {
                    source: Uri {
                        image_uri: media.as_str().to_string(),
                    },
                },
                features: vec![
                    Feature::new("LABEL_DETECTION", 10),
                    Feature::new("SAFE_SEARCH_DETECTION", 1),
                    Feature::new("TEXT_DETECTION", 1),
                    Feature::new("FACE_DETECTION", 5),
                    Feature::new("IMAGE_PROPERTIES", 1),
                    Feature::new("CROP_HINTS", 1),
                ],
            }],
        };

        let response = self
            .client
            .post(self.annotate_url())
            .header("x-goog-api-key", self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| PhotoProcessingError::unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PhotoProcessingError::unavailable(format!(
                "status {}: {}",
                status, message
            )));
        }

        let mut body: AnnotateResponse = response
            .json()
            .await
            .map_err(|e| PhotoProcessingError::unparsable(e.to_string()))?;

        let first = body
            .responses
            .drain(..)
            .next()
            .ok_or_else(|| PhotoProcessingError::unparsable("empty annotate response"));
        first
    }
}

#[async_trait]
impl PhotoProcessor for VisionPhotoProcessor {
    async fn process(&self, media: &MediaRef) -> Result<ProcessedPhoto, PhotoProcessingError> {
        let annotations = self.annotate(media).await?;

        // Screening first: an unsafe or sensitive photo is rejected
        // regardless of quality.
        if let Some(reason) = screening_rejection(&annotations) {
            warn!(media = %media, reason, "photo rejected");
            return Ok(ProcessedPhoto {
                reference: media.clone(),
                enhanced_reference: None,
                category: PhotoCategory::Other,
                score: 0.0,
                accepted: false,
            });
        }

        if !annotations.face_annotations.is_empty() {
            // Advisory only, matching the capture policy.
            warn!(
                media = %media,
                faces = annotations.face_annotations.len(),
                "photo contains identifiable faces"
            );
        }

        let (category, confidence) = classify(&annotations.label_annotations);
        let quality = quality_score(&annotations);
        let score = photo_score(category, confidence, quality);

        debug!(media = %media, ?category, score, "photo processed");

        Ok(ProcessedPhoto {
            reference: media.clone(),
            enhanced_reference: None,
            category,
            score,
            accepted: true,
        })
    }
}

/// Maps Vision labels onto listing categories, best label wins.
fn classify(labels: &[LabelAnnotation]) -> (PhotoCategory, f64) {
    for label in labels {
        let description = label.description.to_lowercase();
        let category = match description.as_str() {
            d if d.contains("kitchen") => Some(PhotoCategory::Kitchen),
            d if d.contains("bathroom") => Some(PhotoCategory::Bathroom),
            d if d.contains("bedroom") => Some(PhotoCategory::Bedroom),
            d if d.contains("living") => Some(PhotoCategory::Living),
            d if d.contains("facade") || d.contains("house") || d.contains("building") => {
                Some(PhotoCategory::Facade)
            }
            d if d.contains("balcony") || d.contains("terrace") || d.contains("patio") => {
                Some(PhotoCategory::Terrace)
            }
            d if d.contains("skyline") || d.contains("view") || d.contains("landscape") => {
                Some(PhotoCategory::View)
            }
            d if d.contains("floor plan") || d.contains("blueprint") || d.contains("diagram") => {
                Some(PhotoCategory::FloorPlan)
            }
            _ => None,
        };

        if let Some(category) = category {
            return (category, label.score);
        }
    }

    let confidence = labels.first().map(|l| l.score).unwrap_or(0.0);
    (PhotoCategory::Other, confidence)
}

/// Technical quality from brightness and framing, 0–100.
///
/// Vision exposes no direct sharpness signal, so quality blends the
/// dominant-color luminance with the crop-hint confidence.
fn quality_score(annotations: &AnnotateResult) -> f64 {
    let brightness = annotations
        .image_properties_annotation
        .as_ref()
        .map(|p| luminance_score(&p.dominant_colors.colors))
        .unwrap_or(50.0);

    let composition = annotations
        .crop_hints_annotation
        .as_ref()
        .and_then(|c| c.crop_hints.first())
        .map(|h| h.confidence * 100.0)
        .unwrap_or(50.0);

    brightness * 0.5 + composition * 0.5
}

/// Pixel-fraction-weighted luminance, penalizing very dark and very
/// blown-out photos symmetrically.
fn luminance_score(colors: &[ColorInfo]) -> f64 {
    let mut weighted = 0.0;
    let mut fraction = 0.0;

    for info in colors {
        let luminance =
            0.299 * info.color.red + 0.587 * info.color.green + 0.114 * info.color.blue;
        weighted += luminance * info.pixel_fraction as f64;
        fraction += info.pixel_fraction as f64;
    }

    if fraction == 0.0 {
        return 50.0;
    }

    let mean = weighted / fraction / 255.0;
    (1.0 - 2.0 * (mean - 0.5).abs()) * 100.0
}

fn photo_score(category: PhotoCategory, confidence: f64, quality: f64) -> f64 {
    let weight = if category != PhotoCategory::Other {
        CATEGORY_WEIGHT
    } else {
        1.0
    };
    ((confidence * 40.0 + quality * 0.6) * weight).clamp(0.0, 100.0)
}

/// Returns the rejection reason, if any.
fn screening_rejection(annotations: &AnnotateResult) -> Option<&'static str> {
    if let Some(safe) = &annotations.safe_search_annotation {
        if safe.adult.is_likely() || safe.violence.is_likely() {
            return Some("inappropriate content");
        }
    }

    for text in &annotations.text_annotations {
        for pattern in SENSITIVE_TEXT.iter() {
            if pattern.is_match(&text.description) {
                return Some("sensitive text");
            }
        }
    }

    None
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: ImageSource,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageSource {
    source: Uri,
}

#[derive(Debug, Serialize)]
struct Uri {
    #[serde(rename = "imageUri")]
    image_uri: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "maxResults")]
    max_results: u32,
}

impl Feature {
    fn new(kind: &str, max_results: u32) -> Self {
        Self {
            kind: kind.to_string(),
            max_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResult {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    #[serde(default)]
    text_annotations: Vec<TextAnnotation>,
    #[serde(default)]
    face_annotations: Vec<serde_json::Value>,
    safe_search_annotation: Option<SafeSearchAnnotation>,
    image_properties_annotation: Option<ImageProperties>,
    crop_hints_annotation: Option<CropHintsAnnotation>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct SafeSearchAnnotation {
    #[serde(default)]
    adult: Likelihood,
    #[serde(default)]
    violence: Likelihood,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
enum Likelihood {
    #[default]
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "VERY_UNLIKELY")]
    VeryUnlikely,
    #[serde(rename = "UNLIKELY")]
    Unlikely,
    #[serde(rename = "POSSIBLE")]
    Possible,
    #[serde(rename = "LIKELY")]
    Likely,
    #[serde(rename = "VERY_LIKELY")]
    VeryLikely,
}

impl Likelihood {
    fn is_likely(&self) -> bool {
        matches!(self, Likelihood::Likely | Likelihood::VeryLikely)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: DominantColors,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ColorInfo {
    color: Color,
    #[serde(default)]
    pixel_fraction: f32,
}

#[derive(Debug, Default, Deserialize)]
struct Color {
    #[serde(default)]
    red: f64,
    #[serde(default)]
    green: f64,
    #[serde(default)]
    blue: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CropHintsAnnotation {
    #[serde(default)]
    crop_hints: Vec<CropHint>,
}

#[derive(Debug, Deserialize)]
struct CropHint {
    #[serde(default)]
    confidence: f64,
}
