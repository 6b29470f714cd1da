#![allow(dead_code)]

//! Core data model: generation requests and the typed results they produce.
//!
//! Requests and results are serde-tagged unions discriminated by `kind`.
//! Result field names are camelCase on the wire so JSON exported by the web
//! client round-trips unchanged.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// The three generator kinds. Wire values match the persisted history blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenerationKind {
    Resume,
    Poster,
    Form,
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Resume => write!(f, "RESUME"),
            GenerationKind::Poster => write!(f, "POSTER"),
            GenerationKind::Form => write!(f, "FORM"),
        }
    }
}

/// Poster aspect ratio selector. Serialized as the literal ratio strings the
/// image API accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }
}

/// A generation request, one variant per generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GenerationRequest {
    #[serde(rename = "RESUME", rename_all = "camelCase")]
    Resume { profile_text: String },
    #[serde(rename = "POSTER", rename_all = "camelCase")]
    Poster {
        prompt: String,
        #[serde(default)]
        aspect_ratio: AspectRatio,
    },
    #[serde(rename = "FORM", rename_all = "camelCase")]
    FormFill {
        form_text: String,
        user_data_text: String,
    },
}

impl GenerationRequest {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationRequest::Resume { .. } => GenerationKind::Resume,
            GenerationRequest::Poster { .. } => GenerationKind::Poster,
            GenerationRequest::FormFill { .. } => GenerationKind::Form,
        }
    }

    /// Rejects empty or whitespace-only required fields before any network
    /// call is attempted.
    pub fn validate(&self) -> Result<(), AppError> {
        match self {
            GenerationRequest::Resume { profile_text } => {
                require_text("profileText", profile_text)
            }
            GenerationRequest::Poster { prompt, .. } => require_text("prompt", prompt),
            GenerationRequest::FormFill {
                form_text,
                user_data_text,
            } => {
                require_text("formText", form_text)?;
                require_text("userDataText", user_data_text)
            }
        }
    }
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("{field} cannot be empty")));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

/// One role on a resume, with its bullet details in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub role: String,
    pub company: String,
    pub period: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,
    pub school: String,
    pub year: String,
}

/// A fully structured resume as returned by the model.
///
/// Every field is required: a reply missing any of them is rejected as
/// malformed rather than accepted partially. Sequences may be empty but
/// never null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeResult {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub skills: Vec<String>,
}

/// A generated poster image, kept base64-encoded end to end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterResult {
    pub image_data: String,
    pub mime_type: String,
}

/// Output of the smart form filler: the filled text plus the field mapping
/// the model identified. Keys are unique; order is irrelevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFillResult {
    pub filled_text: String,
    pub fields: BTreeMap<String, String>,
}

/// A generation outcome, one variant per request kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum GenerationResult {
    #[serde(rename = "RESUME")]
    Resume(ResumeResult),
    #[serde(rename = "POSTER")]
    Poster(PosterResult),
    #[serde(rename = "FORM")]
    FormFill(FormFillResult),
}

impl GenerationResult {
    pub fn kind(&self) -> GenerationKind {
        match self {
            GenerationResult::Resume(_) => GenerationKind::Resume,
            GenerationResult::Poster(_) => GenerationKind::Poster,
            GenerationResult::FormFill(_) => GenerationKind::Form,
        }
    }

    pub fn into_resume(self) -> Option<ResumeResult> {
        match self {
            GenerationResult::Resume(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_poster(self) -> Option<PosterResult> {
        match self {
            GenerationResult::Poster(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_form_fill(self) -> Option<FormFillResult> {
        match self {
            GenerationResult::FormFill(f) => Some(f),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
