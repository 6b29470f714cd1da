//! History entries: the persisted record of past generation outcomes.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::generation::{GenerationKind, GenerationRequest, GenerationResult, ResumeResult};

/// One past generation outcome. Created exactly once after a successful
/// generation (or resume import) and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub kind: GenerationKind,
    /// Epoch milliseconds at creation time.
    pub created_at_millis: i64,
    pub payload: GenerationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_text: Option<String>,
}

impl HistoryEntry {
    fn new(
        payload: GenerationResult,
        preview_image: Option<String>,
        summary_text: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: payload.kind(),
            created_at_millis: Utc::now().timestamp_millis(),
            payload,
            preview_image,
            summary_text,
        }
    }

    /// Builds the entry recorded right after a successful generation.
    /// Summary and preview derivations follow the web client's conventions.
    pub fn for_generation(request: &GenerationRequest, result: &GenerationResult) -> Self {
        match result {
            GenerationResult::Resume(resume) => {
                Self::new(result.clone(), None, Some(resume_summary(resume)))
            }
            GenerationResult::Poster(poster) => {
                let summary = match request {
                    GenerationRequest::Poster { prompt, .. } => Some(prompt.clone()),
                    _ => None,
                };
                Self::new(result.clone(), Some(poster.image_data.clone()), summary)
            }
            GenerationResult::FormFill(_) => Self::new(
                result.clone(),
                None,
                Some("Form filled with user data".to_string()),
            ),
        }
    }

    /// Builds the entry recorded when a user imports a previously exported
    /// resume JSON document.
    pub fn for_imported_resume(resume: &ResumeResult) -> Self {
        Self::new(
            GenerationResult::Resume(resume.clone()),
            None,
            Some(format!("Imported: {}", resume.full_name)),
        )
    }
}

fn resume_summary(resume: &ResumeResult) -> String {
    let top_skills = resume
        .skills
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} - {}", resume.full_name, top_skills)
}
