//! Response schemas for Gemini's schema-constrained JSON mode.
//!
//! Type names are the uppercase literals the `generateContent` API expects.

use serde_json::{json, Value};

/// Schema for the structured resume reply.
pub fn resume_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "fullName": { "type": "STRING" },
            "email": { "type": "STRING" },
            "phone": { "type": "STRING" },
            "summary": { "type": "STRING" },
            "experience": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "role": { "type": "STRING" },
                        "company": { "type": "STRING" },
                        "period": { "type": "STRING" },
                        "details": { "type": "ARRAY", "items": { "type": "STRING" } }
                    }
                }
            },
            "education": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "degree": { "type": "STRING" },
                        "school": { "type": "STRING" },
                        "year": { "type": "STRING" }
                    }
                }
            },
            "skills": { "type": "ARRAY", "items": { "type": "STRING" } }
        }
    })
}

/// Schema for the form-fill reply. `fields` allows dynamic keys.
pub fn form_fill_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "filledText": { "type": "STRING" },
            "fields": {
                "type": "OBJECT",
                "properties": {}
            }
        }
    })
}
