// Prompt templates for the three generators. Placeholders are replaced
// before sending; resume and form fill additionally constrain the reply with
// a response schema (see schemas.rs).

/// Resume generation prompt. Replace `{profile_text}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Create a professional resume JSON for a user with this profile description: "{profile_text}".
Ensure the tone is professional. Infer missing details if reasonable, or leave generic placeholders like "[City]".
The output must be strictly JSON matching this structure:
{
  "fullName": "string",
  "email": "string",
  "phone": "string",
  "summary": "string",
  "experience": [{"role": "string", "company": "string", "period": "string", "details": ["string"]}],
  "education": [{"degree": "string", "school": "string", "year": "string"}],
  "skills": ["string"]
}"#;

/// Poster generation prompt. Replace `{prompt}` before sending.
pub const POSTER_PROMPT_TEMPLATE: &str = "Create a high-quality, effective, and attractive poster design. \
    Description: {prompt}. Ensure text is legible if requested.";

/// Form filling prompt. Replace `{user_data_text}` and `{form_text}` before sending.
pub const FORM_FILL_PROMPT_TEMPLATE: &str = r#"You are a smart form filling assistant.
User Data Context: "{user_data_text}"

Form Content to Fill:
"{form_text}"

Task:
1. Identify fields in the "Form Content".
2. Fill them using "User Data".
3. Return a JSON object with:
   - "filledText": A string representation of the form with answers filled in.
   - "fields": A key-value map of identified fields and their filled values.

If information is missing, use reasonable placeholders or "[Missing Info]"."#;
