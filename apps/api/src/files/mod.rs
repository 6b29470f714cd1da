//! File boundary: PDF text extraction plus import/export of generation
//! results. DOM-to-PDF rendering stays in the web client; nothing here
//! produces PDFs.

use crate::errors::AppError;

pub mod handlers;

/// Extracts the text layer of a PDF, best effort. Scanned PDFs without a
/// text layer fail; the caller surfaces that as an unprocessable upload.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Unprocessable(format!("Could not extract text from PDF: {e}")))?;

    if text.trim().is_empty() {
        return Err(AppError::Unprocessable(
            "The PDF contains no extractable text layer".to_string(),
        ));
    }

    Ok(text)
}

/// Collapses whitespace runs to underscores for download filenames,
/// matching the web client's `fullName.replace(/\s+/g, '_')`.
pub fn filename_stem(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join("_")
}
