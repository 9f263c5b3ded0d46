use worker::{FormEntry, Request};

use crate::error::ApiError;
use crate::models::{MAX_UPLOAD_BYTES, UPLOAD_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub async fn read_pdf_upload(req: &mut Request) -> Result<PdfUpload, ApiError> {
    let form = req
        .form_data()
        .await
        .map_err(|error| ApiError::BadRequest(format!("expected multipart form data: {error}")))?;

    let Some(entry) = form.get(UPLOAD_FIELD) else {
        return Err(ApiError::BadRequest(format!(
            "missing '{UPLOAD_FIELD}' upload field"
        )));
    };

    match entry {
        FormEntry::File(file) => {
            let file_name = file.name();
            if file.size() > MAX_UPLOAD_BYTES {
                return Err(too_large(file.size()));
            }
            let bytes = file.bytes().await?;
            validate_pdf_upload(file_name, bytes)
        }
        FormEntry::Field(_) => Err(ApiError::BadRequest(format!(
            "'{UPLOAD_FIELD}' must be a file upload"
        ))),
    }
}

fn too_large(size: usize) -> ApiError {
    ApiError::PayloadTooLarge(format!(
        "upload is {size} bytes; the limit is {MAX_UPLOAD_BYTES} bytes"
    ))
}

/// Size checks only; whether the bytes decode as a PDF is left to the reader.
pub fn validate_pdf_upload(file_name: String, bytes: Vec<u8>) -> Result<PdfUpload, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(too_large(bytes.len()));
    }

    Ok(PdfUpload { file_name, bytes })
}
