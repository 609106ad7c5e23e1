use actix_multipart::Multipart;
use actix_web::HttpResponse;
use futures_util::StreamExt;
use log::debug;
use sanitize_filename::sanitize;

use crate::invoice::selection::parse_index_list;
use crate::ErrorResponse;

/// Uploads larger than this are rejected.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug)]
pub struct ParsedUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Row indices from the `selected` field, `None` when the field is absent.
    pub selected: Option<Vec<usize>>,
}

#[derive(Debug, thiserror::Error)]
pub enum MultipartParseError {
    #[error("Multipart field error: {0}")]
    FieldError(String),
    #[error("Missing spreadsheet file field 'file'")]
    MissingFile,
    #[error("Upload exceeds {0} bytes")]
    TooLarge(usize),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Invalid UTF-8 data: {0}")]
    Utf8Error(String),
    #[error("Invalid selection: {0}")]
    SelectionError(String),
}

impl From<MultipartParseError> for HttpResponse {
    fn from(error: MultipartParseError) -> Self {
        match error {
            MultipartParseError::IoError(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error(&format!("{}", error))),
            MultipartParseError::TooLarge(_) => HttpResponse::PayloadTooLarge()
                .json(ErrorResponse::new("PayloadTooLarge", &format!("{}", error))),
            _ => HttpResponse::BadRequest()
                .json(ErrorResponse::bad_request(&format!("{}", error))),
        }
    }
}

pub struct MultipartParser;

impl MultipartParser {
    /// Read the `file` and optional `selected` fields of a spreadsheet upload.
    pub async fn parse_spreadsheet_upload(
        mut multipart: Multipart,
    ) -> Result<ParsedUpload, MultipartParseError> {
        let mut file: Option<(String, Vec<u8>)> = None;
        let mut selected: Option<Vec<usize>> = None;

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| MultipartParseError::FieldError(e.to_string()))?;
            let content_disposition = field.content_disposition().ok_or_else(|| {
                MultipartParseError::FieldError("Content disposition not found".to_string())
            })?;
            let name = content_disposition
                .get_name()
                .ok_or_else(|| MultipartParseError::FieldError("Field name not found".to_string()))?
                .to_string();
            let maybe_filename = content_disposition.get_filename().map(sanitize);

            let mut buffer = Vec::new();
            while let Some(chunk) = field.next().await {
                let data_chunk = chunk.map_err(|e| MultipartParseError::IoError(e.to_string()))?;
                if buffer.len() + data_chunk.len() > MAX_UPLOAD_BYTES {
                    return Err(MultipartParseError::TooLarge(MAX_UPLOAD_BYTES));
                }
                buffer.extend_from_slice(&data_chunk);
            }

            match name.as_str() {
                "file" => {
                    let filename = maybe_filename
                        .filter(|f| !f.is_empty())
                        .unwrap_or_else(|| "upload.csv".to_string());
                    debug!("Received spreadsheet '{}' ({} bytes)", filename, buffer.len());
                    file = Some((filename, buffer));
                }
                "selected" => {
                    let value = String::from_utf8(buffer)
                        .map_err(|e| MultipartParseError::Utf8Error(e.to_string()))?;
                    selected = Some(
                        parse_index_list(&value).map_err(MultipartParseError::SelectionError)?,
                    );
                }
                other => debug!("Ignoring multipart field '{}'", other),
            }
        }

        let (filename, bytes) = file.ok_or(MultipartParseError::MissingFile)?;
        Ok(ParsedUpload {
            filename,
            bytes,
            selected,
        })
    }
}
