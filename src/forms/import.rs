use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};

use crate::forms::FormError;
use crate::services::ServiceError;
use crate::services::import::ColumnMapping;

#[derive(MultipartForm)]
pub struct ImportClientsForm {
    pub csv: TempFile,
    /// JSON encoded [`ColumnMapping`]; omitted to use the detected mapping.
    pub mapping: Option<Text<String>>,
}

impl ImportClientsForm {
    /// Reads the uploaded file as UTF-8 text.
    pub fn read_csv(&self) -> Result<String, ServiceError> {
        std::fs::read_to_string(self.csv.file.path())
            .map_err(|err| ServiceError::Parse(format!("unreadable CSV upload: {err}")))
    }

    pub fn mapping(&self) -> Result<Option<ColumnMapping>, FormError> {
        match &self.mapping {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(raw.as_str())
                .map(Some)
                .map_err(|err| FormError::InvalidMapping(err.to_string())),
            _ => Ok(None),
        }
    }
}
