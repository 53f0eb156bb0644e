//! Multipart form handling and file validation
//!
//! Create endpoints accept `multipart/form-data` with a mix of text fields
//! and file parts. [`MultipartForm::read`] drains the stream into memory
//! once, then the feature command constructors pull the fields they need.

use std::collections::HashMap;

use axum::extract::Multipart;

/// Largest accepted image part (avatars and covers): 1 MiB.
pub const MAX_IMAGE_BYTES: usize = 1024 * 1024;

/// Largest accepted book file: 2 MiB.
pub const MAX_DOCUMENT_BYTES: usize = 2 * 1024 * 1024;

/// Accepted book file extensions.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "epub"];

/// One uploaded file part, fully buffered.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Lowercased extension from the client file name, if any.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.file_name.rsplit_once('.')?;
        if ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    fn is_image(&self) -> bool {
        self.content_type
            .as_deref()
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .map(|m| m.type_() == mime::IMAGE)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FileValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} must be an image")]
    NotAnImage { field: &'static str },
    #[error("{field} must be one of: pdf, doc, docx, epub")]
    UnsupportedDocumentType { field: &'static str },
    #[error("{field} must be at most {max_bytes} bytes")]
    TooLarge {
        field: &'static str,
        max_bytes: usize,
    },
}

/// Require an image part no larger than [`MAX_IMAGE_BYTES`].
pub fn validate_image(
    field: &'static str,
    file: &UploadedFile,
) -> Result<(), FileValidationError> {
    if file.bytes.is_empty() {
        return Err(FileValidationError::Missing { field });
    }
    if !file.is_image() {
        return Err(FileValidationError::NotAnImage { field });
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(FileValidationError::TooLarge {
            field,
            max_bytes: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

/// Require a document part with an accepted extension, no larger than
/// [`MAX_DOCUMENT_BYTES`].
pub fn validate_document(
    field: &'static str,
    file: &UploadedFile,
) -> Result<(), FileValidationError> {
    if file.bytes.is_empty() {
        return Err(FileValidationError::Missing { field });
    }
    let extension = file.extension();
    if !extension
        .as_deref()
        .map(|ext| DOCUMENT_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
    {
        return Err(FileValidationError::UnsupportedDocumentType { field });
    }
    if file.bytes.len() > MAX_DOCUMENT_BYTES {
        return Err(FileValidationError::TooLarge {
            field,
            max_bytes: MAX_DOCUMENT_BYTES,
        });
    }
    Ok(())
}

/// A drained multipart request: text fields and file parts by field name.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Drain the multipart stream. Parts with a client file name become
    /// files; everything else is read as text.
    pub async fn read(mut multipart: Multipart) -> anyhow::Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await?.to_vec();
                    form.files.insert(
                        name,
                        UploadedFile {
                            file_name,
                            content_type,
                            bytes,
                        },
                    );
                }
                None => {
                    let value = field.text().await?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    #[cfg(test)]
    pub fn from_parts(
        fields: Vec<(&str, &str)>,
        files: Vec<(&str, UploadedFile)>,
    ) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }
}
