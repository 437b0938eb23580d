use axum::extract::Multipart;

/// Result type used by the shared upload helpers.
pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned when a multipart body cannot be read.
#[derive(Debug)]
pub struct UploadError {
    message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// A file part read fully into memory.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Reads the first file submitted under `field_name`, ignoring every other
/// part. Returns `Ok(None)` when no such file was sent or the picker was
/// submitted empty.
pub async fn read_single_file(
    mut multipart: Multipart,
    field_name: &str,
) -> UploadResult<Option<UploadedFile>> {
    let mut found: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::new(format!("failed to parse upload form: {err}")))?
    {
        if found.is_some() || field.name() != Some(field_name) {
            continue;
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let original_name = client_basename(&file_name);
        if original_name.is_empty() {
            continue;
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| UploadError::new(format!("failed to read `{field_name}`: {err}")))?;

        found = Some(UploadedFile {
            original_name,
            bytes: bytes.to_vec(),
        });
    }

    Ok(found)
}

/// Some clients send a full path as the filename; keep only the final
/// component with unsafe characters removed.
fn client_basename(raw: &str) -> String {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    sanitize_filename::sanitize(last)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basename_strips_client_paths() {
        assert_eq!(client_basename("C:\\Users\\me\\licenses.xlsx"), "licenses.xlsx");
        assert_eq!(client_basename("/home/me/licenses.xlsx"), "licenses.xlsx");
        assert_eq!(client_basename("licenses.xlsx"), "licenses.xlsx");
    }

    #[test]
    fn basename_keeps_extension_intact() {
        assert!(client_basename("q1 report?.xlsx").ends_with(".xlsx"));
        assert_eq!(client_basename(""), "");
    }

    #[test]
    fn upload_error_displays_message() {
        let err = UploadError::new("boom");
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.message(), "boom");
    }
}
