use axum::Json;
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::web::{ApiMessage, json_error};

/// Serve in-memory bytes with an attachment disposition.
pub fn attachment(
    bytes: Vec<u8>,
    filename: &str,
    content_type: &str,
) -> Result<Response, (StatusCode, Json<ApiMessage>)> {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(content_type).map_err(|err| {
        error!(?err, content_type, "invalid download content type");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid download headers.")
    })?;
    headers.insert(header::CONTENT_TYPE, content_type);

    let disposition = format!("attachment; filename=\"{}\"", filename);
    let disposition = HeaderValue::from_str(&disposition).map_err(|err| {
        error!(?err, filename, "invalid download filename");
        json_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid download headers.")
    })?;
    headers.insert(header::CONTENT_DISPOSITION, disposition);

    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sets_disposition_and_type() {
        let response = attachment(vec![1, 2, 3], "report.xlsx", "application/octet-stream").unwrap();
        let headers = response.headers();
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "attachment; filename=\"report.xlsx\""
        );
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn rejects_filenames_that_break_headers() {
        let (status, Json(body)) =
            attachment(Vec::new(), "bad\nname.xlsx", "application/octet-stream").unwrap_err();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Invalid download headers.");
    }
}
