use std::{fmt, time::Duration};

use anyhow::{Context, Result};
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde_json::Value;
use tracing::{debug, warn};

use super::{
    XLSX_CONTENT_TYPE,
    record::{VerificationResult, extract_results},
    state::SelectedFile,
};

pub const UPLOAD_FIELD: &str = "file";
const REJECTED_MESSAGE: &str = "Failed to verify licences";

/// Failure of a verification call, displayed to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The service answered with a non-success status.
    Rejected,
    /// The request never completed or the body could not be decoded.
    Transport(String),
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::Rejected => write!(f, "{REJECTED_MESSAGE}"),
            VerifyError::Transport(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for VerifyError {}

impl From<reqwest::Error> for VerifyError {
    fn from(err: reqwest::Error) -> Self {
        VerifyError::Transport(err.to_string())
    }
}

/// Thin wrapper over the remote licence verification endpoint.
#[derive(Clone)]
pub struct VerificationClient {
    http: Client,
    endpoint: String,
}

impl VerificationClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .context("failed to build verification HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Uploads the file as multipart field `file` and returns the records the
    /// service reported, in service order.
    pub async fn verify(&self, file: &SelectedFile) -> Result<Vec<VerificationResult>, VerifyError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(XLSX_CONTENT_TYPE)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .inspect_err(|err| warn!(%err, endpoint = %self.endpoint, "verification request failed"))?;

        let status = response.status();
        debug!(%status, file = %file.file_name, "verification service responded");
        if !status.is_success() {
            warn!(%status, "verification service rejected the upload");
            return Err(VerifyError::Rejected);
        }

        let body: Value = response
            .json()
            .await
            .inspect_err(|err| warn!(%err, "verification response was not valid JSON"))?;

        Ok(extract_results(body))
    }
}
