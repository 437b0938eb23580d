use serde::Serialize;

use super::{client::VerifyError, record::VerificationResult};

pub const ACCEPTED_EXTENSION: &str = ".xlsx";
// The wording does not match the accepted extension; kept as users see it today.
pub const INVALID_FILE_MESSAGE: &str = "Please upload a valid .txt file";
pub const MISSING_FILE_MESSAGE: &str = "Please upload a file first.";

/// A user-chosen upload: the original filename and its raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn has_accepted_extension(&self) -> bool {
        self.file_name.ends_with(ACCEPTED_EXTENSION)
    }
}

impl std::fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the verification form shows for one visitor.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    selected_file: Option<SelectedFile>,
    is_loading: bool,
    results: Vec<VerificationResult>,
    error_message: Option<String>,
}

/// Result of asking to start a submission.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitStart {
    /// The caller should send this file and report back via `finish_submit`.
    Send(SelectedFile),
    /// No file selected; the error message has been set.
    MissingFile,
    /// A submission is already in flight; nothing changed.
    Busy,
}

impl ViewState {
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn results(&self) -> &[VerificationResult] {
        &self.results
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Submit and export are both unavailable without a file or mid-request.
    pub fn actions_enabled(&self) -> bool {
        self.selected_file.is_some() && !self.is_loading
    }

    /// Applies a file selection. Rejected or missing files keep the previous
    /// selection and surface the invalid-file message.
    pub fn select_file(&mut self, input: Option<SelectedFile>) {
        match input {
            Some(file) if file.has_accepted_extension() => {
                self.selected_file = Some(file);
                self.error_message = None;
            }
            _ => {
                self.error_message = Some(INVALID_FILE_MESSAGE.to_string());
            }
        }
    }

    pub fn begin_submit(&mut self) -> SubmitStart {
        if self.is_loading {
            return SubmitStart::Busy;
        }

        let Some(file) = self.selected_file.clone() else {
            self.error_message = Some(MISSING_FILE_MESSAGE.to_string());
            return SubmitStart::MissingFile;
        };

        self.error_message = None;
        self.is_loading = true;
        SubmitStart::Send(file)
    }

    /// Applies the outcome of a submission started by `begin_submit`. Failures
    /// leave the previous results untouched.
    pub fn finish_submit(&mut self, outcome: Result<Vec<VerificationResult>, VerifyError>) {
        match outcome {
            Ok(results) => self.results = results,
            Err(err) => self.error_message = Some(err.to_string()),
        }
        self.is_loading = false;
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            selected_file: self.selected_file.as_ref().map(|f| f.file_name.clone()),
            is_loading: self.is_loading,
            results: self.results.clone(),
            error_message: self.error_message.clone(),
        }
    }
}

/// Serializable copy of a `ViewState`, without the file bytes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewSnapshot {
    pub selected_file: Option<String>,
    pub is_loading: bool,
    pub results: Vec<VerificationResult>,
    pub error_message: Option<String>,
}
