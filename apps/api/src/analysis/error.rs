use thiserror::Error;

/// Terminal failures of a single analysis. Similarity degradation is not an
/// error; it travels as a `ScoreWarning` alongside the result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Unsupported file format '{declared}'. Please upload PDF or DOCX.")]
    UnsupportedFormat { declared: String },

    #[error("Error reading {format}: {reason}")]
    Extraction {
        format: &'static str,
        reason: String,
    },

    #[error("Unknown job role '{0}'")]
    UnknownRole(String),
}

impl AnalysisError {
    pub fn extraction(format: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::Extraction {
            format,
            reason: reason.into(),
        }
    }
}
