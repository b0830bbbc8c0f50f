use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error("chunk {index} failed: {message}")]
    Chunk { index: usize, message: String },
    #[error("could not stitch audio: {0}")]
    Stitch(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<SynthesisError> for AppError {
    fn from(err: SynthesisError) -> Self {
        match err {
            SynthesisError::Chunk { .. } => AppError::ExternalService(err.to_string()),
            SynthesisError::Stitch(msg) => AppError::Internal(msg),
            SynthesisError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
