use crate::domain::synthesis::SynthesisError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum EpisodeError {
    #[error("article source unavailable: {0}")]
    Source(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("synthesis failed: {0}")]
    Synthesis(#[from] SynthesisError),
    #[error("episode {0} has no text to synthesize")]
    EmptyText(u32),
    #[error("audio generation is disabled for this run")]
    AudioDisabled,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for EpisodeError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Fetch(msg) | AppError::NotFound(msg) | AppError::BadRequest(msg) => {
                EpisodeError::Source(msg)
            }
            _ => EpisodeError::Storage(err.to_string()),
        }
    }
}

impl From<EpisodeError> for AppError {
    fn from(err: EpisodeError) -> Self {
        match err {
            EpisodeError::Source(msg) => AppError::Fetch(msg),
            EpisodeError::Storage(msg) => AppError::Internal(msg),
            EpisodeError::Synthesis(e) => e.into(),
            EpisodeError::EmptyText(_) | EpisodeError::AudioDisabled => {
                AppError::BadRequest(err.to_string())
            }
            EpisodeError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
