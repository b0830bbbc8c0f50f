#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("language model error: {0}")]
    Llm(String),
    #[error("language model returned an unusable response")]
    EmptyResponse,
}

impl From<SummaryError> for crate::error::AppError {
    fn from(err: SummaryError) -> Self {
        crate::error::AppError::ExternalService(err.to_string())
    }
}
