pub mod error;
pub mod service;

pub use error::EpisodeError;
pub use service::{ArticleSource, EpisodeService, EpisodeServiceApi, RunOptions, RunReport};
