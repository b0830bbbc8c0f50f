pub mod content;
pub mod episode;
pub mod summary;
pub mod synthesis;
