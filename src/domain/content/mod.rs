pub mod extract;
pub mod model;
pub mod normalize;
pub mod service;
pub mod templates;

pub use extract::{extract_segments, Segment};
pub use model::ProcessedText;
pub use normalize::normalize_for_speech;
pub use service::{placeholder, CodeBlockHandling, ContentTransformer, ContentTransformerApi};
pub use templates::{clean_title, EpisodeTemplates};
