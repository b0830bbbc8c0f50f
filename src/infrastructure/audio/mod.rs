pub mod mp3;
pub mod wav;

pub use mp3::Mp3Stitcher;
pub use wav::{wrap_pcm16, WavStitcher};

/// Encoding of the audio produced by a TTS backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Wav => "wav",
        }
    }

    /// Stitcher able to join segments of this encoding
    pub fn stitcher(&self) -> Box<dyn AudioStitcher> {
        match self {
            AudioFormat::Mp3 => Box::new(Mp3Stitcher),
            AudioFormat::Wav => Box::new(WavStitcher),
        }
    }
}

/// Joins per-chunk audio segments into one artifact, preserving order.
pub trait AudioStitcher: Send + Sync {
    fn stitch(&self, segments: Vec<Vec<u8>>) -> Result<Vec<u8>, String>;
}
