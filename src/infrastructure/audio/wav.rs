use super::AudioStitcher;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::io::Cursor;

/// Decodes WAV segments and re-encodes their samples into a single container.
///
/// Every segment must share the first segment's channel count, sample rate and sample format.
pub struct WavStitcher;

impl AudioStitcher for WavStitcher {
    fn stitch(&self, segments: Vec<Vec<u8>>) -> Result<Vec<u8>, String> {
        let Some(first) = segments.first() else {
            return Ok(Vec::new());
        };
        let spec = open(first, 0)?.spec();

        let mut output = Vec::new();
        {
            let mut writer = WavWriter::new(Cursor::new(&mut output), spec)
                .map_err(|e| format!("Failed to start WAV output: {}", e))?;

            for (i, segment) in segments.iter().enumerate() {
                let reader = open(segment, i)?;
                if reader.spec() != spec {
                    return Err(format!(
                        "Segment {} has spec {:?}, expected {:?}",
                        i,
                        reader.spec(),
                        spec
                    ));
                }
                copy_samples(reader, &mut writer, i)?;
            }

            writer
                .finalize()
                .map_err(|e| format!("Failed to finalise WAV output: {}", e))?;
        }

        Ok(output)
    }
}

/// Wrap raw 16-bit little-endian mono PCM in a WAV container.
pub fn wrap_pcm16(pcm: &[u8], sample_rate: u32) -> Result<Vec<u8>, String> {
    if pcm.len() % 2 != 0 {
        return Err(format!("PCM payload has odd length {}", pcm.len()));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut output = Vec::with_capacity(pcm.len() + 44);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut output), spec)
            .map_err(|e| format!("Failed to start WAV output: {}", e))?;
        for pair in pcm.chunks_exact(2) {
            writer
                .write_sample(i16::from_le_bytes([pair[0], pair[1]]))
                .map_err(|e| format!("Failed to write sample: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("Failed to finalise WAV output: {}", e))?;
    }
    Ok(output)
}

fn open(segment: &[u8], index: usize) -> Result<WavReader<Cursor<&[u8]>>, String> {
    WavReader::new(Cursor::new(segment))
        .map_err(|e| format!("Segment {} is not valid WAV: {}", index, e))
}

fn copy_samples<W>(
    mut reader: WavReader<Cursor<&[u8]>>,
    writer: &mut WavWriter<W>,
    index: usize,
) -> Result<(), String>
where
    W: std::io::Write + std::io::Seek,
{
    match reader.spec().sample_format {
        SampleFormat::Int => {
            for sample in reader.samples::<i32>() {
                let sample = sample.map_err(|e| format!("Segment {}: {}", index, e))?;
                writer
                    .write_sample(sample)
                    .map_err(|e| format!("Failed to write sample: {}", e))?;
            }
        }
        SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                let sample = sample.map_err(|e| format!("Segment {}: {}", index, e))?;
                writer
                    .write_sample(sample)
                    .map_err(|e| format!("Failed to write sample: {}", e))?;
            }
        }
    }
    Ok(())
}
