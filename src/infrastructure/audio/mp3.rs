use super::AudioStitcher;

const ID3_HEADER_LEN: usize = 10;
const ID3_FOOTER_FLAG: u8 = 0x10;

/// Concatenates MP3 streams frame-wise.
///
/// MPEG audio frames are self-delimiting, so appending streams yields a
/// playable file as long as only the first segment keeps its ID3v2 tag.
pub struct Mp3Stitcher;

impl AudioStitcher for Mp3Stitcher {
    fn stitch(&self, segments: Vec<Vec<u8>>) -> Result<Vec<u8>, String> {
        let total: usize = segments.iter().map(Vec::len).sum();
        let mut output = Vec::with_capacity(total);

        for (i, segment) in segments.iter().enumerate() {
            if i == 0 {
                output.extend_from_slice(segment);
            } else {
                output.extend_from_slice(&segment[id3v2_len(segment)..]);
            }
        }

        Ok(output)
    }
}

/// Length of a leading ID3v2 tag, or 0 when there is none.
fn id3v2_len(data: &[u8]) -> usize {
    if data.len() < ID3_HEADER_LEN || &data[..3] != b"ID3" {
        return 0;
    }

    // Tag size is a 28-bit syncsafe integer (7 bits per byte)
    let size_bytes = &data[6..10];
    if size_bytes.iter().any(|b| b & 0x80 != 0) {
        return 0;
    }
    let size = size_bytes
        .iter()
        .fold(0usize, |acc, b| (acc << 7) | (*b as usize));

    let footer = if data[5] & ID3_FOOTER_FLAG != 0 {
        ID3_HEADER_LEN
    } else {
        0
    };

    (ID3_HEADER_LEN + size + footer).min(data.len())
}
