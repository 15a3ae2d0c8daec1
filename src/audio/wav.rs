//! In-memory WAV encoding for captured audio
//!
//! Captured chunks are mono f32 samples; the transcription service expects a
//! WAV container, so the whole take is encoded as 16-bit PCM before upload.

use crate::{Result, ScribbleError};
use std::io::Cursor;

/// Encode mono f32 samples as a 16-bit PCM WAV file in memory.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| ScribbleError::AudioEncodeError(format!("failed to start WAV: {}", e)))?;

        for &sample in samples {
            let clamped = sample.clamp(-1.0, 1.0);
            let value = (clamped * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| ScribbleError::AudioEncodeError(format!("failed to write sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| ScribbleError::AudioEncodeError(format!("failed to finalize WAV: {}", e)))?;
    }

    Ok(cursor.into_inner())
}
