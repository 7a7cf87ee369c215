//! WAV decode and encode through hound.
//!
//! Decoding accepts 8, 16, 24 and 32-bit integer PCM and 32-bit float, and
//! averages channels down to mono. Encoding always writes 32-bit float mono.

use std::io::{Cursor, Read};
use std::path::Path;

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, AudioResult};

/// Reads a WAV file into a mono buffer.
pub fn read_wav(path: &Path) -> AudioResult<AudioBuffer> {
    let reader = hound::WavReader::open(path)?;
    decode_reader(reader)
}

/// Decodes WAV bytes from any reader.
pub fn decode<R: Read>(input: R) -> AudioResult<AudioBuffer> {
    decode_reader(hound::WavReader::new(input)?)
}

fn decode_reader<R: Read>(reader: hound::WavReader<R>) -> AudioResult<AudioBuffer> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AudioError::invalid_param("wav.channels", "file has no channels"));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            if !matches!(spec.bits_per_sample, 8 | 16 | 24 | 32) {
                return Err(AudioError::invalid_param(
                    "wav.bits_per_sample",
                    format!(
                        "unsupported bit depth {} (supported: 8, 16, 24, 32)",
                        spec.bits_per_sample
                    ),
                ));
            }
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()?
        }
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()?,
    };

    AudioBuffer::new(spec.sample_rate, downmix(&interleaved, spec.channels))
}

/// Averages interleaved frames to mono. A trailing partial frame is dropped.
fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels == 1 {
        return interleaved.to_vec();
    }
    let channels = channels as usize;
    interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

fn float_spec(sample_rate: u32) -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    }
}

/// Encodes a buffer as 32-bit float mono WAV bytes.
pub fn encode(buffer: &AudioBuffer) -> AudioResult<Vec<u8>> {
    let mut bytes = Vec::new();
    {
        let cursor = Cursor::new(&mut bytes);
        let mut writer = hound::WavWriter::new(cursor, float_spec(buffer.sample_rate()))?;
        for &sample in buffer.samples() {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
    }
    Ok(bytes)
}

/// Writes a buffer as a 32-bit float mono WAV file.
pub fn write_wav(buffer: &AudioBuffer, path: &Path) -> AudioResult<()> {
    let mut writer = hound::WavWriter::create(path, float_spec(buffer.sample_rate()))?;
    for &sample in buffer.samples() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    tracing::debug!(
        path = %path.display(),
        samples = buffer.len(),
        rate = buffer.sample_rate(),
        "wrote WAV file"
    );
    Ok(())
}
