//! WAV decoding for sound replacements.

use crate::error::{Error, Result};
use camino::Utf8Path;
use std::io::Cursor;

/// PCM audio decoded from a sound file, ready to hand to a [`ResourceInstaller`](crate::ResourceInstaller).
///
/// Samples are de-interleaved and normalized to `f32` in `[-1.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

impl DecodedAudio {
    /// Number of sample frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    /// Playback length in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Decode a WAV container held in memory.
    ///
    /// `path` is only used to label the error.
    pub fn from_wav_bytes(bytes: &[u8], path: &Utf8Path) -> Result<Self> {
        let decode_err = |source| Error::Decode {
            path: path.to_path_buf(),
            source,
        };

        let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(decode_err)?;
        let spec = reader.spec();
        let channel_count = spec.channels.max(1) as usize;

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(decode_err)?,
            hound::SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(decode_err)?
            }
        };

        let frames = interleaved.len() / channel_count;
        let mut channels = vec![Vec::with_capacity(frames); channel_count];
        for frame in interleaved.chunks(channel_count) {
            for (channel, sample) in channels.iter_mut().zip(frame) {
                channel.push(*sample);
            }
        }

        Ok(Self {
            sample_rate: spec.sample_rate,
            channels,
        })
    }
}

/// Read and decode a sound file.
///
/// Read failures surface as [`Error::Io`] and malformed containers as
/// [`Error::Decode`], so callers can tell "could not read" from "could not decode".
pub fn load_sound(path: &Utf8Path) -> Result<DecodedAudio> {
    let bytes = std::fs::read(path.as_std_path())?;
    DecodedAudio::from_wav_bytes(&bytes, path)
}
