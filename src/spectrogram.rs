//! Spectrogram generation for the image-based classifier.
//!
//! Converts raw audio waveforms to dB-scaled STFT magnitude spectrograms and
//! renders them as grayscale PNGs, one image per input clip. The STFT itself
//! is delegated to rustfft; this module only does windowing, dB conversion,
//! and rendering.

use image::{GrayImage, Luma};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Floor for dB conversion, matching librosa's default top_db
const TOP_DB: f32 = 80.0;

/// Errors that can occur during spectrogram generation
#[derive(Debug, Error)]
pub enum SpectrogramError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("input too short: {got} samples, need at least {needed}")]
    InputTooShort { got: usize, needed: usize },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
}

/// STFT parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    /// Size of the FFT window
    pub n_fft: usize,
    /// Number of samples between consecutive STFT columns
    pub hop_length: usize,
    /// Size of the analysis window (zero-padded up to n_fft)
    pub win_length: usize,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            n_fft: 1024,
            hop_length: 256,
            win_length: 1024,
        }
    }
}

/// Spectrogram generator with a pre-computed window and FFT plan
pub struct SpectrogramGenerator {
    config: SpectrogramConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
}

impl SpectrogramGenerator {
    pub fn new(config: SpectrogramConfig) -> Result<Self, SpectrogramError> {
        if config.n_fft == 0 || config.hop_length == 0 || config.win_length == 0 {
            return Err(SpectrogramError::InvalidConfiguration(
                "n_fft, hop_length and win_length must be greater than zero".to_string(),
            ));
        }
        if config.win_length > config.n_fft {
            return Err(SpectrogramError::InvalidConfiguration(format!(
                "win_length {} exceeds n_fft {}",
                config.win_length, config.n_fft
            )));
        }

        // Hann window
        let window: Vec<f32> = (0..config.win_length)
            .map(|i| {
                0.5 * (1.0 - (2.0 * PI * i as f32 / (config.win_length - 1).max(1) as f32).cos())
            })
            .collect();

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(config.n_fft);

        Ok(Self {
            config,
            fft,
            window,
        })
    }

    pub fn config(&self) -> SpectrogramConfig {
        self.config
    }

    /// Number of frequency bins per STFT column
    pub fn n_bins(&self) -> usize {
        self.config.n_fft / 2 + 1
    }

    /// Compute the dB-scaled magnitude spectrogram of a waveform.
    ///
    /// Returns one Vec per time frame, each holding `n_fft/2 + 1` values in
    /// [-80, 0] dB relative to the peak magnitude.
    pub fn compute(&self, audio: &[f32]) -> Result<Vec<Vec<f32>>, SpectrogramError> {
        if audio.len() < self.config.win_length {
            return Err(SpectrogramError::InputTooShort {
                got: audio.len(),
                needed: self.config.win_length,
            });
        }

        let n_frames = 1 + (audio.len() - self.config.win_length) / self.config.hop_length;
        let n_bins = self.n_bins();
        debug!("Computing spectrogram: {} frames, {} bins", n_frames, n_bins);

        let mut magnitudes = Vec::with_capacity(n_frames);
        let mut buffer = vec![Complex::new(0.0f32, 0.0); self.config.n_fft];

        for frame_idx in 0..n_frames {
            let start = frame_idx * self.config.hop_length;

            // Windowed frame, zero-padded up to n_fft
            buffer.fill(Complex::new(0.0, 0.0));
            for (i, &sample) in audio[start..start + self.config.win_length].iter().enumerate() {
                buffer[i] = Complex::new(sample * self.window[i], 0.0);
            }

            self.fft.process(&mut buffer);

            let frame: Vec<f32> = buffer[..n_bins].iter().map(|c| c.norm()).collect();
            magnitudes.push(frame);
        }

        Ok(to_db(magnitudes))
    }

    /// Render a dB spectrogram as a grayscale image, low frequencies at the
    /// bottom, -80..0 dB mapped to 0..255
    pub fn render(&self, frames: &[Vec<f32>]) -> GrayImage {
        let width = frames.len();
        let height = frames.first().map(|f| f.len()).unwrap_or(0);
        let mut img = GrayImage::new(width as u32, height as u32);

        for (x, frame) in frames.iter().enumerate() {
            for (bin, &db) in frame.iter().enumerate() {
                let value = (((db + TOP_DB) / TOP_DB) * 255.0).clamp(0.0, 255.0) as u8;
                let y = (height - 1 - bin) as u32;
                img.put_pixel(x as u32, y, Luma([value]));
            }
        }

        img
    }

    /// Compute and write the spectrogram of a waveform as a PNG file
    pub fn write_png(&self, audio: &[f32], path: &Path) -> Result<(), SpectrogramError> {
        let frames = self.compute(audio)?;
        let img = self.render(&frames);
        img.save(path)?;
        debug!("Wrote spectrogram to {:?}", path);
        Ok(())
    }
}

/// Convert magnitudes to dB relative to the peak, floored at -TOP_DB
/// (equivalent to librosa's amplitude_to_db with ref=max)
fn to_db(magnitudes: Vec<Vec<f32>>) -> Vec<Vec<f32>> {
    let peak = magnitudes
        .iter()
        .flat_map(|frame| frame.iter())
        .fold(0.0f32, |acc, &m| acc.max(m));

    magnitudes
        .into_iter()
        .map(|frame| {
            frame
                .into_iter()
                .map(|m| {
                    if peak <= 0.0 || m <= 0.0 {
                        -TOP_DB
                    } else {
                        (20.0 * (m / peak).log10()).max(-TOP_DB)
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_rejected() {
        let zero = SpectrogramGenerator::new(SpectrogramConfig {
            n_fft: 0,
            hop_length: 256,
            win_length: 0,
        });
        assert!(matches!(
            zero,
            Err(SpectrogramError::InvalidConfiguration(_))
        ));

        let oversized_window = SpectrogramGenerator::new(SpectrogramConfig {
            n_fft: 512,
            hop_length: 128,
            win_length: 1024,
        });
        assert!(matches!(
            oversized_window,
            Err(SpectrogramError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_input_too_short() {
        let generator = SpectrogramGenerator::new(SpectrogramConfig::default()).unwrap();
        let audio = vec![0.0f32; 100];
        assert!(matches!(
            generator.compute(&audio),
            Err(SpectrogramError::InputTooShort { got: 100, .. })
        ));
    }

    #[test]
    fn test_spectrogram_dimensions() {
        let config = SpectrogramConfig::default();
        let generator = SpectrogramGenerator::new(config).unwrap();

        // 1 second at 16kHz
        let audio: Vec<f32> = (0..16000)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 16000.0).sin() * 0.5)
            .collect();
        let frames = generator.compute(&audio).unwrap();

        let expected_frames = 1 + (16000 - config.win_length) / config.hop_length;
        assert_eq!(frames.len(), expected_frames);
        for frame in &frames {
            assert_eq!(frame.len(), 513);
        }
    }

    #[test]
    fn test_db_values_bounded() {
        let generator = SpectrogramGenerator::new(SpectrogramConfig::default()).unwrap();
        let audio: Vec<f32> = (0..8000)
            .map(|i| (2.0 * PI * 1000.0 * i as f32 / 16000.0).sin())
            .collect();
        let frames = generator.compute(&audio).unwrap();

        let mut peak_seen = f32::MIN;
        for frame in &frames {
            for &db in frame {
                assert!(db <= 0.0 && db >= -TOP_DB, "dB out of range: {}", db);
                peak_seen = peak_seen.max(db);
            }
        }
        // The peak magnitude defines the reference, so the max must be 0 dB
        assert!((peak_seen - 0.0).abs() < 1e-4);
    }

    #[test]
    fn test_silence_is_floored() {
        let generator = SpectrogramGenerator::new(SpectrogramConfig::default()).unwrap();
        let audio = vec![0.0f32; 4096];
        let frames = generator.compute(&audio).unwrap();
        for frame in &frames {
            for &db in frame {
                assert_eq!(db, -TOP_DB);
            }
        }
    }

    #[test]
    fn test_render_dimensions_and_orientation() {
        let generator = SpectrogramGenerator::new(SpectrogramConfig::default()).unwrap();
        // Two frames: one silent, one at full scale in bin 0 (lowest frequency)
        let frames = vec![vec![-TOP_DB; 513], {
            let mut frame = vec![-TOP_DB; 513];
            frame[0] = 0.0;
            frame
        }];

        let img = generator.render(&frames);
        assert_eq!(img.width(), 2);
        assert_eq!(img.height(), 513);
        // Bin 0 renders at the bottom row
        assert_eq!(img.get_pixel(1, 512).0[0], 255);
        assert_eq!(img.get_pixel(0, 512).0[0], 0);
    }

    #[test]
    fn test_write_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.png");
        let generator = SpectrogramGenerator::new(SpectrogramConfig::default()).unwrap();

        let audio: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 440.0 * i as f32 / 16000.0).sin())
            .collect();
        generator.write_png(&audio, &path).unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
