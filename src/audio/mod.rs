pub mod wav;

pub use wav::{read_wav_clip, AudioClip, WavError};
