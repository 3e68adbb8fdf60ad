//! Amplitude-envelope feature extraction.
//!
//! Splits an audio stream into `segment_count` equal segments, each segment
//! into `part_count` equal parts, and records the maximum absolute sample
//! amplitude per part. Each segment yields one feature vector of
//! `part_count` amplitudes plus the trailing binary label.
//!
//! Partition boundaries use integer division at both levels, so trailing
//! remainder frames are dropped per segment and per part. This matches the
//! grid the downstream training scripts were built against and must stay
//! exactly as-is for reproducibility.

use super::{FeatureError, Label};
use std::fmt;

/// Envelope extraction grid configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvelopeConfig {
    /// Number of equal segments the full stream is split into
    pub segment_count: usize,
    /// Number of equal parts per segment
    pub part_count: usize,
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            segment_count: 5,
            part_count: 16,
        }
    }
}

/// One feature vector: per-part max amplitudes plus the class label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    pub amplitudes: Vec<u32>,
    pub label: Label,
}

impl FeatureVector {
    /// Total element count including the trailing label
    pub fn len(&self) -> usize {
        self.amplitudes.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for FeatureVector {
    /// Renders the vector as one whitespace-separated line: amplitudes, then label
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for amplitude in &self.amplitudes {
            write!(f, "{} ", amplitude)?;
        }
        write!(f, "{}", self.label)
    }
}

/// Amplitude-envelope feature extractor
pub struct EnvelopeExtractor {
    config: EnvelopeConfig,
}

impl EnvelopeExtractor {
    /// Create an extractor, validating the grid before any scanning happens
    pub fn new(config: EnvelopeConfig) -> Result<Self, FeatureError> {
        if config.segment_count == 0 {
            return Err(FeatureError::InvalidConfiguration(
                "segment_count must be greater than zero".to_string(),
            ));
        }
        if config.part_count == 0 {
            return Err(FeatureError::InvalidConfiguration(
                "part_count must be greater than zero".to_string(),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> EnvelopeConfig {
        self.config
    }

    /// Extract feature vectors from an in-memory sample sequence.
    ///
    /// Produces exactly `segment_count` vectors for non-empty input, each of
    /// `part_count` amplitudes plus the label.
    pub fn extract(&self, samples: &[i32], label: Label) -> Vec<FeatureVector> {
        self.extract_stream(samples.len(), samples.iter().copied(), label)
    }

    /// Extract feature vectors from a sample stream whose declared length may
    /// exceed what the stream actually yields.
    ///
    /// `declared_frames` (typically the container header's frame count)
    /// defines the segment/part grid. If the stream runs out mid-part, the
    /// partial max for that part is kept as-is, the in-progress vector is
    /// emitted, and extraction stops. An empty declared length produces no
    /// vectors.
    pub fn extract_stream<I>(
        &self,
        declared_frames: usize,
        samples: I,
        label: Label,
    ) -> Vec<FeatureVector>
    where
        I: IntoIterator<Item = i32>,
    {
        if declared_frames == 0 {
            return Vec::new();
        }

        let frames_per_segment = declared_frames / self.config.segment_count;
        let frames_per_part = frames_per_segment / self.config.part_count;

        let mut iter = samples.into_iter();
        // Index of the next frame the iterator will yield
        let mut pos: usize = 0;
        let mut exhausted = false;
        let mut vectors = Vec::with_capacity(self.config.segment_count);

        for segment in 0..self.config.segment_count {
            let segment_start = segment * frames_per_segment;
            let mut amplitudes = Vec::with_capacity(self.config.part_count);

            for part in 0..self.config.part_count {
                let start = segment_start + part * frames_per_part;
                let end = start + frames_per_part;
                let mut max_amplitude: u32 = 0;

                // Skip remainder frames between the previous range and this one
                while pos < start {
                    if iter.next().is_none() {
                        exhausted = true;
                        break;
                    }
                    pos += 1;
                }

                while !exhausted && pos < end {
                    match iter.next() {
                        Some(sample) => {
                            let amplitude = sample.unsigned_abs();
                            if amplitude > max_amplitude {
                                max_amplitude = amplitude;
                            }
                            pos += 1;
                        }
                        None => exhausted = true,
                    }
                }

                amplitudes.push(max_amplitude);
                if exhausted {
                    break;
                }
            }

            vectors.push(FeatureVector { amplitudes, label });
            if exhausted {
                break;
            }
        }

        vectors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn extractor(segments: usize, parts: usize) -> EnvelopeExtractor {
        EnvelopeExtractor::new(EnvelopeConfig {
            segment_count: segments,
            part_count: parts,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_configuration_rejected() {
        let zero_segments = EnvelopeExtractor::new(EnvelopeConfig {
            segment_count: 0,
            part_count: 16,
        });
        assert!(matches!(
            zero_segments,
            Err(FeatureError::InvalidConfiguration(_))
        ));

        let zero_parts = EnvelopeExtractor::new(EnvelopeConfig {
            segment_count: 5,
            part_count: 0,
        });
        assert!(matches!(
            zero_parts,
            Err(FeatureError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_empty_stream_produces_no_vectors() {
        let vectors = extractor(5, 16).extract(&[], Label::Snore);
        assert!(vectors.is_empty());
    }

    #[test]
    fn test_worked_example_80_samples() {
        // 80 samples, 2 segments, 4 parts: 40 frames per segment, 10 per part
        let samples: Vec<i32> = (0..80).map(|i| if i % 10 == 3 { -(i + 1) } else { 1 }).collect();
        let vectors = extractor(2, 4).extract(&samples, Label::Snore);

        assert_eq!(vectors.len(), 2);
        for vector in &vectors {
            assert_eq!(vector.len(), 5);
        }
        // Each part's max is the |-(i+1)| spike at offset 3 of its window
        assert_eq!(vectors[0].amplitudes, vec![4, 14, 24, 34]);
        assert_eq!(vectors[1].amplitudes, vec![44, 54, 64, 74]);
        assert_eq!(vectors[0].to_string(), "4 14 24 34 1");
    }

    #[test]
    fn test_remainder_frames_dropped() {
        // 11 frames, 2 segments, 2 parts: 5 per segment, 2 per part.
        // Frame 10 (the loudest) falls in the trailing remainder and must not
        // appear in any vector; neither does frame 4 (segment-internal gap).
        let samples = vec![1, 2, 3, 4, 900, 5, 6, 7, 8, 800, 1000];
        let vectors = extractor(2, 2).extract(&samples, Label::NonSnore);

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].amplitudes, vec![2, 4]);
        assert_eq!(vectors[1].amplitudes, vec![6, 8]);
    }

    #[test]
    fn test_short_stream_yields_zero_amplitudes() {
        // Fewer frames than segment_count * part_count: parts become empty
        // ranges with amplitude 0, but nothing raises
        let samples = vec![7, -9, 3];
        let vectors = extractor(2, 4).extract(&samples, Label::NonSnore);

        assert_eq!(vectors.len(), 2);
        for vector in &vectors {
            assert_eq!(vector.amplitudes, vec![0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_negative_samples_use_absolute_value() {
        let samples = vec![-5, 2, -8, 1];
        let vectors = extractor(1, 2).extract(&samples, Label::Snore);
        assert_eq!(vectors[0].amplitudes, vec![5, 8]);
    }

    #[test]
    fn test_extreme_sample_value() {
        let samples = vec![i32::MIN, 0];
        let vectors = extractor(1, 1).extract(&samples, Label::NonSnore);
        assert_eq!(vectors[0].amplitudes, vec![2_147_483_648]);
    }

    #[test]
    fn test_truncated_stream_stops_early() {
        // Header claims 40 frames (2 segments of 2 parts, 10 frames each)
        // but only 25 arrive: segment 0 completes, segment 1's second part is
        // cut short and extraction stops with the partial max kept
        let samples: Vec<i32> = (1..=25).collect();
        let vectors = extractor(2, 2).extract_stream(40, samples, Label::Snore);

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].amplitudes, vec![10, 20]);
        // Second segment covers frames 20..40; only frames 20..25 exist
        assert_eq!(vectors[1].amplitudes, vec![25]);
    }

    #[test]
    fn test_truncated_stream_exhausted_in_gap() {
        // 22 declared frames, 2 segments, 2 parts: 11 per segment, 5 per part.
        // The stream ends inside the remainder gap before segment 1, so that
        // segment's first part scans nothing and reports 0.
        let samples: Vec<i32> = (1..=10).collect();
        let vectors = extractor(2, 2).extract_stream(22, samples, Label::NonSnore);

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[0].amplitudes, vec![5, 10]);
        assert_eq!(vectors[1].amplitudes, vec![0]);
    }

    #[test]
    fn test_label_constant_across_vectors() {
        let samples: Vec<i32> = (0..200).collect();
        let vectors = extractor(5, 4).extract(&samples, Label::Snore);
        assert!(vectors.iter().all(|v| v.label == Label::Snore));
    }

    proptest! {
        #[test]
        fn prop_vector_count_and_length(
            samples in proptest::collection::vec(-32768i32..32768, 1..2000),
            segments in 1usize..8,
            parts in 1usize..24,
        ) {
            let vectors = extractor(segments, parts).extract(&samples, Label::Snore);
            prop_assert_eq!(vectors.len(), segments);
            for vector in &vectors {
                prop_assert_eq!(vector.amplitudes.len(), parts);
                prop_assert_eq!(vector.len(), parts + 1);
            }
        }

        #[test]
        fn prop_amplitudes_bounded_by_global_max(
            samples in proptest::collection::vec(-32768i32..32768, 1..2000),
        ) {
            let global_max = samples.iter().map(|s| s.unsigned_abs()).max().unwrap();
            let vectors = extractor(5, 16).extract(&samples, Label::NonSnore);
            for vector in &vectors {
                for &amplitude in &vector.amplitudes {
                    prop_assert!(amplitude <= global_max);
                }
            }
        }

        #[test]
        fn prop_extraction_is_deterministic(
            samples in proptest::collection::vec(-32768i32..32768, 0..500),
        ) {
            let extractor = extractor(3, 4);
            let first = extractor.extract(&samples, Label::Snore);
            let second = extractor.extract(&samples, Label::Snore);
            prop_assert_eq!(first, second);
        }
    }
}
