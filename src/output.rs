//! Text sink for feature lines: standard output or a file.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::features::FeatureVector;

/// Open the configured sink: a buffered file when a path is given,
/// standard output otherwise
pub fn open_sink(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?;
            info!("Writing feature lines to {:?}", path);
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Write one line per feature vector: space-separated amplitudes, then label
pub fn write_vectors<W: Write + ?Sized>(sink: &mut W, vectors: &[FeatureVector]) -> io::Result<()> {
    for vector in vectors {
        writeln!(sink, "{}", vector)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Label;

    #[test]
    fn test_write_vectors_line_format() {
        let vectors = vec![
            FeatureVector {
                amplitudes: vec![4, 14, 24, 34],
                label: Label::Snore,
            },
            FeatureVector {
                amplitudes: vec![0, 0, 0, 0],
                label: Label::Snore,
            },
        ];

        let mut sink = Vec::new();
        write_vectors(&mut sink, &vectors).unwrap();
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "4 14 24 34 1\n0 0 0 0 1\n"
        );
    }

    #[test]
    fn test_file_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("features.txt");

        {
            let mut sink = open_sink(Some(&path)).unwrap();
            let vectors = vec![FeatureVector {
                amplitudes: vec![1, 2],
                label: Label::NonSnore,
            }];
            write_vectors(&mut sink, &vectors).unwrap();
            sink.flush().unwrap();
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1 2 0\n");
    }
}
