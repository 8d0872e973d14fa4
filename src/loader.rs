use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use geo::{Coordinate, Line};
use thiserror::Error;

use crate::adjuster::Adjuster;

/// Failure to read a segment file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read segment file")]
    Io(#[from] io::Error),
    /// The input ended inside a record.
    #[error("truncated segment record: expected 32 bytes, found {0}")]
    Truncated(usize),
}

/// One fixed binary record: x1, y1, x2, y2 as little-endian `f64`.
const RECORD_SIZE: usize = 32;

/// Read segments from a binary record stream.
///
/// Every coordinate is canonicalized through the given adjuster before
/// the segments are built, so input-level near-duplicates are already
/// merged when a run starts. Non-finite coordinates pass through
/// untouched; segment validation reports them when the run is created.
pub fn read_segments<R: Read>(
    mut reader: R,
    adjuster: &mut Adjuster,
) -> Result<Vec<Line<f64>>, LoadError> {
    let mut segments = Vec::new();
    let mut record = [0u8; RECORD_SIZE];

    loop {
        match read_record(&mut reader, &mut record)? {
            0 => break,
            RECORD_SIZE => {}
            partial => return Err(LoadError::Truncated(partial)),
        }

        let mut coords = [0f64; 4];
        for (slot, chunk) in coords.iter_mut().zip(record.chunks_exact(8)) {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(chunk);
            *slot = f64::from_le_bytes(bytes);
        }

        let start = Coordinate {
            x: coords[0],
            y: coords[1],
        };
        let end = Coordinate {
            x: coords[2],
            y: coords[3],
        };
        let line = if coords.iter().all(|c| c.is_finite()) {
            Line::new(
                adjuster.hash_point(start).coord(),
                adjuster.hash_point(end).coord(),
            )
        } else {
            Line::new(start, end)
        };
        segments.push(line);
    }

    Ok(segments)
}

/// Load a `.bo` segment file, returning the adjuster shared by all its
/// points alongside the segments.
pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<(Adjuster, Vec<Line<f64>>), LoadError> {
    let file = BufReader::new(File::open(path)?);
    let mut adjuster = Adjuster::default();
    let segments = read_segments(file, &mut adjuster)?;
    Ok((adjuster, segments))
}

/// Fill `record` from the reader; a short count means end of input.
fn read_record<R: Read>(reader: &mut R, record: &mut [u8; RECORD_SIZE]) -> Result<usize, io::Error> {
    let mut filled = 0;
    while filled < RECORD_SIZE {
        let n = reader.read(&mut record[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
