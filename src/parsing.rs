//! File parsing functionality for hash occupancy test output
//!
//! This module handles loading a `<ALG>.meta.json` descriptor together with the
//! raw 32-bit counts array it points to.

use crate::common::data_structures::{AlgorithmMeta, Endianness};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Size of a single element of the counts array.
const COUNT_SIZE: usize = core::mem::size_of::<i32>();

/// Errors that can occur during file parsing
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to read input file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid metadata in {path}: {reason}")]
    InvalidMetadata { path: PathBuf, reason: String },

    #[error("Counts file {path} is {len} bytes long, which is not a multiple of 4")]
    TruncatedCounts { path: PathBuf, len: usize },

    #[error("Counts file {path} holds a negative count {value} at bucket {index}")]
    NegativeCount {
        path: PathBuf,
        index: usize,
        value: i32,
    },

    #[error("Counts length {actual} != numBuckets {expected} in {path}")]
    LengthMismatch {
        path: PathBuf,
        actual: usize,
        expected: u64,
    },
}

type Result<T> = core::result::Result<T, ParsingError>;

/// A descriptor together with the counts it describes.
#[derive(Debug, Clone)]
pub struct LoadedAlgorithm {
    /// The parsed descriptor
    pub meta: AlgorithmMeta,
    /// Number of items in each bucket, one entry per bucket
    pub counts: Vec<u32>,
    /// Resolved location of the counts array
    pub counts_path: PathBuf,
}

/// Reads and deserializes a `<ALG>.meta.json` descriptor.
///
/// Keys other than the ones [`AlgorithmMeta`] declares are ignored. `countsDtype` is not
/// validated here; the counts are always read as 32-bit signed integers.
pub fn load_metadata(meta_path: &Path) -> Result<AlgorithmMeta> {
    let file = File::open(meta_path)?;
    let meta: AlgorithmMeta = serde_json::from_reader(BufReader::new(file))?;

    if meta.num_buckets == 0 {
        return Err(ParsingError::InvalidMetadata {
            path: meta_path.to_path_buf(),
            reason: "numBuckets must be positive".to_string(),
        });
    }

    Ok(meta)
}

/// Reads a raw array of 32-bit signed counts in the given byte order.
///
/// Counts must be non-negative; they are returned as unsigned occupancy values.
pub fn read_counts(path: &Path, endianness: Endianness) -> Result<Vec<u32>> {
    let bytes = fs::read(path)?;
    decode_counts(&bytes, endianness, path)
}

fn decode_counts(bytes: &[u8], endianness: Endianness, path: &Path) -> Result<Vec<u32>> {
    if bytes.len() % COUNT_SIZE != 0 {
        return Err(ParsingError::TruncatedCounts {
            path: path.to_path_buf(),
            len: bytes.len(),
        });
    }

    bytes
        .chunks_exact(COUNT_SIZE)
        .enumerate()
        .map(|(index, chunk)| {
            let value = endianness.read_i32([chunk[0], chunk[1], chunk[2], chunk[3]]);
            u32::try_from(value).map_err(|_| ParsingError::NegativeCount {
                path: path.to_path_buf(),
                index,
                value,
            })
        })
        .collect()
}

/// Loads a descriptor and its counts array, validating one against the other.
///
/// `countsFile` is resolved relative to the directory holding `meta_path`.
///
/// # Arguments
/// * `meta_path` - Path to the `<ALG>.meta.json` file
///
/// # Returns
/// * `Ok(LoadedAlgorithm)` - Descriptor and counts, with `counts.len() == numBuckets`
/// * `Err(ParsingError)` - If reading, parsing, or validation failed
pub fn load_algorithm(meta_path: &Path) -> Result<LoadedAlgorithm> {
    let meta = load_metadata(meta_path)?;

    let base_dir = meta_path.parent().unwrap_or_else(|| Path::new("."));
    let counts_path = base_dir.join(&meta.counts_file);
    let counts = read_counts(&counts_path, meta.endianness())?;

    if counts.len() as u64 != meta.num_buckets {
        return Err(ParsingError::LengthMismatch {
            path: counts_path,
            actual: counts.len(),
            expected: meta.num_buckets,
        });
    }

    Ok(LoadedAlgorithm {
        meta,
        counts,
        counts_path,
    })
}
