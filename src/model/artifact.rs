//! Versioned on-disk container for factor matrices.
//!
//! Layout (all integers little-endian):
//!
//! | offset | size | field                  |
//! |--------|------|------------------------|
//! | 0      | 4    | magic `LFM1`           |
//! | 4      | 4    | element width (u32, 4) |
//! | 8      | 8    | rows (u64)             |
//! | 16     | 8    | cols (u64)             |
//! | 24     | ..   | rows x cols f32 values |
//!
//! The 24-byte header keeps the payload 4-byte aligned relative to the
//! page-aligned mapping base, so the value grid can be viewed in place as
//! `&[f32]` without copying. This layout is the contract with the training
//! pipeline that emits the artifacts.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use memmap2::Mmap;

use super::error::{ModelError, ModelResult};
use crate::constants::FACTOR_ELEM_BYTES;

pub const FACTOR_MAGIC: [u8; 4] = *b"LFM1";
pub const FACTOR_HEADER_LEN: usize = 24;
pub const FACTOR_ALIGNMENT: usize = align_of::<f32>();

/// Read-only shared mapping of one artifact file.
///
/// Cloning is cheap; all clones view the same immutable mapping. The file is
/// never written through this handle.
#[derive(Clone)]
pub struct FactorFileHandle {
    inner: Arc<Mmap>,
    path: Arc<PathBuf>,
}

impl std::fmt::Debug for FactorFileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactorFileHandle")
            .field("path", &self.path)
            .field("len", &self.len())
            .finish()
    }
}

impl FactorFileHandle {
    pub fn open<P: AsRef<Path>>(name: &'static str, path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| map_io(name, path, e))?;

        let metadata = file.metadata().map_err(|e| map_io(name, path, e))?;
        if metadata.len() == 0 {
            return Err(ModelError::EmptyArtifact {
                name,
                path: path.to_path_buf(),
            });
        }

        // SAFETY: We ensure the file exists and is readable. Artifacts are
        // immutable once published; the caller must not modify them while
        // mapped. The Arc wrapper provides thread-safe shared access.
        let mmap = unsafe { Mmap::map(&file).map_err(|e| map_io(name, path, e))? };

        Ok(Self {
            inner: Arc::new(mmap),
            path: Arc::new(path.to_path_buf()),
        })
    }

    pub fn as_slice(&self) -> &[u8] {
        self.inner.deref()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub(crate) fn map_io(name: &'static str, path: &Path, source: io::Error) -> ModelError {
    if source.kind() == io::ErrorKind::NotFound {
        ModelError::ArtifactMissing {
            name,
            path: path.to_path_buf(),
        }
    } else {
        ModelError::Io {
            name,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Parses and validates the container header, returning `(rows, cols)`.
pub fn parse_header(name: &'static str, path: &Path, bytes: &[u8]) -> ModelResult<(usize, usize)> {
    if bytes.len() < FACTOR_HEADER_LEN {
        return Err(ModelError::TruncatedArtifact {
            name,
            expected: FACTOR_HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let magic: [u8; 4] = bytes[0..4].try_into().expect("slice length checked");
    if magic != FACTOR_MAGIC {
        return Err(ModelError::BadMagic {
            name,
            path: path.to_path_buf(),
            found: magic,
        });
    }

    let width = u32::from_le_bytes(bytes[4..8].try_into().expect("slice length checked"));
    if width as usize != FACTOR_ELEM_BYTES {
        return Err(ModelError::UnsupportedElemWidth { name, width });
    }

    let rows = u64::from_le_bytes(bytes[8..16].try_into().expect("slice length checked"));
    let cols = u64::from_le_bytes(bytes[16..24].try_into().expect("slice length checked"));

    // Shape fields are untrusted input; the size arithmetic must not wrap.
    let expected = rows
        .checked_mul(cols)
        .and_then(|elems| elems.checked_mul(FACTOR_ELEM_BYTES as u64))
        .and_then(|payload| payload.checked_add(FACTOR_HEADER_LEN as u64))
        .and_then(|total| usize::try_from(total).ok())
        .ok_or(ModelError::OversizedShape { name, rows, cols })?;

    if bytes.len() != expected {
        return Err(ModelError::TruncatedArtifact {
            name,
            expected,
            actual: bytes.len(),
        });
    }

    Ok((rows as usize, cols as usize))
}

/// Writes a factor container, then reopens it as a read-only handle.
///
/// This is the writer side of the artifact contract; the training pipeline
/// and test fixtures produce files this way.
pub fn write_factor_file<P: AsRef<Path>>(
    path: P,
    rows: usize,
    cols: usize,
    values: &[f32],
) -> ModelResult<FactorFileHandle> {
    let path = path.as_ref();

    if rows.checked_mul(cols) != Some(values.len()) {
        return Err(ModelError::WriteShapeMismatch {
            rows,
            cols,
            actual: values.len(),
        });
    }

    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| map_io("factor write", path, e))?;

    let mut header = [0u8; FACTOR_HEADER_LEN];
    header[0..4].copy_from_slice(&FACTOR_MAGIC);
    header[4..8].copy_from_slice(&(FACTOR_ELEM_BYTES as u32).to_le_bytes());
    header[8..16].copy_from_slice(&(rows as u64).to_le_bytes());
    header[16..24].copy_from_slice(&(cols as u64).to_le_bytes());

    file.write_all(&header)
        .map_err(|e| map_io("factor write", path, e))?;
    file.write_all(bytemuck::cast_slice(values))
        .map_err(|e| map_io("factor write", path, e))?;
    file.flush().map_err(|e| map_io("factor write", path, e))?;
    drop(file);

    FactorFileHandle::open("factor write", path)
}
