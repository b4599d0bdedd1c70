//! Dense row-major factor matrices, viewed in place from mapped artifacts.

use std::path::Path;

use super::artifact::{FACTOR_ALIGNMENT, FACTOR_HEADER_LEN, FactorFileHandle, parse_header};
use super::error::{ModelError, ModelResult};
use crate::constants::{BYTES_PER_MB, FACTOR_ELEM_BYTES};

/// One latent-factor matrix (theta or beta), rows x factors.
///
/// The value grid lives inside the mapped artifact; `row()` hands out
/// zero-copy slices. Rows are addressed by the dense ids the dictionaries
/// assign, which the store validates at load.
#[derive(Clone)]
pub struct FactorMatrix {
    handle: FactorFileHandle,
    name: &'static str,
    rows: usize,
    cols: usize,
}

impl std::fmt::Debug for FactorMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactorMatrix")
            .field("name", &self.name)
            .field("path", &self.handle.path())
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .finish()
    }
}

impl FactorMatrix {
    pub fn open<P: AsRef<Path>>(name: &'static str, path: P) -> ModelResult<Self> {
        let path = path.as_ref();
        let handle = FactorFileHandle::open(name, path)?;

        let (rows, cols) = parse_header(name, path, handle.as_slice())?;

        let payload = &handle.as_slice()[FACTOR_HEADER_LEN..];
        let ptr = payload.as_ptr();
        if !(ptr as usize).is_multiple_of(FACTOR_ALIGNMENT) {
            return Err(ModelError::Misaligned {
                name,
                alignment: FACTOR_ALIGNMENT,
            });
        }

        Ok(Self {
            handle,
            name,
            rows,
            cols,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The whole value grid in row-major order.
    pub fn values(&self) -> &[f32] {
        // Alignment and length were verified at open; the mapping never moves.
        bytemuck::cast_slice(&self.handle.as_slice()[FACTOR_HEADER_LEN..])
    }

    /// One row as a factor vector. `index` must be below `rows()`.
    pub fn row(&self, index: usize) -> &[f32] {
        debug_assert!(
            index < self.rows,
            "row {index} out of range for '{}' with {} rows",
            self.name,
            self.rows
        );
        let start = index * self.cols;
        &self.values()[start..start + self.cols]
    }

    /// Copies one row into an owned vector.
    pub fn row_to_vec(&self, index: usize) -> Vec<f32> {
        self.row(index).to_vec()
    }

    /// Rejects non-finite or negative values anywhere in the grid.
    ///
    /// Factors are Gamma posterior means; anything outside `[0, +inf)` means
    /// the artifact is corrupt or was produced by a different trainer.
    pub fn check_values(&self) -> ModelResult<()> {
        for (i, &value) in self.values().iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidFactor {
                    name: self.name,
                    row: i / self.cols,
                    col: i % self.cols,
                    value,
                });
            }
        }
        Ok(())
    }

    /// Per-column sums over all rows, validating values in the same pass.
    ///
    /// Fold-in needs these as the catalog-wide rate term, so they are
    /// computed once at load rather than per request.
    pub fn column_sums_checked(&self) -> ModelResult<Vec<f32>> {
        let mut sums = vec![0.0f32; self.cols];
        for (i, &value) in self.values().iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidFactor {
                    name: self.name,
                    row: i / self.cols,
                    col: i % self.cols,
                    value,
                });
            }
            sums[i % self.cols] += value;
        }
        Ok(sums)
    }

    pub fn footprint_bytes(&self) -> usize {
        self.rows * self.cols * FACTOR_ELEM_BYTES
    }

    pub fn size_mb(&self) -> f64 {
        self.footprint_bytes() as f64 / BYTES_PER_MB
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::artifact::write_factor_file;
    use tempfile::TempDir;

    fn write_matrix(dir: &TempDir, rows: usize, cols: usize, values: &[f32]) -> FactorMatrix {
        let path = dir.path().join("m.lfm");
        write_factor_file(&path, rows, cols, values).expect("write should succeed");
        FactorMatrix::open("m", &path).expect("open should succeed")
    }

    #[test]
    fn test_open_exposes_shape_and_rows() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 3, 2, &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);

        assert_eq!(matrix.rows(), 3);
        assert_eq!(matrix.cols(), 2);
        assert_eq!(matrix.row(0), &[0.0, 1.0]);
        assert_eq!(matrix.row(2), &[4.0, 5.0]);
    }

    #[test]
    fn test_column_sums() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 3, 2, &[1.0, 0.5, 2.0, 0.25, 3.0, 0.125]);

        let sums = matrix.column_sums_checked().expect("values are valid");
        assert_eq!(sums, vec![6.0, 0.875]);
    }

    #[test]
    fn test_check_values_rejects_nan() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 2, 2, &[1.0, f32::NAN, 2.0, 3.0]);

        let err = matrix.check_values().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidFactor { row: 0, col: 1, .. }
        ));
    }

    #[test]
    fn test_check_values_rejects_negative() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 2, 2, &[1.0, 2.0, -0.5, 3.0]);

        let err = matrix.column_sums_checked().unwrap_err();
        assert!(matches!(
            err,
            ModelError::InvalidFactor { row: 1, col: 0, .. }
        ));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_row_out_of_range_panics() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 2, 2, &[0.0, 1.0, 2.0, 3.0]);

        let _ = matrix.row(2);
    }

    #[test]
    fn test_footprint_reporting() {
        let dir = TempDir::new().expect("temp dir should be created");
        let matrix = write_matrix(&dir, 4, 2, &[0.5; 8]);

        assert_eq!(matrix.footprint_bytes(), 32);
        assert_eq!(matrix.size_mb(), 32.0 / (1024.0 * 1024.0));
    }

    #[test]
    fn test_empty_matrix_container_is_readable() {
        // Zero rows is a legal container; the store rejects it later against
        // dictionary sizes, not at the container level.
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("m.lfm");
        write_factor_file(&path, 0, 3, &[]).expect("write should succeed");

        let matrix = FactorMatrix::open("m", &path).expect("open should succeed");
        assert_eq!(matrix.rows(), 0);
        assert_eq!(matrix.values().len(), 0);
    }
}
