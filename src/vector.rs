//! Dense vector objects and vector-file loading

use crate::error::{LcError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// A point in `R^d` with `f32` components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    data: Vec<f32>,
}

impl Vector {
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn has_same_dimension(&self, other: &Vector) -> bool {
        self.dimension() == other.dimension()
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Parses comma-separated components, e.g. `"1.0, 2.5, -3"`.
///
/// NaN and infinite components are rejected: they make every distance
/// involving the vector non-finite, which defeats triangle-inequality pruning.
impl FromStr for Vector {
    type Err = LcError;

    fn from_str(s: &str) -> Result<Self> {
        let mut data = Vec::new();
        for field in s.split(',') {
            let field = field.trim();
            let x: f32 = field.parse().map_err(|_| LcError::InvalidVector {
                reason: format!("not a number: {:?}", field),
            })?;
            if !x.is_finite() {
                return Err(LcError::InvalidVector {
                    reason: format!("non-finite component {}", field),
                });
            }
            data.push(x);
        }
        Ok(Vector::new(data))
    }
}

/// Read a vector file: one comma-separated vector per line.
///
/// Blank lines and lines starting with `#` are skipped. All vectors must
/// share the dimension of the first one.
pub fn read_vectors(path: impl AsRef<Path>) -> Result<Vec<Vector>> {
    let text = fs::read_to_string(path)?;
    let mut vectors: Vec<Vector> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let v: Vector = line.parse().map_err(|e| match e {
            LcError::InvalidVector { reason } => LcError::InvalidVector {
                reason: format!("line {}: {}", lineno + 1, reason),
            },
            other => other,
        })?;
        if let Some(first) = vectors.first() {
            if !first.has_same_dimension(&v) {
                return Err(LcError::DimensionMismatch {
                    expected: first.dimension(),
                    actual: v.dimension(),
                });
            }
        }
        vectors.push(v);
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_vector_creation() {
        let v = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_str() {
        let v: Vector = "1.0, 2.0, 3.0".parse().unwrap();
        assert_eq!(v.dimension(), 3);
        assert_eq!(v.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_str_invalid() {
        let r: Result<Vector> = "1.0, abc".parse();
        assert!(matches!(r, Err(LcError::InvalidVector { .. })));
    }

    #[test]
    fn test_from_str_rejects_non_finite() {
        assert!("1.0, NaN".parse::<Vector>().is_err());
        assert!("inf, 2.0".parse::<Vector>().is_err());
    }

    #[test]
    fn test_read_vectors_skips_comments() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# two points").unwrap();
        writeln!(file, "0.0, 1.0").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "2.0, 3.0").unwrap();

        let vectors = read_vectors(file.path()).unwrap();
        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1].as_slice(), &[2.0, 3.0]);
    }

    #[test]
    fn test_read_vectors_dimension_mismatch() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0.0, 1.0").unwrap();
        writeln!(file, "2.0, 3.0, 4.0").unwrap();

        assert!(matches!(
            read_vectors(file.path()),
            Err(LcError::DimensionMismatch { expected: 2, actual: 3 })
        ));
    }
}
