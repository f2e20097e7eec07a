use core::fmt;
use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use anyhow::Context as _;
use mviz_analysis::{Feature, bars::matrix_from_rows};
use ndarray::Array2;
use ndarray_npy::ReadNpyExt;

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)
    }
}

/// Read a feature matrix from disk.
///
/// `.npy` files are read as a 2D `f64` array, anything else is parsed as a
/// JSON array of equally long rows.
pub fn load_feature_matrix(path: &Path) -> anyhow::Result<Array2<Feature>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_npy = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("npy"));

    let matrix = if is_npy {
        Array2::<Feature>::read_npy(reader)
            .with_context(|| format!("failed to read {} as a 2D float64 array", path.display()))?
    } else {
        let rows: Vec<Vec<Feature>> = serde_json::from_reader(reader)
            .with_context(|| format!("failed to parse {} as JSON rows", path.display()))?;
        matrix_from_rows(rows).with_context(|| format!("invalid matrix in {}", path.display()))?
    };

    log::debug!(
        "Loaded a {:?} feature matrix from {}",
        matrix.dim(),
        path.display()
    );

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use ndarray_npy::WriteNpyExt;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_json_matrix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("chroma.json");
        std::fs::write(&path, "[[1, 2, 3], [4, 5, 6]]").unwrap();

        let matrix = load_feature_matrix(&path).unwrap();
        assert_eq!(matrix, arr2(&[[1., 2., 3.], [4., 5., 6.]]));
    }

    #[test]
    fn test_load_npy_matrix() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("chroma.NPY");
        let expected = arr2(&[[0.25, 0.5], [0.75, 1.0], [0., 0.]]);
        expected.write_npy(File::create(&path).unwrap()).unwrap();

        let matrix = load_feature_matrix(&path).unwrap();
        assert_eq!(matrix, expected);
    }

    #[test]
    fn test_load_ragged_json_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("chroma.json");
        std::fs::write(&path, "[[1, 2, 3], [4, 5]]").unwrap();

        let err = load_feature_matrix(&path).unwrap_err();
        assert!(format!("{err:#}").contains("ragged"), "{err:#}");
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nope.json");

        let err = load_feature_matrix(&path).unwrap_err();
        assert!(err.to_string().starts_with("failed to open"), "{err}");
    }
}
