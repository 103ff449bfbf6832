//! one npz archive holding a generated data set

use std::{fs::File, path::Path};

use ndarray::Array2;
use ndarray_npy::NpzWriter;
use num_complex::Complex;

use crate::{
    error::Result,
    params::ParameterTable,
    spectrogram::Spectrogram,
    strain::{pad_strain, real_part},
};

/// `parameters` (n x 5), `strain_re` (n x pad_len) and the time-major `spectrogram` of the last data set
pub fn write_dataset<P: AsRef<Path>>(
    path: P,
    table: &ParameterTable,
    strains: &[Vec<Complex<f64>>],
    pad_len: usize,
    spec: &Spectrogram,
) -> Result<()> {
    let mut strain_re = Array2::<f64>::zeros((strains.len(), pad_len));
    for (mut row, h) in strain_re.rows_mut().into_iter().zip(strains) {
        row.iter_mut()
            .zip(pad_strain(&real_part(h), pad_len))
            .for_each(|(a, b)| *a = b);
    }

    let mut npz = NpzWriter::new(File::create(path)?);
    npz.add_array("parameters", &table.to_array())?;
    npz.add_array("strain_re", &strain_re)?;
    npz.add_array("spectrogram", &spec.data)?;
    npz.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterRecord;

    #[test]
    fn writes_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("set.npz");
        let table = ParameterTable::new(vec![ParameterRecord::default(); 2]);
        let strains = vec![vec![Complex::new(1.0, 0.0); 3], vec![Complex::new(2.0, 0.0); 5]];
        let spec = Spectrogram {
            data: Array2::ones((2, 3)),
            dt_bin: 1.0,
            df: 1.0,
        };
        write_dataset(&path, &table, &strains, 4, &spec).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
