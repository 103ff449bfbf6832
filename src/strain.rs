//! complex strain series and their text files

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use num_complex::Complex;

use crate::{
    error::{Error, Result},
    traits::ToReal,
};

/// right-pad with zeros, or truncate, so that exactly `len` samples remain
pub fn pad_strain<T>(h: &[T], len: usize) -> Vec<T>
where
    T: Copy + Default,
{
    let mut result: Vec<T> = h.iter().take(len).cloned().collect();
    result.resize(len, T::default());
    result
}

pub fn real_part<R>(h: &[R]) -> Vec<f64>
where
    R: ToReal<f64>,
{
    h.iter().map(|x| x.to_real()).collect()
}

/// parse a complex number as written by numpy, e.g. `(1.5e-25-2e-26j)`, `3+4j`, `-2j` or `0.5`
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    let s = s.trim();
    let s = s
        .strip_prefix('(')
        .and_then(|x| x.strip_suffix(')'))
        .unwrap_or(s)
        .trim();
    if s.is_empty() {
        return None;
    }
    let body = match s.strip_suffix('j').or_else(|| s.strip_suffix('i')) {
        Some(b) => b,
        None => return s.parse::<f64>().ok().map(|re| Complex::new(re, 0.0)),
    };

    // split at the last sign which is not the sign of an exponent or a leading sign
    let bytes = body.as_bytes();
    let split = (1..bytes.len())
        .rev()
        .find(|&i| (bytes[i] == b'+' || bytes[i] == b'-') && !matches!(bytes[i - 1], b'e' | b'E'));
    match split {
        Some(i) => {
            let re = body[..i].parse::<f64>().ok()?;
            let im = body[i..].parse::<f64>().ok()?;
            Some(Complex::new(re, im))
        }
        None => body.parse::<f64>().ok().map(|im| Complex::new(0.0, im)),
    }
}

pub fn format_complex(x: &Complex<f64>) -> String {
    format!("({:.18e}{:+.18e}j)", x.re, x.im)
}

/// read one complex sample per line, the first column counts if a line carries several
pub fn read_strain_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Complex<f64>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;
    let mut result = Vec::new();
    for (n, record) in rdr.records().enumerate() {
        let record = record?;
        let token = match record.get(0) {
            Some(t) if !t.trim().is_empty() => t,
            _ => continue,
        };
        let x = parse_complex(token).ok_or_else(|| Error::Parse {
            line: record.position().map_or(n + 1, |p| p.line() as usize),
            token: token.to_string(),
        })?;
        result.push(x);
    }
    Ok(result)
}

pub fn write_strain_csv<P: AsRef<Path>>(path: P, h: &[Complex<f64>]) -> Result<()> {
    let mut f = BufWriter::new(File::create(path)?);
    for x in h {
        writeln!(f, "{}", format_complex(x))?;
    }
    f.flush()?;
    Ok(())
}
