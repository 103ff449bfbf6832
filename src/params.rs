//! EMRI parameter records, random sampling and the parameter csv files

use std::path::Path;

use log::info;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    cfg::{ParameterSource, PerturbationCfg},
    error::{Error, Result},
};

pub const NCOLS: usize = 5;

/// one data set: (mass, distance, spin, eccentricity, separation)
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy, Default)]
pub struct ParameterRecord {
    /// mass of the central black hole in solar masses
    pub mass: f64,
    /// luminosity distance in Gpc
    pub distance: f64,
    /// dimensionless spin
    pub spin: f64,
    /// initial eccentricity
    pub eccentricity: f64,
    /// initial semi-latus rectum in units of the central mass
    pub separation: f64,
}

impl ParameterRecord {
    pub fn as_array(&self) -> [f64; NCOLS] {
        [
            self.mass,
            self.distance,
            self.spin,
            self.eccentricity,
            self.separation,
        ]
    }

    pub fn from_array(x: [f64; NCOLS]) -> Self {
        ParameterRecord {
            mass: x[0],
            distance: x[1],
            spin: x[2],
            eccentricity: x[3],
            separation: x[4],
        }
    }

    pub fn mass_exponent(&self) -> f64 {
        self.mass.log10()
    }
}

/// draw `n` records, the mass is log-uniform in [1e4, 1e7]
pub fn gen_parameters<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<ParameterRecord> {
    (0..n)
        .map(|_| ParameterRecord {
            mass: 10f64.powf(rng.gen_range(4.0..=7.0)),
            distance: rng.gen_range(1.0..=1e2),
            spin: rng.gen_range(0.0..=1.0),
            eccentricity: rng.gen_range(0.1..=0.7),
            separation: rng.gen_range(10.0..=16.0),
        })
        .collect()
}

/// scale of the mass column
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
pub enum MassScale {
    Linear,
    Log10,
}

/// how rows of several files are combined
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Accumulate {
    /// append the rows of every file
    Concat,
    /// every file replaces the previous one, only the last survives
    LastOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    pub records: Vec<ParameterRecord>,
    scale: MassScale,
}

impl ParameterTable {
    pub fn new(records: Vec<ParameterRecord>) -> Self {
        ParameterTable {
            records,
            scale: MassScale::Linear,
        }
    }

    pub fn read_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let records = rdr
            .deserialize()
            .collect::<std::result::Result<Vec<ParameterRecord>, _>>()?;
        Ok(ParameterTable::new(records))
    }

    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        for r in &self.records {
            wtr.serialize(r)?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn scale(&self) -> MassScale {
        self.scale
    }

    /// replace the mass column by its log10
    /// returns false and leaves the table untouched if it is already in log scale
    pub fn log_mass(&mut self) -> bool {
        if self.scale == MassScale::Log10 {
            return false;
        }
        self.records
            .iter_mut()
            .for_each(|r| r.mass = r.mass.log10());
        self.scale = MassScale::Log10;
        true
    }

    pub fn column(&self, i: usize) -> Vec<f64> {
        self.records.iter().map(|r| r.as_array()[i]).collect()
    }

    /// (min, max) of every column
    pub fn min_max(&self) -> Vec<(f64, f64)> {
        (0..NCOLS)
            .map(|i| {
                self.column(i)
                    .into_iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                        (lo.min(x), hi.max(x))
                    })
            })
            .collect()
    }

    pub fn to_array(&self) -> Array2<f64> {
        let mut result = Array2::zeros((self.len(), NCOLS));
        for (mut row, r) in result.rows_mut().into_iter().zip(&self.records) {
            row.iter_mut().zip(r.as_array()).for_each(|(a, b)| *a = b);
        }
        result
    }

    pub fn append(&mut self, other: ParameterTable) -> Result<()> {
        if other.scale != self.scale {
            return Err(Error::Shape(
                "cannot append tables with different mass scales".to_string(),
            ));
        }
        self.records.extend(other.records);
        Ok(())
    }
}

/// load several parameter files into one table
pub fn load_tables<P: AsRef<Path>>(paths: &[P], acc: Accumulate) -> Result<ParameterTable> {
    let mut table = ParameterTable::new(Vec::new());
    for p in paths {
        let t = ParameterTable::read_csv(p)?;
        info!("{} rows from {}", t.len(), p.as_ref().display());
        match acc {
            Accumulate::Concat => table.append(t)?,
            Accumulate::LastOnly => table = t,
        }
    }
    Ok(table)
}

/// shift `base` along every fitted correlation, the result starts with `base` itself
pub fn perturb_along_correlations(
    base: &ParameterRecord,
    perturbations: &[PerturbationCfg],
) -> Result<Vec<ParameterRecord>> {
    std::iter::once(Ok(*base))
        .chain(perturbations.iter().map(|p| {
            let (x, y) = p.cols;
            if x >= NCOLS || y >= NCOLS {
                return Err(Error::Shape(format!(
                    "perturbation columns ({}, {}) outside the {} parameter columns",
                    x, y, NCOLS
                )));
            }
            let dx = p.span / 2.0;
            let dy = p.slope * dx + p.intercept;
            let mut v = base.as_array();
            if x != 0 {
                v[x] += dx;
            } else {
                v[x] *= 10f64.powf(dx);
            }
            v[y] += dy;
            Ok(ParameterRecord::from_array(v))
        }))
        .collect()
}

/// the records described by a parameter source, `rng` only serves random draws
pub fn resolve_parameters<R: Rng + ?Sized>(src: &ParameterSource, rng: &mut R) -> Result<ParameterTable> {
    match src {
        ParameterSource::Random { n, .. } => Ok(ParameterTable::new(gen_parameters(*n, rng))),
        ParameterSource::Perturbed {
            file,
            row,
            perturbations,
        } => {
            let t = ParameterTable::read_csv(file)?;
            let base = t.records.get(*row).ok_or_else(|| {
                Error::Shape(format!("{} has no row {}", file, row))
            })?;
            Ok(ParameterTable::new(perturb_along_correlations(
                base,
                perturbations,
            )?))
        }
        ParameterSource::Files { files } => load_tables(files, Accumulate::Concat),
    }
}
