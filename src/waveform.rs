//! the boundary to waveform generators: source description, the generator trait and stored strains

use std::path::PathBuf;

use log::debug;
use num_complex::Complex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    cfg::{GeneratorCfg, SourceCfg},
    chirp::QuadrupoleChirp,
    error::{Error, Result},
    params::ParameterRecord,
    strain::read_strain_csv,
};

/// seconds per sidereal year
pub const YEAR: f64 = 31558149.763545603;
/// G M_sun / c^3 in seconds
pub const MTSUN: f64 = 4.925491025543576e-6;
pub const C_SI: f64 = 299792458.0;
pub const GPC: f64 = 3.0856775814913673e25;

/// everything a generator needs to know about one EMRI
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct SourceParams {
    /// central mass in solar masses
    pub m: f64,
    /// compact object mass in solar masses
    pub mu: f64,
    pub a: f64,
    pub p0: f64,
    pub e0: f64,
    pub x0: f64,
    /// distance in Gpc
    pub dist: f64,
    pub q_s: f64,
    pub phi_s: f64,
    pub q_k: f64,
    pub phi_k: f64,
    pub phi_phi0: f64,
    pub phi_theta0: f64,
    pub phi_r0: f64,
}

impl SourceParams {
    pub fn from_record(r: &ParameterRecord, cfg: &SourceCfg) -> Self {
        SourceParams {
            m: r.mass,
            mu: cfg.mu,
            a: r.spin,
            p0: r.separation,
            e0: r.eccentricity,
            x0: cfg.x0,
            dist: r.distance,
            q_s: cfg.q_s,
            phi_s: cfg.phi_s,
            q_k: cfg.q_k,
            phi_k: cfg.phi_k,
            phi_phi0: cfg.phi_phi0,
            phi_theta0: cfg.phi_theta0,
            phi_r0: cfg.phi_r0,
        }
    }
}

/// number of samples in `t_obs` years at spacing `dt` seconds
pub fn nsamples(t_obs: f64, dt: f64) -> usize {
    (t_obs * YEAR / dt) as usize + 1
}

pub trait WaveformGenerator {
    /// strain h = h+ - i hx of data set number `n`, at most `t_obs` years long with spacing `dt` seconds
    fn generate(&self, n: usize, src: &SourceParams, t_obs: f64, dt: f64) -> Result<Vec<Complex<f64>>>;
}

/// strains of all records, in record order
pub fn gen_strain<G>(gen: &G, records: &[ParameterRecord], cfg: &SourceCfg) -> Result<Vec<Vec<Complex<f64>>>>
where
    G: WaveformGenerator + Sync + ?Sized,
{
    records
        .par_iter()
        .enumerate()
        .map(|(n, r)| {
            let src = SourceParams::from_record(r, cfg);
            let h = gen.generate(n, &src, cfg.t_obs, cfg.dt)?;
            debug!("data set {}: {} samples", n, h.len());
            Ok(h)
        })
        .collect()
}

/// strains generated earlier and stored as `h_{:05}.csv`
pub struct StrainArchive {
    pub dir: PathBuf,
}

impl StrainArchive {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        StrainArchive { dir: dir.into() }
    }

    pub fn path_of(&self, n: usize) -> PathBuf {
        self.dir.join(format!("h_{:05}.csv", n))
    }
}

impl WaveformGenerator for StrainArchive {
    fn generate(&self, n: usize, _src: &SourceParams, t_obs: f64, dt: f64) -> Result<Vec<Complex<f64>>> {
        let path = self.path_of(n);
        let mut h = read_strain_csv(&path).map_err(|e| Error::Waveform(format!("{}: {}", path.display(), e)))?;
        h.truncate(nsamples(t_obs, dt));
        Ok(h)
    }
}

pub fn build_generator(cfg: &GeneratorCfg) -> Box<dyn WaveformGenerator + Sync> {
    match cfg {
        GeneratorCfg::QuadrupoleChirp => Box::new(QuadrupoleChirp),
        GeneratorCfg::Archive { dir } => Box::new(StrainArchive::new(dir)),
    }
}
