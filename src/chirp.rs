//! leading order inspiral waveform
//!
//! The orbit is circular with the semi-major axis of the initial orbit, shrinks by quadrupole
//! radiation reaction and stops at the prograde innermost stable circular orbit of the central
//! black hole. It is a stand-in for a full EMRI waveform model and carries no eccentricity
//! or spin precession.

use num_complex::Complex;

use crate::{
    error::{Error, Result},
    oscillator::COscillator,
    waveform::{nsamples, SourceParams, WaveformGenerator, C_SI, GPC, MTSUN},
};

/// radius of the prograde innermost stable circular orbit in units of the central mass
pub fn r_isco(a: f64) -> f64 {
    let a = a.clamp(0.0, 1.0);
    let z1 = 1.0 + (1.0 - a * a).cbrt() * ((1.0 + a).cbrt() + (1.0 - a).cbrt());
    let z2 = (3.0 * a * a + z1 * z1).sqrt();
    3.0 + z2 - ((3.0 - z1) * (3.0 + z1 + 2.0 * z2)).sqrt()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QuadrupoleChirp;

impl QuadrupoleChirp {
    /// orbital radius in seconds after `t` seconds, None after the plunge
    fn radius(r0: f64, rate: f64, t: f64, r_end: f64) -> Option<f64> {
        let r4 = r0.powi(4) - rate * t;
        if r4 <= r_end.powi(4) {
            None
        } else {
            Some(r4.powf(0.25))
        }
    }
}

impl WaveformGenerator for QuadrupoleChirp {
    fn generate(&self, _n: usize, src: &SourceParams, t_obs: f64, dt: f64) -> Result<Vec<Complex<f64>>> {
        if !(src.e0 >= 0.0 && src.e0 < 1.0) || src.m <= 0.0 || src.mu <= 0.0 || src.dist <= 0.0 {
            return Err(Error::Waveform(format!("unphysical source {:?}", src)));
        }
        let m = src.m * MTSUN;
        let mu = src.mu * MTSUN;
        let d = src.dist * GPC / C_SI;
        let r0 = src.p0 / (1.0 - src.e0 * src.e0) * m;
        let r_end = r_isco(src.a) * m;
        if r0 <= r_end {
            return Err(Error::Waveform(format!(
                "initial orbit {} M is inside the isco at {} M",
                r0 / m,
                r_end / m
            )));
        }
        let rate = 256.0 / 5.0 * mu * m * m;
        let ci = src.q_k.cos();
        let plus = (1.0 + ci * ci) / 2.0;

        let n = nsamples(t_obs, dt);
        let mut osc = COscillator::new(2.0 * src.phi_phi0, 0.0);
        let mut h = Vec::with_capacity(n);
        for i in 0..n {
            let r = match Self::radius(r0, rate, i as f64 * dt, r_end) {
                Some(r) => r,
                None => break,
            };
            let omega = (m / r.powi(3)).sqrt();
            let ampl = 4.0 * mu * m / (r * d);
            osc.set_rate(2.0 * omega * dt);
            let z = osc.get();
            h.push(Complex::new(ampl * plus * z.re, -ampl * ci * z.im));
        }
        Ok(h)
    }
}
