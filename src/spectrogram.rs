//! amplitude spectrograms: Welch-averaged one-sided spectral densities over consecutive strides

use std::path::Path;

use ndarray::{parallel::prelude::*, Array1, Array2, Axis};
use num_complex::Complex;
use rustfft::FftPlanner;

use crate::{
    cfg::SpectrogramCfg,
    error::{Error, Result},
    strain::{pad_strain, real_part},
    traits::ToReal,
    utils::{finite_max, rfftfreq, transpose_par},
    window_funcs::{apply_window, Window},
};

/// time-major grid, `data[[i, j]]` is time bin `i` and frequency bin `j`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub data: Array2<f64>,
    /// length of a time bin in seconds
    pub dt_bin: f64,
    /// frequency resolution in Hz
    pub df: f64,
}

impl Spectrogram {
    pub fn ntime(&self) -> usize {
        self.data.shape()[0]
    }

    pub fn nfreq(&self) -> usize {
        self.data.shape()[1]
    }

    pub fn times(&self) -> Vec<f64> {
        (0..self.ntime()).map(|i| i as f64 * self.dt_bin).collect()
    }

    pub fn frequencies(&self) -> Vec<f64> {
        (0..self.nfreq()).map(|i| i as f64 * self.df).collect()
    }

    pub fn max(&self) -> f64 {
        finite_max(self.data.iter())
    }

    /// frequency-major copy, the layout used for plotting
    pub fn transposed(&self) -> Array2<f64> {
        transpose_par(self.data.view())
    }

    /// one time bin per line
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;
        for row in self.data.rows() {
            wtr.write_record(row.iter().map(|x| format!("{:.18e}", x)))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn read_csv<P: AsRef<Path>>(path: P, dt_bin: f64, df: f64) -> Result<Spectrogram> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut values = Vec::new();
        let mut ncols = 0;
        let mut nrows = 0;
        for (n, rec) in rdr.records().enumerate() {
            let rec = rec?;
            ncols = rec.len();
            for token in rec.iter() {
                let x = token.parse::<f64>().map_err(|_| Error::Parse {
                    line: n + 1,
                    token: token.to_string(),
                })?;
                values.push(x);
            }
            nrows += 1;
        }
        let data = Array2::from_shape_vec((nrows, ncols), values)
            .map_err(|e| Error::Shape(e.to_string()))?;
        Ok(Spectrogram { data, dt_bin, df })
    }
}

/// Welch estimate of the one-sided power spectral density of `x`
/// `nfft` long segments overlap by `noverlap` samples, each has its mean removed before windowing
pub fn welch_psd(x: &[f64], sample_dt: f64, nfft: usize, noverlap: usize, window: Window) -> Array1<f64> {
    assert!(nfft > 0 && noverlap < nfft);
    let w = window.coeff::<f64>(nfft);
    let fft = FftPlanner::<f64>::new().plan_fft_forward(nfft);
    let fs = 1.0 / sample_dt;
    let scale = 1.0 / (fs * w.iter().map(|a| a * a).sum::<f64>());
    let hop = nfft - noverlap;
    let nseg = if x.len() < nfft {
        0
    } else {
        (x.len() - nfft) / hop + 1
    };
    let nf = nfft / 2 + 1;
    let mut psd = Array1::<f64>::zeros(nf);
    if nseg == 0 {
        return psd;
    }

    let mut seg = vec![0.0; nfft];
    let mut buf = vec![Complex::<f64>::new(0.0, 0.0); nfft];
    for s in 0..nseg {
        seg.copy_from_slice(&x[s * hop..s * hop + nfft]);
        let mean = seg.iter().sum::<f64>() / nfft as f64;
        seg.iter_mut().for_each(|v| *v -= mean);
        apply_window(&mut seg, &w);
        buf.iter_mut()
            .zip(&seg)
            .for_each(|(b, &v)| *b = Complex::new(v, 0.0));
        fft.process(&mut buf);
        psd.iter_mut()
            .zip(&buf[..nf])
            .for_each(|(p, b)| *p += b.norm_sqr());
    }

    psd.iter_mut().enumerate().for_each(|(i, p)| {
        // the nyquist bin of an even length has no negative counterpart
        let one_sided = if i == 0 || (nfft % 2 == 0 && i == nf - 1) {
            1.0
        } else {
            2.0
        };
        *p *= one_sided * scale / nseg as f64;
    });
    psd
}

/// amplitude spectrogram of `x`, sampled every `sample_dt` seconds
/// every `stride` seconds of signal yields one time bin, a trailing partial stride is dropped
pub fn spectrogram<R>(
    x: &[R],
    sample_dt: f64,
    stride: f64,
    fftlength: Option<f64>,
    overlap: Option<f64>,
    window: Window,
) -> Result<Spectrogram>
where
    R: ToReal<f64>,
{
    let nstride = (stride / sample_dt).round() as usize;
    let nfft = fftlength
        .map(|l| (l / sample_dt).round() as usize)
        .unwrap_or(nstride);
    let noverlap = overlap
        .map(|o| (o / sample_dt).round() as usize)
        .unwrap_or(nfft / 2);
    if nstride == 0 || nfft == 0 || nfft > nstride || noverlap >= nfft {
        return Err(Error::Shape(format!(
            "stride of {} samples cannot hold ffts of {} samples overlapping by {}",
            nstride, nfft, noverlap
        )));
    }

    let x = real_part(x);
    let nsteps = x.len() / nstride;
    let nf = nfft / 2 + 1;
    let mut data = Array2::<f64>::zeros((nsteps, nf));
    data.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let psd = welch_psd(
                &x[i * nstride..(i + 1) * nstride],
                sample_dt,
                nfft,
                noverlap,
                window,
            );
            row.assign(&psd.mapv(f64::sqrt));
        });

    let df = rfftfreq(nfft, sample_dt).get(1).cloned().unwrap_or(0.0);
    Ok(Spectrogram {
        data,
        dt_bin: nstride as f64 * sample_dt,
        df,
    })
}

/// pad every strain to the common length and compute its spectrogram from the plus polarisation
pub fn gen_specs(
    strains: &[Vec<Complex<f64>>],
    sample_dt: f64,
    cfg: &SpectrogramCfg,
) -> Result<Vec<Spectrogram>> {
    let window: Window = cfg.window.parse()?;
    strains
        .iter()
        .map(|h| {
            let hp = pad_strain(&real_part(h), cfg.pad_len);
            spectrogram(
                &hp,
                sample_dt,
                cfg.stride,
                cfg.fftlength,
                cfg.overlap,
                window,
            )
        })
        .collect()
}

/// largest value over a set of spectrograms
pub fn global_max(specs: &[Spectrogram]) -> f64 {
    specs
        .iter()
        .map(|s| s.max())
        .fold(f64::NAN, f64::max)
}
