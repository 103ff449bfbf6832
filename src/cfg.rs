//! This module contains a set of cfg structs, from which the plotting and generating tools are driven
//! It is convient to keep the hard-wired paths of each figure in yaml files on disks

use std::{fs::File, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{error::Result, params::Accumulate};

/// read any cfg struct from a yaml file
pub fn load_cfg<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let f = File::open(path)?;
    Ok(serde_yaml::from_reader(f)?)
}

/// figure-wide settings, the counterpart of the rc parameters of the thesis figures
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PlotStyle {
    pub font_family: String,
    pub label_size: u32,
    pub title_size: u32,
    pub tick_size: u32,
    pub line_width: u32,
    /// figure size in inches
    pub fig_size: (f64, f64),
    pub dpi: u32,
    /// padding around the figure in inches
    pub pad_inches: f64,
    /// scales all fonts, like the font scale of a plot theme
    pub font_scale: f64,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            font_family: "serif".to_string(),
            label_size: 18,
            title_size: 18,
            tick_size: 14,
            line_width: 2,
            fig_size: (10.0, 6.0),
            dpi: 300,
            pad_inches: 0.1,
            font_scale: 1.0,
        }
    }
}

impl PlotStyle {
    /// larger fonts on a wider canvas, used by the single-panel thesis figures
    pub fn large() -> Self {
        PlotStyle {
            label_size: 24,
            title_size: 24,
            tick_size: 20,
            fig_size: (12.0, 6.0),
            ..Default::default()
        }
    }

    pub fn px(&self, inches: f64) -> u32 {
        (inches * self.dpi as f64).round() as u32
    }

    /// font size in pixels from a size given in points
    pub fn font_px(&self, pt: u32) -> f64 {
        pt as f64 * self.font_scale * self.dpi as f64 / 72.0
    }
}

/// cfg of a pair-grid correlation figure
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CorrCfg {
    pub inputs: Vec<String>,
    pub accumulate: Accumulate,
    pub titles: Vec<String>,
    /// take log10 of the mass column after loading
    pub log_mass: bool,
    pub suptitle: Option<String>,
    /// edge length of a single panel in inches
    pub height: f64,
    pub marker_size: u32,
    pub kde_levels: usize,
    /// fraction of the density mass hidden below the lowest contour
    pub kde_thresh: f64,
    pub grid_points: usize,
    pub bins: Option<usize>,
    pub output: String,
    pub style: PlotStyle,
}

impl Default for CorrCfg {
    fn default() -> Self {
        CorrCfg {
            inputs: (0..10)
                .map(|i| format!("/hpcwork/cg457676/data/parameters/parameters_{}.csv", i))
                .collect(),
            accumulate: Accumulate::LastOnly,
            titles: vec![
                "log₁₀ M / M☉".to_string(),
                "d_L".to_string(),
                "a".to_string(),
                "e₀".to_string(),
                "p₀ / M".to_string(),
            ],
            log_mass: true,
            suptitle: None,
            height: 1.2,
            marker_size: 5,
            kde_levels: 10,
            kde_thresh: 0.05,
            grid_points: 64,
            bins: None,
            output: "./thesis_plots/plots/chapter_4/corr.png".to_string(),
            style: PlotStyle {
                font_scale: 0.9,
                ..Default::default()
            },
        }
    }
}

impl CorrCfg {
    /// the network run variant: deltas of one run, no log mass, titled by the run number
    pub fn network_run(n_run: usize) -> Self {
        CorrCfg {
            inputs: vec![format!(
                "./Network/network_output/run_1.{:02}/deltas.txt",
                n_run
            )],
            accumulate: Accumulate::Concat,
            titles: ["Mass", "Distance", "Spin", "Eccentricity", "Seperation"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_mass: false,
            suptitle: Some(format!("Correlations run 1.{:02}", n_run)),
            height: 2.0,
            output: format!("Corr_run_1.{:02}.png", n_run),
            style: PlotStyle::default(),
            ..Default::default()
        }
    }
}

/// cfg of a pseudocolor spectrogram figure
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpecPlotCfg {
    pub input: String,
    pub output: String,
    /// length of a time bin in seconds
    pub bin_dt: f64,
    /// frequency resolution in Hz
    pub df: f64,
    pub freq_range: (f64, f64),
    /// colour floor relative to the maximum
    pub dynamic_range: f64,
    pub colorbar_label: String,
    pub title: Option<String>,
    pub style: PlotStyle,
}

impl Default for SpecPlotCfg {
    fn default() -> Self {
        SpecPlotCfg {
            input: "./thesis_plots/plots/chapter_5/spec_val.csv".to_string(),
            output: "./thesis_plots/plots/chapter_5/specCorr.png".to_string(),
            bin_dt: 2e4,
            df: 5e-5,
            freq_range: (1e-4, 1e-1),
            dynamic_range: 1e-6,
            colorbar_label: "GW amplitude [1/√Hz]".to_string(),
            title: None,
            style: PlotStyle::large(),
        }
    }
}

/// cfg of a strain time-series figure
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StrainPlotCfg {
    pub input: String,
    pub output: String,
    /// number of the data set, shown in the title
    pub n: usize,
    /// number of leading samples shown
    pub n_samples: usize,
    pub dt: f64,
    /// factor applied to the strain before plotting
    pub scale: f64,
    pub color: String,
    pub style: PlotStyle,
}

impl Default for StrainPlotCfg {
    fn default() -> Self {
        StrainPlotCfg {
            input: "/hpcwork/cg457676/data/strains/h_00049.csv".to_string(),
            output: "./thesis_plots/plots/chapter_4/strain.png".to_string(),
            n: 49,
            n_samples: 1000,
            dt: 5.0,
            scale: 1e25,
            color: "#e60049".to_string(),
            style: PlotStyle::large(),
        }
    }
}

/// the fixed part of the source description, everything except the sampled parameters
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct SourceCfg {
    /// observation time in years
    pub t_obs: f64,
    /// sampling interval in seconds
    pub dt: f64,
    /// mass of the compact object in solar masses
    pub mu: f64,
    pub x0: f64,
    pub q_s: f64,
    pub phi_s: f64,
    pub q_k: f64,
    pub phi_k: f64,
    pub phi_phi0: f64,
    pub phi_theta0: f64,
    pub phi_r0: f64,
}

impl Default for SourceCfg {
    fn default() -> Self {
        SourceCfg {
            t_obs: 0.05,
            dt: 5.0,
            mu: 1.0,
            x0: 0.99,
            q_s: 1e-6,
            phi_s: 0.0,
            q_k: 1e-6,
            phi_k: 0.0,
            phi_phi0: 0.0,
            phi_theta0: 0.0,
            phi_r0: 0.0,
        }
    }
}

/// cfg to generate spectrograms
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SpectrogramCfg {
    /// all strains are padded to this length
    pub pad_len: usize,
    /// length of a time bin in seconds
    pub stride: f64,
    /// fft length in seconds, defaults to the stride
    pub fftlength: Option<f64>,
    /// overlap of the averaged ffts in seconds, defaults to half of the fft length
    pub overlap: Option<f64>,
    pub window: String,
}

impl Default for SpectrogramCfg {
    fn default() -> Self {
        SpectrogramCfg {
            pad_len: 315582,
            stride: 2e4,
            fftlength: None,
            overlap: None,
            window: "hann".to_string(),
        }
    }
}

/// a linear correlation along which the base record is shifted
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct PerturbationCfg {
    /// column pair (x, y)
    pub cols: (usize, usize),
    pub slope: f64,
    pub intercept: f64,
    pub span: f64,
}

pub fn default_perturbations() -> Vec<PerturbationCfg> {
    let cols = [(0, 1), (0, 2), (0, 4), (1, 4), (2, 4)];
    let slope = [31.36, 2.3, -12.0, -0.10, -3.25];
    let intercept = [-0.043, 0.012, -0.058, 0.044, 0.097];
    let span = [0.3, 0.2, 0.2, 20.0, 0.4];
    (0..cols.len())
        .map(|i| PerturbationCfg {
            cols: cols[i],
            slope: slope[i],
            intercept: intercept[i],
            span: span[i],
        })
        .collect()
}

/// where the parameters of the generated data sets come from
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParameterSource {
    /// fresh uniform draws
    Random { n: usize, seed: Option<u64> },
    /// one row of a parameter file shifted along each correlation
    Perturbed {
        file: String,
        row: usize,
        perturbations: Vec<PerturbationCfg>,
    },
    /// all rows of parameter files
    Files { files: Vec<String> },
}

impl Default for ParameterSource {
    fn default() -> Self {
        ParameterSource::Perturbed {
            file: "/hpcwork/cg457676/data/parameters/parameters_0.csv".to_string(),
            row: 49,
            perturbations: default_perturbations(),
        }
    }
}

/// which waveform generator produces the strains
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorCfg {
    QuadrupoleChirp,
    Archive { dir: String },
}

impl Default for GeneratorCfg {
    fn default() -> Self {
        GeneratorCfg::QuadrupoleChirp
    }
}

/// cfg of the data generating tool
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GenCfg {
    pub parameters: ParameterSource,
    pub generator: GeneratorCfg,
    pub source: SourceCfg,
    pub spectrogram: SpectrogramCfg,
    /// the last spectrogram is dumped here
    pub spec_csv: String,
    /// per-sample images, `{}` is replaced by the sample index
    pub image_pattern: String,
    pub npz: Option<String>,
    pub plot: SpecPlotCfg,
}

impl Default for GenCfg {
    fn default() -> Self {
        GenCfg {
            parameters: ParameterSource::default(),
            generator: GeneratorCfg::default(),
            source: SourceCfg::default(),
            spectrogram: SpectrogramCfg::default(),
            spec_csv: "./thesis_plots/plots/chapter_5/spec_val.csv".to_string(),
            image_pattern: "./thesis_plots/plots/chapter_5/specs/spec_{}.png".to_string(),
            npz: None,
            plot: SpecPlotCfg {
                colorbar_label: "Gravitational-wave amplitude [strain/√Hz]".to_string(),
                style: PlotStyle::default(),
                ..Default::default()
            },
        }
    }
}
