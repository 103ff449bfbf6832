//! figures of EMRI parameter sets, strains and spectrograms

pub mod cfg;
pub mod chirp;
pub mod error;
pub mod kde;
pub mod npz;
pub mod oscillator;
pub mod pairgrid;
pub mod params;
pub mod plot;
pub mod specplot;
pub mod spectrogram;
pub mod strain;
pub mod strainplot;
pub mod traits;
pub mod utils;
pub mod waveform;
pub mod window_funcs;

pub use error::{Error, Result};
