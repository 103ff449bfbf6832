#![allow(clippy::many_single_char_names)]
use std::str::FromStr;

use num_traits::{Float, FloatConst};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// periodic windows, as used for spectral estimation
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    Hann,
    Hamming,
    Blackman,
    Boxcar,
}

impl FromStr for Window {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "hann" | "hanning" => Ok(Window::Hann),
            "hamming" => Ok(Window::Hamming),
            "blackman" => Ok(Window::Blackman),
            "boxcar" | "rect" | "none" => Ok(Window::Boxcar),
            _ => Err(Error::Parse {
                line: 0,
                token: s.to_string(),
            }),
        }
    }
}

impl Window {
    pub fn coeff<T>(&self, n: usize) -> Vec<T>
    where
        T: Float + FloatConst,
    {
        (0..n)
            .map(|i| match self {
                Window::Hann => hann_window(i, n),
                Window::Hamming => hamming_window(i, n),
                Window::Blackman => blackman_window(i, n),
                Window::Boxcar => T::one(),
            })
            .collect()
    }
}

/// periodic Hann window, 0.5 - 0.5 cos(2 pi i / n)
pub fn hann_window<T>(i: usize, n: usize) -> T
where
    T: Float + FloatConst,
{
    let one = T::one();
    let two = one + one;
    let half = one / two;
    let x = two * T::PI() * T::from(i).unwrap() / T::from(n).unwrap();
    half - half * x.cos()
}

pub fn hamming_window<T>(i: usize, n: usize) -> T
where
    T: Float + FloatConst,
{
    let two = T::one() + T::one();
    let x = two * T::PI() * T::from(i).unwrap() / T::from(n).unwrap();
    T::from(0.54).unwrap() - T::from(0.46).unwrap() * x.cos()
}

pub fn blackman_window<T>(i: usize, n: usize) -> T
where
    T: Float + FloatConst,
{
    let a0 = T::from(0.42).unwrap();
    let a1 = T::from(0.5).unwrap();
    let a2 = T::from(0.08).unwrap();
    let two = T::one() + T::one();
    let x = two * T::PI() * T::from(i).unwrap() / T::from(n).unwrap();
    a0 - a1 * x.cos() + a2 * (two * x).cos()
}

pub fn apply_window<T>(workpiece: &mut [T], window: &[T])
where
    T: Float,
{
    assert_eq!(workpiece.len(), window.len());
    workpiece
        .iter_mut()
        .zip(window)
        .for_each(|(x, &w)| *x = *x * w);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_is_periodic() {
        let w = Window::Hann.coeff::<f64>(8);
        assert!(w[0].abs() < 1e-12);
        assert!((w[4] - 1.0).abs() < 1e-12);
        // symmetric around the centre, the last point is not repeated
        for i in 1..4 {
            assert!((w[i] - w[8 - i]).abs() < 1e-12);
        }
        // 0.5 - 0.5 cos(2 pi i / n)
        for (i, x) in w.iter().enumerate() {
            let y = 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / 8.0).cos();
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn odd_length_windows_are_periodic() {
        let w = Window::Hann.coeff::<f64>(5);
        let expected = [0.0, 0.3454915, 0.9045085, 0.9045085, 0.3454915];
        for (x, y) in w.iter().zip(expected) {
            assert!((x - y).abs() < 1e-7, "{} {}", x, y);
        }
        let h = Window::Hamming.coeff::<f64>(7);
        assert!((h[0] - 0.08).abs() < 1e-12);
        for i in 1..7 {
            assert!((h[i] - h[7 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn window_names() {
        assert_eq!("hann".parse::<Window>().unwrap(), Window::Hann);
        assert_eq!("Blackman".parse::<Window>().unwrap(), Window::Blackman);
        assert!("kaiser".parse::<Window>().is_err());
    }

    #[test]
    fn hamming_and_blackman_edges() {
        let w = Window::Hamming.coeff::<f64>(16);
        assert!((w[0] - 0.08).abs() < 1e-12);
        assert!((w[8] - 1.0).abs() < 1e-12);
        let b = Window::Blackman.coeff::<f64>(16);
        assert!(b[0].abs() < 1e-12);
        assert!((b[8] - 1.0).abs() < 1e-12);
    }
}
