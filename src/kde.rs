//! gaussian kernel density estimates and histogram binning for the pair grid

use itertools_num::linspace;
use ndarray::Array2;
use rayon::prelude::*;

use crate::error::{Error, Result};

fn mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// unbiased covariance
fn cov(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (x.len() as f64 - 1.0)
}

/// Scott's rule for `n` points in `d` dimensions
pub fn scott_factor(n: usize, d: usize) -> f64 {
    (n as f64).powf(-1.0 / (d as f64 + 4.0))
}

#[derive(Debug, Clone)]
pub struct Kde1d {
    data: Vec<f64>,
    bw: f64,
}

impl Kde1d {
    pub fn new(data: &[f64]) -> Result<Self> {
        if data.len() < 2 {
            return Err(Error::Shape("kde needs at least two points".to_string()));
        }
        let sigma = cov(data, data).sqrt();
        if !(sigma > 0.0) {
            return Err(Error::Shape("kde of a constant column".to_string()));
        }
        Ok(Kde1d {
            data: data.to_vec(),
            bw: sigma * scott_factor(data.len(), 1),
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * self.bw * self.data.len() as f64);
        self.data
            .iter()
            .map(|&xi| (-0.5 * ((x - xi) / self.bw).powi(2)).exp())
            .sum::<f64>()
            * norm
    }

    /// density on `n` points spanning the data, extended by three bandwidths on both sides
    pub fn curve(&self, n: usize) -> Vec<(f64, f64)> {
        let (lo, hi) = self.support();
        let xs: Vec<f64> = linspace(lo, hi, n).collect();
        xs.into_par_iter().map(|x| (x, self.evaluate(x))).collect()
    }

    pub fn support(&self) -> (f64, f64) {
        let lo = self.data.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = self.data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        (lo - 3.0 * self.bw, hi + 3.0 * self.bw)
    }
}

#[derive(Debug, Clone)]
pub struct Kde2d {
    x: Vec<f64>,
    y: Vec<f64>,
    /// inverse of the kernel covariance, (xx, xy, yy)
    inv: (f64, f64, f64),
    norm: f64,
    /// kernel standard deviations along both axes
    bw: (f64, f64),
}

impl Kde2d {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() || x.len() < 3 {
            return Err(Error::Shape(format!(
                "kde needs paired columns of at least three points, got {} and {}",
                x.len(),
                y.len()
            )));
        }
        let f2 = scott_factor(x.len(), 2).powi(2);
        let sxx = cov(x, x) * f2;
        let sxy = cov(x, y) * f2;
        let syy = cov(y, y) * f2;
        let det = sxx * syy - sxy * sxy;
        if !(det > 0.0) {
            return Err(Error::Shape("singular covariance".to_string()));
        }
        Ok(Kde2d {
            x: x.to_vec(),
            y: y.to_vec(),
            inv: (syy / det, -sxy / det, sxx / det),
            norm: 1.0 / (2.0 * std::f64::consts::PI * det.sqrt() * x.len() as f64),
            bw: (sxx.sqrt(), syy.sqrt()),
        })
    }

    pub fn evaluate(&self, x: f64, y: f64) -> f64 {
        let (a, b, c) = self.inv;
        self.x
            .iter()
            .zip(&self.y)
            .map(|(&xi, &yi)| {
                let dx = x - xi;
                let dy = y - yi;
                (-0.5 * (a * dx * dx + 2.0 * b * dx * dy + c * dy * dy)).exp()
            })
            .sum::<f64>()
            * self.norm
    }

    pub fn support(&self) -> ((f64, f64), (f64, f64)) {
        let ext = |v: &[f64], bw: f64| {
            let lo = v.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = v.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            (lo - 3.0 * bw, hi + 3.0 * bw)
        };
        (ext(&self.x, self.bw.0), ext(&self.y, self.bw.1))
    }

    /// density on the grid `xs` x `ys`, `result[[i, j]]` belongs to `(xs[i], ys[j])`
    pub fn grid(&self, xs: &[f64], ys: &[f64]) -> Array2<f64> {
        let ny = ys.len();
        let values: Vec<f64> = (0..xs.len() * ny)
            .into_par_iter()
            .map(|k| self.evaluate(xs[k / ny], ys[k % ny]))
            .collect();
        Array2::from_shape_vec((xs.len(), ny), values).unwrap()
    }
}

/// density thresholds such that the region above level `k` holds `1 - props[k]` of the total mass
pub fn iso_levels(density: &Array2<f64>, props: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = density.iter().cloned().collect();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let total: f64 = sorted.iter().sum();
    let mut cum = Vec::with_capacity(sorted.len());
    let mut acc = 0.0;
    for v in &sorted {
        acc += v;
        cum.push(acc / total);
    }
    props
        .iter()
        .map(|p| {
            let idx = cum.partition_point(|&c| c < 1.0 - p);
            sorted[idx.min(sorted.len() - 1)]
        })
        .collect()
}

/// bin edges by the larger of the Sturges and Freedman-Diaconis bin counts
pub fn auto_bin_edges(data: &[f64]) -> Vec<f64> {
    let lo = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let n = data.len() as f64;
    if data.is_empty() || hi <= lo {
        return vec![lo - 0.5, lo + 0.5];
    }
    let sturges = (hi - lo) / (n.log2() + 1.0);
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q = |p: f64| {
        let pos = p * (n - 1.0);
        let i = pos.floor() as usize;
        let j = (i + 1).min(sorted.len() - 1);
        sorted[i] + (sorted[j] - sorted[i]) * (pos - i as f64)
    };
    let fd = 2.0 * (q(0.75) - q(0.25)) / n.cbrt();
    let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
    let nbins = ((hi - lo) / width).ceil().max(1.0) as usize;
    let mut edges: Vec<f64> = linspace(lo, hi, nbins + 1).collect();
    edges[nbins] = hi;
    edges
}

pub fn histogram(data: &[f64], edges: &[f64]) -> Vec<usize> {
    let nbins = edges.len() - 1;
    let mut counts = vec![0; nbins];
    for &x in data {
        if x < edges[0] || x > edges[nbins] {
            continue;
        }
        // the last bin is closed on the right
        let i = edges.partition_point(|&e| e <= x).saturating_sub(1).min(nbins - 1);
        counts[i] += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn kde1d_integrates_to_one() {
        let mut rng = StdRng::seed_from_u64(1);
        let x: Vec<f64> = (0..500).map(|_| rng.gen_range(0.0..1.0)).collect();
        let k = Kde1d::new(&x).unwrap();
        let c = k.curve(2001);
        let dx = c[1].0 - c[0].0;
        let total: f64 = c.iter().map(|p| p.1).sum::<f64>() * dx;
        assert!((total - 1.0).abs() < 1e-3, "{}", total);
    }

    #[test]
    fn kde2d_integrates_to_one() {
        let mut rng = StdRng::seed_from_u64(2);
        let x: Vec<f64> = (0..300).map(|_| rng.gen_range(0.0..1.0)).collect();
        let y: Vec<f64> = x.iter().map(|a| 2.0 * a + rng.gen_range(0.0..0.5)).collect();
        let k = Kde2d::new(&x, &y).unwrap();
        let ((x0, x1), (y0, y1)) = k.support();
        let xs: Vec<f64> = linspace(x0, x1, 200).collect();
        let ys: Vec<f64> = linspace(y0, y1, 200).collect();
        let g = k.grid(&xs, &ys);
        let total = g.sum() * (xs[1] - xs[0]) * (ys[1] - ys[0]);
        assert!((total - 1.0).abs() < 1e-2, "{}", total);
    }

    #[test]
    fn constant_column_is_rejected() {
        assert!(Kde1d::new(&[1.0, 1.0, 1.0]).is_err());
        assert!(Kde2d::new(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).is_err());
    }

    #[test]
    fn iso_levels_are_increasing() {
        let g = Array2::from_shape_fn((10, 10), |(i, j)| (i * 10 + j) as f64);
        let props: Vec<f64> = linspace(0.05, 1.0, 10).collect();
        let l = iso_levels(&g, &props);
        assert_eq!(l.len(), 10);
        assert!(l.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(l[9], 99.0);
        // mass above the lowest level is at least 95 %
        let above: f64 = g.iter().filter(|&&v| v >= l[0]).sum();
        assert!(above / g.sum() >= 0.95);
    }

    #[test]
    fn histogram_counts_everything() {
        let x: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let edges = auto_bin_edges(&x);
        assert_eq!(edges[0], 0.0);
        assert_eq!(edges[edges.len() - 1], 99.0);
        let h = histogram(&x, &edges);
        assert_eq!(h.iter().sum::<usize>(), 100);
    }
}
