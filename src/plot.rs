//! helpers shared by the figures: colours, colour normalisation and label text

use plotters::prelude::*;
use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};

use crate::{
    cfg::PlotStyle,
    error::{Error, Result},
};

pub type DrawResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// background of the darkgrid theme
pub const THEME_BG: RGBColor = RGBColor(234, 234, 242);
/// first colour of the deep palette
pub const THEME_BLUE: RGBColor = RGBColor(76, 114, 176);

pub fn plot_err(e: Box<dyn std::error::Error>) -> Error {
    Error::Plot(e.to_string())
}

/// parse `#rrggbb`
pub fn parse_hex_color(s: &str) -> Result<RGBColor> {
    let h = s.trim().trim_start_matches('#');
    let bad = || Error::Parse {
        line: 0,
        token: s.to_string(),
    };
    if h.len() != 6 || !h.is_ascii() {
        return Err(bad());
    }
    let c = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).map_err(|_| bad());
    Ok(RGBColor(c(0)?, c(2)?, c(4)?))
}

/// blend `c` over white with opacity `alpha`
pub fn over_white(c: &RGBColor, alpha: f64) -> RGBColor {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |x: u8| (255.0 * (1.0 - a) + x as f64 * a).round() as u8;
    RGBColor(mix(c.0), mix(c.1), mix(c.2))
}

/// logarithmic colour normalisation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogNorm {
    pub vmin: f64,
    pub vmax: f64,
}

impl LogNorm {
    pub fn new(vmin: f64, vmax: f64) -> Result<Self> {
        if !(vmin > 0.0 && vmin < vmax && vmax.is_finite()) {
            return Err(Error::Plot(format!(
                "cannot normalise logarithmically between {} and {}",
                vmin, vmax
            )));
        }
        Ok(LogNorm { vmin, vmax })
    }

    /// `vmax` is the maximum, the floor sits `dynamic_range` below it
    pub fn from_max(vmax: f64, dynamic_range: f64) -> Result<Self> {
        if !(vmax > 0.0 && vmax.is_finite()) || !(dynamic_range > 0.0 && dynamic_range < 1.0) {
            return Err(Error::Plot(format!(
                "cannot normalise max {} with dynamic range {}",
                vmax, dynamic_range
            )));
        }
        Ok(LogNorm {
            vmin: vmax * dynamic_range,
            vmax,
        })
    }

    /// position in [0, 1], None for values that have no logarithm
    pub fn normalize(&self, v: f64) -> Option<f64> {
        if !(v > 0.0) || !v.is_finite() {
            return None;
        }
        let t = (v.log10() - self.vmin.log10()) / (self.vmax.log10() - self.vmin.log10());
        Some(t.clamp(0.0, 1.0))
    }

    pub fn color(&self, v: f64) -> Option<RGBColor> {
        self.normalize(v).map(viridis)
    }
}

pub fn viridis(t: f64) -> RGBColor {
    ViridisRGB.get_color(t as f32)
}

const SUPERSCRIPTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/// `10⁻²⁵` for an exponent of -25
pub fn power_of_ten(exp: i32) -> String {
    let mut s = String::from("10");
    if exp < 0 {
        s.push('⁻');
    }
    s.extend(
        exp.unsigned_abs()
            .to_string()
            .chars()
            .filter_map(|c| c.to_digit(10).map(|d| SUPERSCRIPTS[d as usize])),
    );
    s
}

/// tick label in scientific notation, e.g. `10⁻⁴` for exact powers
pub fn sci_label(v: f64) -> String {
    let e = v.abs().log10();
    if (e - e.round()).abs() < 1e-9 && v > 0.0 {
        power_of_ten(e.round() as i32)
    } else {
        format!("{:.1e}", v)
    }
}

pub fn font<'a>(style: &'a PlotStyle, pt: u32) -> FontDesc<'a> {
    (style.font_family.as_str(), style.font_px(pt)).into_font()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lognorm_floor() {
        let n = LogNorm::from_max(2.0, 1e-6).unwrap();
        assert!((n.vmin - 2e-6).abs() < 1e-18);
        assert_eq!(n.normalize(2.0), Some(1.0));
        assert_eq!(n.normalize(1e-9), Some(0.0));
        assert!((n.normalize(2e-3).unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(n.normalize(0.0), None);
        assert_eq!(n.normalize(f64::NAN), None);
        assert!(LogNorm::from_max(0.0, 1e-6).is_err());
    }

    #[test]
    fn lognorm_bounds() {
        let n = LogNorm::new(1e-3, 10.0).unwrap();
        assert_eq!(n.normalize(10.0), Some(1.0));
        assert!((n.normalize(0.1).unwrap() - 0.5).abs() < 1e-12);
        assert!(LogNorm::new(0.0, 1.0).is_err());
        assert!(LogNorm::new(2.0, 1.0).is_err());
    }

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#e60049").unwrap(), RGBColor(230, 0, 73));
        assert!(parse_hex_color("#e6004").is_err());
        assert!(parse_hex_color("zzzzzz").is_err());
    }

    #[test]
    fn superscripts() {
        assert_eq!(power_of_ten(-25), "10⁻²⁵");
        assert_eq!(power_of_ten(3), "10³");
        assert_eq!(sci_label(1e-4), "10⁻⁴");
        assert_eq!(sci_label(2.5e-3), "2.5e-3");
    }

    #[test]
    fn blending() {
        assert_eq!(over_white(&RGBColor(0, 0, 0), 0.0), RGBColor(255, 255, 255));
        assert_eq!(over_white(&RGBColor(10, 20, 30), 1.0), RGBColor(10, 20, 30));
    }
}
