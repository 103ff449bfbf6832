//! line plot of the plus polarisation of a strain

use std::path::Path;

use num_complex::Complex;
use plotters::prelude::*;

use crate::{
    cfg::StrainPlotCfg,
    error::{Error, Result},
    plot::{font, parse_hex_color, plot_err, power_of_ten, DrawResult},
};

/// (t, scaled Re h) of the first `n_samples` samples
pub fn strain_curve(h: &[Complex<f64>], cfg: &StrainPlotCfg) -> Vec<(f64, f64)> {
    h.iter()
        .take(cfg.n_samples)
        .enumerate()
        .map(|(i, x)| (i as f64 * cfg.dt, x.re * cfg.scale))
        .collect()
}

pub fn y_label(scale: f64) -> String {
    format!("Strain h₊ [{}]", power_of_ten(-scale.log10().round() as i32))
}

pub fn plot_strain<P: AsRef<Path>>(h: &[Complex<f64>], cfg: &StrainPlotCfg, output: P) -> Result<()> {
    let curve = strain_curve(h, cfg);
    if curve.len() < 2 {
        return Err(Error::Shape(format!("{} samples cannot be drawn", curve.len())));
    }
    let color = parse_hex_color(&cfg.color)?;
    draw(&curve, color, cfg, output.as_ref()).map_err(plot_err)
}

fn draw(curve: &[(f64, f64)], color: RGBColor, cfg: &StrainPlotCfg, output: &Path) -> DrawResult<()> {
    let style = &cfg.style;
    let (w, h) = (style.px(style.fig_size.0), style.px(style.fig_size.1));
    let pad = style.px(style.pad_inches);
    let root = BitMapBackend::new(output, (w, h)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(pad, pad, pad, pad);

    let t_end = curve[curve.len() - 1].0;
    let ymax = curve.iter().map(|p| p.1.abs()).fold(0.0, f64::max).max(f64::MIN_POSITIVE) * 1.05;
    let label_px = (style.font_px(style.label_size) * 2.0) as u32;
    let tick_px = (style.font_px(style.tick_size) * 3.0) as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Strain of data set nr. {:04}", cfg.n),
            font(style, style.title_size),
        )
        .x_label_area_size(label_px + tick_px / 2)
        .y_label_area_size(label_px + tick_px)
        .build_cartesian_2d(0.0..t_end, -ymax..ymax)?;

    chart
        .configure_mesh()
        .x_desc("Time t [s]")
        .y_desc(y_label(cfg.scale))
        .axis_desc_style(font(style, style.label_size))
        .label_style(font(style, style.tick_size))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .bold_line_style(BLACK.mix(0.2).stroke_width(style.dpi / 144))
        .draw()?;

    chart.draw_series(LineSeries::new(
        curve.iter().cloned(),
        color.stroke_width(style.line_width * style.dpi / 72),
    ))?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_takes_leading_samples() {
        let h: Vec<_> = (0..2000).map(|i| Complex::new(i as f64 * 1e-25, 1.0)).collect();
        let cfg = StrainPlotCfg::default();
        let c = strain_curve(&h, &cfg);
        assert_eq!(c.len(), 1000);
        assert_eq!(c[2].0, 10.0);
        assert!((c[2].1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn label_carries_scale() {
        assert_eq!(y_label(1e25), "Strain h₊ [10⁻²⁵]");
    }

    #[test]
    fn too_short_strain_is_rejected() {
        let cfg = StrainPlotCfg::default();
        let out = tempfile::tempdir().unwrap();
        assert!(plot_strain(&[Complex::new(1.0, 0.0)], &cfg, out.path().join("s.png")).is_err());
    }
}
