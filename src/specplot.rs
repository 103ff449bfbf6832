//! pseudocolor spectrogram figures with a logarithmic colour scale and frequency axis

use std::path::Path;

use plotters::prelude::*;

use crate::{
    cfg::SpecPlotCfg,
    error::Result,
    plot::{font, plot_err, sci_label, viridis, DrawResult, LogNorm},
    spectrogram::Spectrogram,
};

const DAY: f64 = 86400.0;

/// one coloured cell of the mesh, in days and Hz
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub t: (f64, f64),
    pub f: (f64, f64),
    pub color: RGBColor,
}

/// cells of `spec` inside the frequency range
///
/// Cell `(i, j)` spans `[i + 0.5, i + 1.5)` time bins and `[j + 0.5, j + 1.5)` frequency bins,
/// the bin edges of the thesis figure.
pub fn mesh_cells(spec: &Spectrogram, norm: &LogNorm, freq_range: (f64, f64)) -> Vec<Cell> {
    let z = spec.transposed();
    let times = spec.times();
    let freqs = spec.frequencies();
    let (flo, fhi) = freq_range;
    let mut cells = Vec::new();
    for ((j, i), &v) in z.indexed_iter() {
        let f0 = freqs[j] + 0.5 * spec.df;
        let f1 = f0 + spec.df;
        if f1 <= flo || f0 >= fhi {
            continue;
        }
        if let Some(color) = norm.color(v) {
            let t0 = times[i] + 0.5 * spec.dt_bin;
            cells.push(Cell {
                t: (t0 / DAY, (t0 + spec.dt_bin) / DAY),
                f: (f0.max(flo), f1.min(fhi)),
                color,
            });
        }
    }
    cells
}

/// floor `dynamic_range` below `floor_ref`, ceiling at the maximum of `spec`
pub fn norm_with_floor(spec: &Spectrogram, floor_ref: f64, dynamic_range: f64) -> Result<LogNorm> {
    let vmin = LogNorm::from_max(floor_ref, dynamic_range)?.vmin;
    LogNorm::new(vmin, spec.max())
}

/// render with the colour floor relative to the maximum of `spec`
pub fn plot_spectrogram<P: AsRef<Path>>(spec: &Spectrogram, cfg: &SpecPlotCfg, output: P) -> Result<()> {
    let norm = LogNorm::from_max(spec.max(), cfg.dynamic_range)?;
    draw(spec, &norm, cfg, output.as_ref()).map_err(plot_err)
}

/// render with the colour floor taken from `floor_ref`, so that several figures share it
pub fn plot_spectrogram_with_floor<P: AsRef<Path>>(
    spec: &Spectrogram,
    floor_ref: f64,
    cfg: &SpecPlotCfg,
    output: P,
) -> Result<()> {
    let norm = norm_with_floor(spec, floor_ref, cfg.dynamic_range)?;
    draw(spec, &norm, cfg, output.as_ref()).map_err(plot_err)
}

fn draw(spec: &Spectrogram, norm: &LogNorm, cfg: &SpecPlotCfg, output: &Path) -> DrawResult<()> {
    let style = &cfg.style;
    let (w, h) = (style.px(style.fig_size.0), style.px(style.fig_size.1));
    let pad = style.px(style.pad_inches);
    let root = BitMapBackend::new(output, (w, h)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(pad, pad, pad, pad);
    let root = match &cfg.title {
        Some(t) => root.titled(t, font(style, style.title_size))?,
        None => root,
    };

    let (main, bar) = root.split_horizontally(w * 85 / 100);
    let label_px = (style.font_px(style.label_size) * 2.5) as u32;
    let tick_px = (style.font_px(style.tick_size) * 4.0) as u32;

    let t_lo = 0.5 * spec.dt_bin / DAY;
    let t_hi = (spec.ntime() as f64 + 0.5) * spec.dt_bin / DAY;
    let (flo, fhi) = cfg.freq_range;
    let mut chart = ChartBuilder::on(&main)
        .margin_right(style.px(0.2))
        .x_label_area_size(label_px + tick_px / 2)
        .y_label_area_size(label_px + tick_px)
        .build_cartesian_2d(t_lo..t_hi.max(t_lo + f64::EPSILON), (flo..fhi).log_scale())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Time t [d]")
        .y_desc("Frequency f [Hz]")
        .axis_desc_style(font(style, style.label_size))
        .label_style(font(style, style.tick_size))
        .x_label_formatter(&|v| format!("{:.0}", v))
        .y_label_formatter(&|v| sci_label(*v))
        .draw()?;

    chart.draw_series(
        mesh_cells(spec, norm, cfg.freq_range)
            .into_iter()
            .map(|c| Rectangle::new([(c.t.0, c.f.0), (c.t.1, c.f.1)], c.color.filled())),
    )?;

    let mut colorbar = ChartBuilder::on(&bar)
        .margin_top(style.px(0.1))
        .margin_bottom(label_px + tick_px / 2)
        .set_label_area_size(LabelAreaPosition::Right, label_px + tick_px)
        .set_label_area_size(LabelAreaPosition::Left, 0)
        .build_cartesian_2d(0.0..1.0, (norm.vmin..norm.vmax).log_scale())?;

    let steps = 256;
    let lmin = norm.vmin.log10();
    let lmax = norm.vmax.log10();
    colorbar.draw_series((0..steps).map(|i| {
        let t0 = i as f64 / steps as f64;
        let t1 = (i + 1) as f64 / steps as f64;
        let v0 = 10f64.powf(lmin + (lmax - lmin) * t0);
        let v1 = 10f64.powf(lmin + (lmax - lmin) * t1);
        Rectangle::new([(0.0, v0), (1.0, v1)], viridis(t0).filled())
    }))?;

    colorbar
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(cfg.colorbar_label.as_str())
        .axis_desc_style(font(style, style.label_size))
        .label_style(font(style, style.tick_size))
        .y_label_formatter(&|v| sci_label(*v))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn spec() -> Spectrogram {
        // two time bins, four frequency bins
        Spectrogram {
            data: array![[1.0, 2.0, 0.0, 4.0], [1e-9, 3.0, 2.0, 1.0]],
            dt_bin: 2e4,
            df: 5e-5,
        }
    }

    #[test]
    fn cells_follow_the_transpose_convention() {
        let s = spec();
        let norm = LogNorm::from_max(s.max(), 1e-6).unwrap();
        let cells = mesh_cells(&s, &norm, (0.0, 1.0));
        // the zero has no colour
        assert_eq!(cells.len(), 7);
        let first = cells[0];
        assert_eq!(first.t, (1e4 / DAY, 3e4 / DAY));
        assert!((first.f.0 - 2.5e-5).abs() < 1e-15);
        assert!((first.f.1 - 7.5e-5).abs() < 1e-15);
        // maximum is the brightest colour, time bin 0 and frequency bin 3
        assert!(cells
            .iter()
            .any(|c| c.color == viridis(1.0) && (c.f.0 - 1.75e-4).abs() < 1e-12 && c.t == first.t));
        // values below the floor take the lowest colour, time bin 1 and frequency bin 0
        assert!(cells
            .iter()
            .any(|c| c.color == viridis(0.0) && c.t.0 > first.t.0 && c.f == first.f));
    }

    #[test]
    fn cells_outside_frequency_range_are_dropped() {
        let s = spec();
        let norm = LogNorm::from_max(s.max(), 1e-6).unwrap();
        let cells = mesh_cells(&s, &norm, (1e-4, 1e-1));
        assert!(cells.iter().all(|c| c.f.0 >= 1e-4));
        // frequency bin 0 lies below 1e-4, bin 1 is clipped to it
        assert_eq!(cells.len(), 5);
        assert_eq!(cells.iter().filter(|c| c.f.0 == 1e-4).count(), 2);
    }

    #[test]
    fn shared_floor_keeps_each_maximum_brightest() {
        let strong = spec();
        let mut weak = spec();
        weak.data.mapv_inplace(|v| v * 0.1);
        let norm = norm_with_floor(&weak, strong.max(), 1e-6).unwrap();
        assert!((norm.vmin - 4e-6).abs() < 1e-18);
        assert!((norm.vmax - 0.4).abs() < 1e-15);
        let cells = mesh_cells(&weak, &norm, (0.0, 1.0));
        assert_eq!(cells.iter().filter(|c| c.color == viridis(1.0)).count(), 1);
        // a spectrogram entirely under the shared floor cannot be normalised
        weak.data.mapv_inplace(|v| v * 1e-6);
        assert!(norm_with_floor(&weak, strong.max(), 1e-6).is_err());
    }
}
