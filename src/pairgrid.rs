//! pair-grid correlation figures
//!
//! The diagonal shows a histogram of every column with its kernel density estimate,
//! the lower triangle scatter plots and the upper triangle filled density contours.

use std::path::Path;

use itertools_num::linspace;
use plotters::{coord::types::RangedCoordf64, prelude::*};

use crate::{
    cfg::CorrCfg,
    error::{Error, Result},
    kde::{auto_bin_edges, histogram, iso_levels, Kde1d, Kde2d},
    params::ParameterTable,
    plot::{font, over_white, plot_err, DrawResult, THEME_BG, THEME_BLUE},
};

/// axis range of a column with 5 % headroom on both sides
pub fn axis_range(x: &[f64]) -> (f64, f64) {
    let lo = x.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = x.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = if hi > lo { hi - lo } else { lo.abs().max(1.0) };
    (lo - 0.05 * span, hi + 0.05 * span)
}

/// index of the filled band a density value falls into, None below the lowest level
pub fn band(levels: &[f64], v: f64) -> Option<usize> {
    if levels.is_empty() || v < levels[0] {
        None
    } else {
        Some(levels.partition_point(|&l| l <= v).saturating_sub(1).min(levels.len().saturating_sub(2)))
    }
}

pub fn plot_pair_grid<P: AsRef<Path>>(table: &ParameterTable, cfg: &CorrCfg, output: P) -> Result<()> {
    if cfg.titles.len() != crate::params::NCOLS {
        return Err(Error::Shape(format!(
            "{} titles for {} columns",
            cfg.titles.len(),
            crate::params::NCOLS
        )));
    }
    if table.len() < 3 {
        return Err(Error::Shape(format!("{} rows are too few for a pair grid", table.len())));
    }
    draw(table, cfg, output.as_ref()).map_err(plot_err)
}

fn draw(table: &ParameterTable, cfg: &CorrCfg, output: &Path) -> DrawResult<()> {
    let style = &cfg.style;
    let n = cfg.titles.len();
    let side = style.px(cfg.height * n as f64);
    let pad = style.px(style.pad_inches);
    let root = BitMapBackend::new(output, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.margin(pad, pad, pad, pad);
    let root = match &cfg.suptitle {
        Some(t) => root.titled(t, font(style, style.title_size))?,
        None => root,
    };

    let columns: Vec<Vec<f64>> = (0..n).map(|i| table.column(i)).collect();
    let ranges: Vec<(f64, f64)> = columns.iter().map(|c| axis_range(c)).collect();
    let label_px = (style.font_px(style.label_size) * 1.6) as u32;
    let tick_px = (style.font_px(style.tick_size) * 3.5) as u32;
    let marker = ((cfg.marker_size as f64 / std::f64::consts::PI).sqrt() * style.dpi as f64 / 72.0)
        .round()
        .max(1.0) as i32;
    let props: Vec<f64> = linspace(cfg.kde_thresh, 1.0, cfg.kde_levels.max(2)).collect();

    for (k, area) in root.split_evenly((n, n)).into_iter().enumerate() {
        let (row, col) = (k / n, k % n);
        let (xr, yr) = (ranges[col], ranges[row]);
        let left = col == 0;
        let bottom = row == n - 1;

        if row == col {
            let x = &columns[col];
            let edges = match cfg.bins {
                Some(b) => linspace(xr.0, xr.1, b.max(1) + 1).collect(),
                None => auto_bin_edges(x),
            };
            let counts = histogram(x, &edges);
            let ymax = counts.iter().cloned().max().unwrap_or(1).max(1) as f64 * 1.1;
            let mut chart = ChartBuilder::on(&area)
                .x_label_area_size(label_px + tick_px / 2)
                .y_label_area_size(label_px + tick_px)
                .build_cartesian_2d(xr.0..xr.1, 0.0..ymax)?;
            chart.plotting_area().fill(&THEME_BG)?;
            mesh(&mut chart, cfg, left, bottom, row, col)?;
            chart.draw_series(edges.windows(2).zip(&counts).map(|(e, &c)| {
                Rectangle::new([(e[0], 0.0), (e[1], c as f64)], over_white(&THEME_BLUE, 0.75).filled())
            }))?;
            // density scaled to counts
            if let Ok(kde) = Kde1d::new(x) {
                let bw = edges.get(1).map(|e| e - edges[0]).unwrap_or(1.0);
                let scale = x.len() as f64 * bw;
                let curve: Vec<(f64, f64)> = linspace(xr.0, xr.1, cfg.grid_points * 4)
                    .map(|v| (v, kde.evaluate(v) * scale))
                    .collect();
                chart.draw_series(LineSeries::new(
                    curve,
                    THEME_BLUE.stroke_width(style.line_width * style.dpi / 72),
                ))?;
            }
        } else if row > col {
            let mut chart = ChartBuilder::on(&area)
                .x_label_area_size(label_px + tick_px / 2)
                .y_label_area_size(label_px + tick_px)
                .build_cartesian_2d(xr.0..xr.1, yr.0..yr.1)?;
            chart.plotting_area().fill(&THEME_BG)?;
            mesh(&mut chart, cfg, left, bottom, row, col)?;
            chart.draw_series(
                columns[col]
                    .iter()
                    .zip(&columns[row])
                    .map(|(&x, &y)| Circle::new((x, y), marker, THEME_BLUE.filled())),
            )?;
        } else {
            let mut chart = ChartBuilder::on(&area)
                .x_label_area_size(label_px + tick_px / 2)
                .y_label_area_size(label_px + tick_px)
                .build_cartesian_2d(xr.0..xr.1, yr.0..yr.1)?;
            chart.plotting_area().fill(&THEME_BG)?;
            mesh(&mut chart, cfg, left, bottom, row, col)?;
            if let Ok(kde) = Kde2d::new(&columns[col], &columns[row]) {
                let ng = cfg.grid_points.max(2);
                let dx = (xr.1 - xr.0) / ng as f64;
                let dy = (yr.1 - yr.0) / ng as f64;
                let xs: Vec<f64> = (0..ng).map(|i| xr.0 + (i as f64 + 0.5) * dx).collect();
                let ys: Vec<f64> = (0..ng).map(|j| yr.0 + (j as f64 + 0.5) * dy).collect();
                let density = kde.grid(&xs, &ys);
                let levels = iso_levels(&density, &props);
                let nband = levels.len().saturating_sub(1).max(1);
                chart.draw_series(density.indexed_iter().filter_map(|((i, j), &v)| {
                    band(&levels, v).map(|b| {
                        let c = over_white(&THEME_BLUE, (b + 1) as f64 / nband as f64);
                        let (x0, y0) = (xr.0 + i as f64 * dx, yr.0 + j as f64 * dy);
                        Rectangle::new([(x0, y0), (x0 + dx, y0 + dy)], c.filled())
                    })
                }))?;
            }
        }
    }

    root.present()?;
    Ok(())
}

fn blank(_: &f64) -> String {
    String::new()
}

/// white grid on the theme background, tick labels and titles only on the outer panels
fn mesh<DB: DrawingBackend>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    cfg: &CorrCfg,
    left: bool,
    bottom: bool,
    row: usize,
    col: usize,
) -> DrawResult<()>
where
    DB::ErrorType: 'static,
{
    let style = &cfg.style;
    let mut m = chart.configure_mesh();
    m.bold_line_style(WHITE.stroke_width(2))
        .light_line_style(TRANSPARENT.stroke_width(0))
        .axis_style(TRANSPARENT.stroke_width(0))
        .x_labels(4)
        .y_labels(4)
        .label_style(font(style, style.tick_size))
        .axis_desc_style(font(style, style.label_size));
    if bottom {
        m.x_desc(cfg.titles[col].as_str());
    } else {
        m.x_label_formatter(&blank);
    }
    if left {
        m.y_desc(cfg.titles[row].as_str());
    } else {
        m.y_label_formatter(&blank);
    }
    m.draw()?;
    Ok(())
}
