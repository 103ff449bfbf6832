extern crate emriplot;

use anyhow::{Context, Result};

use clap::{App, Arg};

use log::info;

use emriplot::{
    cfg::{load_cfg, SpecPlotCfg},
    specplot::plot_spectrogram,
    spectrogram::Spectrogram,
};

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("plot_spec")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("config file"),
        )
        .get_matches();

    let cfg: SpecPlotCfg = match matches.value_of("cfg") {
        Some(f) => load_cfg(f).with_context(|| format!("reading {}", f))?,
        None => SpecPlotCfg::default(),
    };

    let spec = Spectrogram::read_csv(&cfg.input, cfg.bin_dt, cfg.df)
        .with_context(|| format!("reading {}", cfg.input))?;
    info!(
        "{} time bins x {} frequency bins, max {:e}",
        spec.ntime(),
        spec.nfreq(),
        spec.max()
    );

    if let Some(dir) = std::path::Path::new(&cfg.output).parent() {
        std::fs::create_dir_all(dir)?;
    }
    plot_spectrogram(&spec, &cfg, &cfg.output).with_context(|| format!("drawing {}", cfg.output))?;
    info!("written {}", cfg.output);
    Ok(())
}
