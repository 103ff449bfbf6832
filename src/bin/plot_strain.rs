extern crate emriplot;

use anyhow::{Context, Result};

use clap::{App, Arg};

use log::info;

use emriplot::{
    cfg::{load_cfg, StrainPlotCfg},
    strain::read_strain_csv,
    strainplot::plot_strain,
};

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("plot_strain")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("config file"),
        )
        .get_matches();

    let cfg: StrainPlotCfg = match matches.value_of("cfg") {
        Some(f) => load_cfg(f).with_context(|| format!("reading {}", f))?,
        None => StrainPlotCfg::default(),
    };

    let h = read_strain_csv(&cfg.input).with_context(|| format!("reading {}", cfg.input))?;
    info!("{} samples in {}", h.len(), cfg.input);

    if let Some(dir) = std::path::Path::new(&cfg.output).parent() {
        std::fs::create_dir_all(dir)?;
    }
    plot_strain(&h, &cfg, &cfg.output).with_context(|| format!("drawing {}", cfg.output))?;
    info!("written {}", cfg.output);
    Ok(())
}
