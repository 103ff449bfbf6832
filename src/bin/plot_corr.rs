extern crate emriplot;

use anyhow::{Context, Result};

use clap::{App, Arg};

use log::info;

use emriplot::{
    cfg::{load_cfg, CorrCfg},
    pairgrid::plot_pair_grid,
    params::load_tables,
};

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("plot_corr")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("config file"),
        )
        .arg(
            Arg::new("run")
                .short('r')
                .long("run")
                .takes_value(true)
                .value_name("network run number")
                .conflicts_with("cfg"),
        )
        .get_matches();

    let cfg: CorrCfg = match (matches.value_of("cfg"), matches.value_of("run")) {
        (Some(f), _) => load_cfg(f).with_context(|| format!("reading {}", f))?,
        (None, Some(n)) => CorrCfg::network_run(n.parse().context("run number")?),
        (None, None) => CorrCfg::default(),
    };

    let mut table = load_tables(&cfg.inputs, cfg.accumulate).context("reading parameters")?;
    if cfg.log_mass {
        table.log_mass();
    }
    for (title, (lo, hi)) in cfg.titles.iter().zip(table.min_max()) {
        info!("{}: min {} max {}", title, lo, hi);
    }

    if let Some(dir) = std::path::Path::new(&cfg.output).parent() {
        std::fs::create_dir_all(dir)?;
    }
    plot_pair_grid(&table, &cfg, &cfg.output).with_context(|| format!("drawing {}", cfg.output))?;
    info!("{} rows drawn to {}", table.len(), cfg.output);
    Ok(())
}
