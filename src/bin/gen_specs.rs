extern crate emriplot;

use std::path::Path;

use anyhow::{Context, Result};

use clap::{App, Arg};

use log::{debug, info};

use rand::{rngs::StdRng, thread_rng, SeedableRng};

use emriplot::{
    cfg::{load_cfg, GenCfg, ParameterSource},
    npz::write_dataset,
    params::resolve_parameters,
    specplot::plot_spectrogram_with_floor,
    spectrogram::{gen_specs, global_max},
    waveform::{build_generator, gen_strain},
};

fn create_parent(path: &str) -> Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let matches = App::new("gen_specs")
        .arg(
            Arg::new("cfg")
                .short('c')
                .long("cfg")
                .takes_value(true)
                .value_name("config file"),
        )
        .get_matches();

    let cfg: GenCfg = match matches.value_of("cfg") {
        Some(f) => load_cfg(f).with_context(|| format!("reading {}", f))?,
        None => GenCfg::default(),
    };

    let mut rng = match &cfg.parameters {
        ParameterSource::Random { seed: Some(s), .. } => StdRng::seed_from_u64(*s),
        _ => StdRng::from_rng(thread_rng())?,
    };
    let table = resolve_parameters(&cfg.parameters, &mut rng).context("collecting parameters")?;
    info!("{} data sets", table.len());
    for (i, r) in table.records.iter().enumerate() {
        debug!("{}: {:?}", i, r);
    }

    let generator = build_generator(&cfg.generator);
    let strains = gen_strain(&*generator, &table.records, &cfg.source).context("generating strains")?;
    let specs = gen_specs(&strains, cfg.source.dt, &cfg.spectrogram).context("computing spectrograms")?;

    let last = specs.last().context("no data sets")?;
    create_parent(&cfg.spec_csv)?;
    last.write_csv(&cfg.spec_csv)
        .with_context(|| format!("writing {}", cfg.spec_csv))?;
    info!("last spectrogram written to {}", cfg.spec_csv);

    if let Some(npz) = &cfg.npz {
        create_parent(npz)?;
        write_dataset(npz, &table, &strains, cfg.spectrogram.pad_len, last)
            .with_context(|| format!("writing {}", npz))?;
        info!("data set archive written to {}", npz);
    }

    let floor_ref = global_max(&specs);
    for (i, spec) in specs.iter().enumerate() {
        let out = cfg.image_pattern.replace("{}", &i.to_string());
        create_parent(&out)?;
        plot_spectrogram_with_floor(spec, floor_ref, &cfg.plot, &out)
            .with_context(|| format!("drawing {}", out))?;
        debug!("written {}", out);
    }
    info!("{} spectrogram images written", specs.len());
    Ok(())
}
