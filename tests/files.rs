use emriplot::{
    cfg::{CorrCfg, GenCfg, SpecPlotCfg, SpectrogramCfg, StrainPlotCfg},
    params::{gen_parameters, load_tables, resolve_parameters, Accumulate, MassScale, ParameterRecord, ParameterTable},
    spectrogram::{gen_specs, Spectrogram},
    strain::{pad_strain, read_strain_csv, write_strain_csv},
    waveform::{build_generator, gen_strain},
};

use ndarray::Array2;
use num_complex::Complex;
use rand::{rngs::StdRng, SeedableRng};

#[test]
fn spectrogram_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spec.csv");
    let data = Array2::from_shape_fn((7, 5), |(i, j)| (i as f64 + 1.0) * 1e-21 / (j as f64 + 0.5));
    let spec = Spectrogram {
        data,
        dt_bin: 2e4,
        df: 5e-5,
    };
    spec.write_csv(&path).unwrap();

    // one line per time bin
    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().count(), 7);
    assert_eq!(text.lines().next().unwrap().split(',').count(), 5);

    let back = Spectrogram::read_csv(&path, 2e4, 5e-5).unwrap();
    assert_eq!(back.data.shape(), spec.data.shape());
    for (a, b) in back.data.iter().zip(spec.data.iter()) {
        assert!((a - b).abs() <= 1e-15 * b.abs());
    }
    let z = back.transposed();
    assert_eq!(z.shape(), &[5, 7]);
    assert_eq!(z[[3, 6]], back.data[[6, 3]]);
}

#[test]
fn ragged_spectrogram_csv_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, "1,2,3\n4,5\n").unwrap();
    assert!(Spectrogram::read_csv(&path, 1.0, 1.0).is_err());
    std::fs::write(&path, "1,2,x\n").unwrap();
    assert!(Spectrogram::read_csv(&path, 1.0, 1.0).is_err());
}

fn write_table(dir: &std::path::Path, name: &str, n: usize, seed: u64) -> std::path::PathBuf {
    let mut rng = StdRng::seed_from_u64(seed);
    let t = ParameterTable::new(gen_parameters(n, &mut rng));
    let path = dir.join(name);
    t.write_csv(&path).unwrap();
    path
}

#[test]
fn parameter_files_concat_and_last_only() {
    let dir = tempfile::tempdir().unwrap();
    let paths = vec![
        write_table(dir.path(), "parameters_0.csv", 4, 1),
        write_table(dir.path(), "parameters_1.csv", 6, 2),
    ];
    let all = load_tables(&paths, Accumulate::Concat).unwrap();
    assert_eq!(all.len(), 10);
    let last = load_tables(&paths, Accumulate::LastOnly).unwrap();
    assert_eq!(last.len(), 6);
    assert_eq!(last.records, all.records[4..].to_vec());
}

#[test]
fn mass_column_is_logged_once_per_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_table(dir.path(), "p.csv", 20, 3);
    let raw = ParameterTable::read_csv(&path).unwrap();
    let mut t = ParameterTable::read_csv(&path).unwrap();
    assert_eq!(t.scale(), MassScale::Linear);
    t.log_mass();
    t.log_mass();
    for (a, b) in t.records.iter().zip(&raw.records) {
        assert!((a.mass - b.mass.log10()).abs() < 1e-12);
        assert!((4.0..=7.0).contains(&a.mass));
    }
    // a fresh load starts from the linear masses again
    assert_eq!(ParameterTable::read_csv(&path).unwrap().scale(), MassScale::Linear);
}

#[test]
fn numpy_parameter_file_is_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.csv");
    std::fs::write(
        &path,
        "1.000000000000000000e+06,2.500000000000000000e+01,5.000000000000000000e-01,2.000000000000000000e-01,1.200000000000000000e+01\n",
    )
    .unwrap();
    let t = ParameterTable::read_csv(&path).unwrap();
    assert_eq!(
        t.records[0],
        ParameterRecord::from_array([1e6, 25.0, 0.5, 0.2, 12.0])
    );
}

#[test]
fn strain_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("h_00000.csv");
    let h: Vec<_> = (0..50)
        .map(|i| Complex::new((i as f64).sin() * 1e-23, (i as f64).cos() * -1e-23))
        .collect();
    write_strain_csv(&path, &h).unwrap();
    let back = read_strain_csv(&path).unwrap();
    assert_eq!(back.len(), h.len());
    for (a, b) in back.iter().zip(&h) {
        assert!((a - b).norm() < 1e-37);
    }
    assert_eq!(pad_strain(&back, 64).len(), 64);
}

#[test]
fn shipped_cfgs_parse() {
    let corr: CorrCfg = serde_yaml::from_str(include_str!("../cfg/corr_thesis.yaml")).unwrap();
    assert_eq!(corr.inputs.len(), 10);
    assert_eq!(corr.accumulate, Accumulate::LastOnly);
    let net: CorrCfg = serde_yaml::from_str(include_str!("../cfg/corr_network.yaml")).unwrap();
    assert_eq!(net, CorrCfg::network_run(9));
    let spec: SpecPlotCfg = serde_yaml::from_str(include_str!("../cfg/spec.yaml")).unwrap();
    assert_eq!(spec, SpecPlotCfg::default());
    let strain: StrainPlotCfg = serde_yaml::from_str(include_str!("../cfg/strain.yaml")).unwrap();
    assert_eq!(strain, StrainPlotCfg::default());
    let gen: GenCfg = serde_yaml::from_str(include_str!("../cfg/gen_perturbed.yaml")).unwrap();
    assert_eq!(gen.parameters, GenCfg::default().parameters);
    let _: GenCfg = serde_yaml::from_str(include_str!("../cfg/gen_random.yaml")).unwrap();
}

#[test]
fn archive_pipeline_gives_padded_spectrograms() {
    let dir = tempfile::tempdir().unwrap();
    let h: Vec<_> = (0..3000)
        .map(|i| Complex::new((0.3 * i as f64).sin() * 1e-22, 0.0))
        .collect();
    write_strain_csv(dir.path().join("h_00000.csv"), &h).unwrap();
    write_strain_csv(dir.path().join("h_00001.csv"), &h[..1000]).unwrap();

    let src = format!(
        "parameters:\n  kind: random\n  n: 2\n  seed: 1\ngenerator:\n  kind: archive\n  dir: {}\n",
        dir.path().display()
    );
    let cfg: GenCfg = serde_yaml::from_str(&src).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    let table = resolve_parameters(&cfg.parameters, &mut rng).unwrap();
    let strains = gen_strain(&*build_generator(&cfg.generator), &table.records, &cfg.source).unwrap();
    assert_eq!(strains[0].len(), 3000);
    assert_eq!(strains[1].len(), 1000);

    let spec_cfg = SpectrogramCfg {
        pad_len: 4000,
        stride: 500.0,
        ..Default::default()
    };
    let specs = gen_specs(&strains, 5.0, &spec_cfg).unwrap();
    // both padded to 4000 samples, 100 samples per bin
    assert_eq!(specs[0].ntime(), 40);
    assert_eq!(specs[1].ntime(), 40);
    assert_eq!(specs[0].nfreq(), 51);
    // the padded tail of the shorter strain is silent
    assert!(specs[1].data.row(30).iter().all(|&v| v == 0.0));
    assert!(specs[0].data.row(10).iter().any(|&v| v > 0.0));
}
