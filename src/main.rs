use clap::{App, Arg};
use helixblock::constraint::{HelixConstraint, SeedConstraint};
use helixblock::energy::{BasePairEnergy, Energy, InteractionEnergy};
use helixblock::error::{HelixError, Result};
use helixblock::interaction::{BasePair, Interaction};
use helixblock::PredictConfig;
use serde::Serialize;
#[macro_use]
extern crate log;

fn app() -> App<'static, 'static> {
    App::new("helixblock")
        .version("0.1")
        .author("Bansho Masutani")
        .about("RNA-RNA interactions as chains of helices:[SEQ]x[SEQ]->[TSV|JSON]")
        .setting(clap::AppSettings::ArgRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Debug mode"),
        )
        .arg(
            Arg::with_name("query")
                .long("query")
                .short("q")
                .value_name("SEQ")
                .takes_value(true)
                .required(true)
                .help("First RNA, 5' to 3'."),
        )
        .arg(
            Arg::with_name("target")
                .long("target")
                .short("t")
                .value_name("SEQ")
                .takes_value(true)
                .required(true)
                .help("Second RNA, 5' to 3'."),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("JSON")
                .takes_value(true)
                .help("Configuration file. Flags given explicitly override it."),
        )
        .arg(
            Arg::with_name("model")
                .long("model")
                .takes_value(true)
                .possible_values(&["auto", "stacking", "nobulge", "unpaired"])
                .help("Helix engine. auto: stacking without internal loops, unpaired otherwise."),
        )
        .arg(
            Arg::with_name("min_bp")
                .long("min-bp")
                .takes_value(true)
                .help("Minimum number of base pairs of a helix [2]"),
        )
        .arg(
            Arg::with_name("max_bp")
                .long("max-bp")
                .takes_value(true)
                .help("Maximum number of base pairs of a helix [10]"),
        )
        .arg(
            Arg::with_name("max_il")
                .long("max-il")
                .takes_value(true)
                .help("Maximum number of unpaired bases of a loop within a helix [0]"),
        )
        .arg(
            Arg::with_name("max_ed")
                .long("max-ed")
                .takes_value(true)
                .help("Maximum accessibility penalty of a helix [999]"),
        )
        .arg(
            Arg::with_name("max_e")
                .long("max-e")
                .takes_value(true)
                .allow_hyphen_values(true)
                .help("Helices have to be below this energy [0]"),
        )
        .arg(
            Arg::with_name("no_ed")
                .long("no-ed")
                .help("Compare helices without accessibility penalties."),
        )
        .arg(
            Arg::with_name("seed_bp")
                .long("seed-bp")
                .takes_value(true)
                .help("Number of base pairs of a seed [7]"),
        )
        .arg(
            Arg::with_name("seed_max_unpaired")
                .long("seed-max-unpaired")
                .takes_value(true)
                .help("Maximum number of unpaired bases of a seed [0]"),
        )
        .arg(
            Arg::with_name("seed_max_unpaired1")
                .long("seed-max-unpaired1")
                .takes_value(true)
                .help("Maximum number of unpaired bases of a seed in the query"),
        )
        .arg(
            Arg::with_name("seed_max_unpaired2")
                .long("seed-max-unpaired2")
                .takes_value(true)
                .help("Maximum number of unpaired bases of a seed in the target"),
        )
        .arg(
            Arg::with_name("seed_no_gu")
                .long("seed-no-gu")
                .help("No GU base pairs in seeds."),
        )
        .arg(
            Arg::with_name("seed_no_lp")
                .long("seed-no-lp")
                .help("No lonely base pairs in seeds."),
        )
        .arg(
            Arg::with_name("no_seed")
                .long("no-seed")
                .help("Interactions do not need to contain a seed."),
        )
        .arg(
            Arg::with_name("suboptimals")
                .long("suboptimals")
                .short("n")
                .takes_value(true)
                .help("Number of interactions to report [1]"),
        )
        .arg(
            Arg::with_name("json")
                .long("json")
                .help("Output JSON instead of TSV."),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .takes_value(true)
                .default_value("1")
                .help("Number of threads"),
        )
}

fn parse<T: std::str::FromStr>(matches: &clap::ArgMatches, name: &str) -> Result<Option<T>> {
    match matches.value_of(name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| HelixError::Config(format!("invalid value of {}: {}", name, value))),
        None => Ok(None),
    }
}

fn config(matches: &clap::ArgMatches) -> Result<PredictConfig> {
    let mut config = match matches.value_of("config") {
        Some(path) => PredictConfig::from_file(path)?,
        None => PredictConfig::default(),
    };
    if let Some(model) = parse(matches, "model")? {
        config.model = model;
    }
    let h = config.helix;
    config.helix = HelixConstraint::new(
        parse(matches, "min_bp")?.unwrap_or_else(|| h.min_bp()),
        parse(matches, "max_bp")?.unwrap_or_else(|| h.max_bp()),
        parse(matches, "max_il")?.unwrap_or_else(|| h.max_il()),
        parse(matches, "max_ed")?.unwrap_or_else(|| h.max_ed()),
        parse(matches, "max_e")?.unwrap_or_else(|| h.max_e()),
        h.eval_full_e() && !matches.is_present("no_ed"),
    )?;
    if matches.is_present("no_seed") {
        config.seed = None;
    } else {
        let base = match config.seed.take() {
            Some(seed) => seed,
            None => SeedConstraint::new(7, 0)?,
        };
        let bp = parse(matches, "seed_bp")?.unwrap_or_else(|| base.bp());
        let up = parse(matches, "seed_max_unpaired")?
            .unwrap_or_else(|| base.max_unpaired_overall());
        // A new overall bound also lifts the per-strand ones.
        let fresh = matches.is_present("seed_max_unpaired");
        let up1 = parse(matches, "seed_max_unpaired1")?
            .unwrap_or_else(|| if fresh { up } else { base.max_unpaired1() });
        let up2 = parse(matches, "seed_max_unpaired2")?
            .unwrap_or_else(|| if fresh { up } else { base.max_unpaired2() });
        let gu = base.is_gu_allowed() && !matches.is_present("seed_no_gu");
        let lp = base.is_lp_allowed() && !matches.is_present("seed_no_lp");
        let seed = SeedConstraint::new(bp, up)?
            .with_max_unpaired(up1, up2)
            .with_max_e(base.max_e())
            .with_max_ed(base.max_ed())
            .with_max_e_hybrid(base.max_e_hybrid())
            .with_ranges(base.ranges1().clone(), base.ranges2().clone())
            .with_gu(gu, gu && base.is_gu_end_allowed())
            .with_lonely_pairs(lp);
        config.seed = Some(seed);
    }
    if let Some(suboptimals) = parse(matches, "suboptimals")? {
        config.suboptimals = suboptimals;
    }
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct Record<'a> {
    energy: Energy,
    // Positions on the input sequences.
    base_pairs: Vec<BasePair>,
    dot_bar: String,
    seed: Option<&'a helixblock::interaction::SeedInfo>,
}

fn range(positions: &[BasePair]) -> String {
    match (positions.first(), positions.last()) {
        (Some(first), Some(last)) => format!(
            "{}-{}\t{}-{}",
            first.0 + 1,
            last.0 + 1,
            last.1 + 1,
            first.1 + 1
        ),
        _ => "-\t-".to_string(),
    }
}

fn report(energy: &dyn InteractionEnergy, interactions: &[Interaction], json: bool) -> Result<()> {
    use std::io::Write;
    let stdout = std::io::stdout();
    let mut wtr = std::io::BufWriter::new(stdout.lock());
    if json {
        let records: Vec<_> = interactions
            .iter()
            .map(|x| Record {
                energy: x.energy,
                base_pairs: x.positions(energy),
                dot_bar: x.dot_bar(energy),
                seed: x.seed.as_ref(),
            })
            .collect();
        serde_json::to_writer_pretty(&mut wtr, &records)?;
        writeln!(&mut wtr)?;
        return Ok(());
    }
    writeln!(&mut wtr, "energy\tstart1-end1\tstart2-end2\tdotbar\tseedE")?;
    for interaction in interactions {
        let seed = match interaction.seed.as_ref() {
            Some(seed) => format!("{:.2}", seed.energy),
            None => "-".to_string(),
        };
        writeln!(
            &mut wtr,
            "{:.2}\t{}\t{}\t{}",
            interaction.energy,
            range(&interaction.positions(energy)),
            interaction.dot_bar(energy),
            seed
        )?;
    }
    Ok(())
}

fn run(matches: &clap::ArgMatches) -> Result<()> {
    let config = config(matches)?;
    debug!("{}", config.to_json()?);
    let query = matches.value_of("query").unwrap_or_default();
    let target = matches.value_of("target").unwrap_or_default();
    let energy =
        BasePairEnergy::with_config(query.as_bytes(), target.as_bytes(), &config.energy)?;
    let interactions = helixblock::predict_on(&energy, &config)?;
    if interactions.is_empty() {
        info!("no interaction found");
    }
    report(&energy, &interactions, matches.is_present("json"))
}

fn main() {
    let matches = app().get_matches();
    let level = match matches.occurrences_of("verbose") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    let threads: usize = matches
        .value_of("threads")
        .and_then(|x| x.parse().ok())
        .unwrap_or(1);
    if let Err(why) = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
    {
        debug!("{:?}", why);
    }
    debug!("Start");
    if let Err(why) = run(&matches) {
        error!("{}", why);
        std::process::exit(1);
    }
}
