//! Collective judgment workbench CLI - solve, compare and sweep aggregation rules

use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context};
use clap::{Parser, ValueEnum};
use judgment_compare::{
    MethodConfig, PairwiseConfig, RunConfig, SolverBackend, SweepConfig, Workbench,
    DEFAULT_SWEEP_LAMBDAS,
};
use judgment_profiles::DEFAULT_SWEEP_SAMPLE;
use judgment_rules::Rule;
use judgment_scenario::{
    antipodal_pairs, Judgment, Profile, ProfileEntry, Scenario, ScenarioDefinition,
    TruthTableOracle,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "judgment")]
#[command(about = "Collective judgment workbench - compare judgment aggregation rules")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Backend {
    /// Score every feasible outcome
    BruteForce,
    /// Encode an optimisation problem
    Oracle,
}

impl From<Backend> for SolverBackend {
    fn from(backend: Backend) -> Self {
        match backend {
            Backend::BruteForce => SolverBackend::BruteForce,
            Backend::Oracle => SolverBackend::Oracle,
        }
    }
}

#[derive(clap::Args)]
struct ScenarioArgs {
    /// Scenario definition (JSON)
    scenario: PathBuf,

    /// Electorate size, overriding the definition
    #[arg(short = 'n', long)]
    voters: Option<usize>,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Evaluate profiles in parallel batches
    #[arg(long)]
    parallel: bool,

    /// Profiles per parallel batch
    #[arg(long, default_value_t = 256)]
    batch_size: usize,

    /// Skip profiles whose evaluation fails instead of aborting
    #[arg(long)]
    skip_failures: bool,

    /// Stop after this many seconds and report what was completed
    #[arg(long)]
    time_limit: Option<f64>,

    /// Seed for sampled and simulated profiles
    #[arg(long)]
    seed: Option<u64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            parallel: self.parallel,
            batch_size: self.batch_size,
            skip_failures: self.skip_failures,
            time_limit_secs: self.time_limit,
            ..RunConfig::default()
        }
    }

    /// Lets the flags override settings read from a configuration file.
    fn apply(&self, run: &mut RunConfig) {
        run.parallel |= self.parallel;
        run.skip_failures |= self.skip_failures;
        if self.time_limit.is_some() {
            run.time_limit_secs = self.time_limit;
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Show the consistency sets of a scenario
    Info {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// List the rational and feasible judgments
        #[arg(long)]
        show_judgments: bool,
    },
    /// Aggregate one profile under one rule
    Solve {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Rule: kemeny, kemnash, lamb-kemnash, maxham, maxeq, kemeny-original, all_rules
        #[arg(short, long, default_value = "kemeny")]
        rule: Rule,

        /// λ for lamb-kemnash and all_rules
        #[arg(short, long, default_value_t = 0.0)]
        lambda: f64,

        #[arg(long, value_enum, default_value = "brute-force")]
        solver: Backend,

        /// Profile as signature:count pairs, e.g. "110:2,011:1"; defaults to the declared voters
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// Compare two methods over the profile space
    Compare {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Comparison configuration (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "kemeny")]
        rule1: Rule,
        #[arg(long, default_value_t = 0.0)]
        lambda1: f64,
        #[arg(long, value_enum, default_value = "brute-force")]
        solver1: Backend,

        #[arg(long, default_value = "kemnash")]
        rule2: Rule,
        #[arg(long, default_value_t = 0.0)]
        lambda2: f64,
        #[arg(long, value_enum, default_value = "brute-force")]
        solver2: Backend,

        /// Profiles to sample; 0 walks the whole space
        #[arg(long)]
        sample: Option<usize>,

        /// Simulate profiles when the space is larger than this
        #[arg(long)]
        simulate: Option<u128>,

        /// Maximum number of example profiles to keep
        #[arg(long)]
        examples: Option<usize>,

        /// Keep examples where both methods agree as well
        #[arg(long)]
        all_examples: bool,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Sweep λ for Kemeny-Nash against Kemeny, Maxham and Maxeq
    Sweep {
        #[command(flatten)]
        scenario: ScenarioArgs,

        /// Sweep configuration (JSON); flags below override it
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Comma-separated λ values
        #[arg(long, value_delimiter = ',')]
        lambdas: Vec<f64>,

        /// Profiles per λ
        #[arg(long)]
        sample: Option<usize>,

        #[arg(long, value_enum)]
        solver: Option<Backend>,

        #[command(flatten)]
        run: RunArgs,
    },
}

fn load_scenario(args: &ScenarioArgs) -> anyhow::Result<Scenario> {
    let definition = ScenarioDefinition::from_path(&args.scenario)
        .with_context(|| format!("reading scenario {}", args.scenario.display()))?;
    let scenario = Scenario::from_definition(definition, &TruthTableOracle::new())
        .with_context(|| format!("building scenario {}", args.scenario.display()))?;
    match args.voters {
        Some(voters) => {
            ensure!(voters > 0, "the electorate needs at least one voter");
            Ok(scenario.with_number_voters(voters))
        }
        None => Ok(scenario),
    }
}

/// Parses `sig:count` pairs; a bare signature counts once.
fn parse_profile(text: &str) -> anyhow::Result<Profile> {
    let mut entries = Vec::new();
    for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (signature, count) = match item.split_once(':') {
            Some((signature, count)) => (
                signature,
                count
                    .parse::<usize>()
                    .with_context(|| format!("bad voter count in '{}'", item))?,
            ),
            None => (item, 1),
        };
        let judgment = Judgment::from_signature(signature)
            .with_context(|| format!("bad judgment signature '{}'", signature))?;
        entries.push(ProfileEntry::new(count, judgment));
    }
    ensure!(!entries.is_empty(), "the profile is empty");
    Ok(Profile::new(entries))
}

fn signatures(judgments: &[Judgment]) -> String {
    judgments
        .iter()
        .map(Judgment::signature)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn read_config<T>(path: &Path, load: impl Fn(&Path) -> judgment_compare::Result<T>) -> anyhow::Result<T> {
    load(path).with_context(|| format!("reading configuration {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Info {
            scenario,
            show_judgments,
        }) => {
            let scenario = load_scenario(&scenario)?;
            let rational = scenario.in_consistent();
            let feasible = scenario.out_consistent();
            println!(
                "There are {} rational judgments containing {} pairs of antipodal judgments.",
                rational.len(),
                antipodal_pairs(rational)
            );
            println!(
                "There are {} feasible judgments containing {} pairs of antipodal judgments.",
                feasible.len(),
                antipodal_pairs(feasible)
            );
            println!(
                "{} voters: {} profiles; fingerprint {}",
                scenario.number_voters(),
                scenario.num_profiles(),
                scenario.fingerprint()
            );
            if show_judgments {
                println!("Rational: {}", signatures(rational));
                println!("Feasible: {}", signatures(feasible));
            }
        }
        Some(Commands::Solve {
            scenario,
            rule,
            lambda,
            solver,
            profile,
        }) => {
            let bench = Workbench::new(load_scenario(&scenario)?);
            let profile = match profile {
                Some(text) => parse_profile(&text)?,
                None => match bench.scenario().declared_profile() {
                    Some(declared) => declared.clone(),
                    None => bail!("no profile given and the scenario declares no voters"),
                },
            };
            debug!("profile {}", profile);
            if rule == Rule::AllRules {
                let all = bench.solve_all(solver.into(), &profile, lambda)?;
                for base in Rule::BASE {
                    if let Some(winners) = all.get(base) {
                        println!("{:<8} {}", base.id(), signatures(&winners.outcomes));
                    }
                }
            } else {
                let method = MethodConfig::new(rule)
                    .with_lambda(lambda)
                    .with_solver(solver.into());
                let winners = bench.solve(&method, &profile)?;
                println!("{}", signatures(&winners));
            }
        }
        Some(Commands::Compare {
            scenario,
            config,
            rule1,
            lambda1,
            solver1,
            rule2,
            lambda2,
            solver2,
            sample,
            simulate,
            examples,
            all_examples,
            run,
        }) => {
            let bench = Workbench::new(load_scenario(&scenario)?);
            let mut config = match config {
                Some(path) => {
                    let mut config = read_config(&path, |p| PairwiseConfig::from_path(p))?;
                    run.apply(&mut config.run);
                    config
                }
                None => PairwiseConfig::new(
                    MethodConfig::new(rule1)
                        .with_lambda(lambda1)
                        .with_solver(solver1.into()),
                    MethodConfig::new(rule2)
                        .with_lambda(lambda2)
                        .with_solver(solver2.into()),
                )
                .with_run(run.run_config()),
            };
            if let Some(sample) = sample {
                config.sampling.sample = sample;
            }
            if let Some(threshold) = simulate {
                config.sampling.simulate_threshold = threshold;
            }
            if let Some(seed) = run.seed {
                config.sampling.seed = Some(seed);
            }
            if let Some(max_examples) = examples {
                config.examples.max_examples = max_examples;
            }
            config.examples.all_examples |= all_examples;

            info!("comparing {} and {}", config.first.label(), config.second.label());
            let report = bench.compare(config)?;
            if run.json {
                print_json(&report)?;
            } else {
                print!("{}", report);
            }
        }
        Some(Commands::Sweep {
            scenario,
            config,
            lambdas,
            sample,
            solver,
            run,
        }) => {
            let bench = Workbench::new(load_scenario(&scenario)?);
            let mut config = match config {
                Some(path) => {
                    let mut config = read_config(&path, |p| SweepConfig::from_path(p))?;
                    run.apply(&mut config.run);
                    config
                }
                None => SweepConfig::new(DEFAULT_SWEEP_LAMBDAS.to_vec())
                    .with_sample(DEFAULT_SWEEP_SAMPLE)
                    .with_run(run.run_config()),
            };
            if !lambdas.is_empty() {
                config.lambdas = lambdas;
            }
            if let Some(sample) = sample {
                config.sampling.sample = sample;
            }
            if let Some(solver) = solver {
                config.solver = solver.into();
            }
            if let Some(seed) = run.seed {
                config.sampling.seed = Some(seed);
            }

            let report = bench.sweep(config)?;
            if run.json {
                print_json(&report)?;
            } else {
                print!("{}", report);
            }
        }
        None => {
            println!("judgment v{} - Use --help for commands", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_profile() {
        let profile = parse_profile("11:2, 00").unwrap();
        assert_eq!(profile.number_voters(), 3);
        assert_eq!(profile.entries().len(), 2);
    }

    #[test]
    fn test_parse_profile_errors() {
        assert!(parse_profile("").is_err());
        assert!(parse_profile("11:x").is_err());
        assert!(parse_profile("1a").is_err());
    }

    #[test]
    fn test_cli_parses_compare() {
        let cli = Cli::try_parse_from([
            "judgment",
            "compare",
            "scenario.json",
            "--rule2",
            "lamb-kemnash",
            "--lambda2",
            "0.1",
            "--sample",
            "100",
            "--parallel",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Compare {
                rule2,
                lambda2,
                sample,
                run,
                ..
            }) => {
                assert_eq!(rule2, Rule::LambdaKemenyNash);
                assert_eq!(lambda2, 0.1);
                assert_eq!(sample, Some(100));
                assert!(run.parallel);
            }
            _ => panic!("expected compare"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_rule() {
        assert!(Cli::try_parse_from(["judgment", "solve", "s.json", "--rule", "borda"]).is_err());
    }

    #[test]
    fn test_load_scenario_with_voter_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scenario.json");
        std::fs::write(
            &path,
            r#"{
                "variables": ["p", "q"],
                "agenda": [
                    {"label": 1, "formula": {"var": "p"}},
                    {"label": 2, "formula": {"var": "q"}}
                ],
                "number_voters": 3
            }"#,
        )
        .unwrap();
        let args = ScenarioArgs {
            scenario: path,
            voters: Some(5),
        };
        let scenario = load_scenario(&args).unwrap();
        assert_eq!(scenario.number_voters(), 5);
        assert_eq!(scenario.in_consistent().len(), 4);

        let zero = ScenarioArgs {
            voters: Some(0),
            ..args
        };
        assert!(load_scenario(&zero).is_err());
    }
}
