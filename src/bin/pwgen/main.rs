use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;

mod report;
mod rules_file;

use pwgen::{CharacterClass, GenerateError, Requirement, RuleSet, UnbiasedRandom};

/// Generate passwords satisfying per-class minimum-count requirements.
///
/// With no requirement flags, a default policy is used: at least one
/// lowercase letter, one uppercase letter, one digit, and one special
/// character.
#[derive(Parser)]
struct Args {
    /// Length of each generated password.
    #[arg(long, short = 'L', default_value_t = 12)]
    length: usize,

    /// Number of passwords to generate.
    #[arg(long, short = 'c', default_value_t = 1)]
    count: usize,

    /// Minimum number of lowercase letters.
    #[arg(long, short = 'l', value_name = "MIN")]
    lower: Option<usize>,

    /// Minimum number of uppercase letters.
    #[arg(long, short = 'u', value_name = "MIN")]
    upper: Option<usize>,

    /// Minimum number of digits.
    #[arg(long, short = 'n', value_name = "MIN")]
    digits: Option<usize>,

    /// Minimum number of special characters.
    #[arg(long, short = 's', value_name = "MIN")]
    special: Option<usize>,

    /// Load the rule set from a YAML file; requirement flags then override
    /// classes of the same name.
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,

    /// After the passwords, print a distribution analysis of every generated
    /// character.
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn run() -> Result<(), ProgError> {
    let args = Args::parse();
    let rules = assemble_rules(&args)?;

    let mut random = UnbiasedRandom::new(rand::thread_rng());
    let mut report = args
        .verbose
        .then(|| report::DistributionReport::new(&rules));

    for _ in 0..args.count {
        let buffer = pwgen::generate(&rules, args.length, &mut random)?;
        let password: String = buffer.chars().iter().collect();
        println!("{password}");
        if let Some(report) = report.as_mut() {
            report.record(&password);
        }
    }

    if let Some(report) = report {
        report.print();
    }
    Ok(())
}

fn assemble_rules(args: &Args) -> Result<RuleSet, ProgError> {
    let mut rules = match args.rules.as_deref() {
        Some(path) => rules_file::load(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => RuleSet::new(),
    };

    let overrides = [
        (args.lower, CharacterClass::lowercase()),
        (args.upper, CharacterClass::uppercase()),
        (args.digits, CharacterClass::digits()),
        (args.special, CharacterClass::special()),
    ];
    for (min_count, class) in overrides {
        if let Some(min_count) = min_count {
            rules.add_or_replace(Requirement::new(class, min_count));
        }
    }

    if !rules.is_valid() {
        rules = RuleSet::default_rules();
    }
    Ok(rules)
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{}", console::style(&err).red());
        process::exit(1);
    }
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error("failed to generate a password: {0}")]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
