//! Duelsters in the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Duel the computer (default)
//! cargo run -p duelsters-cli
//!
//! # Two humans at one keyboard
//! cargo run -p duelsters-cli -- play --hotseat
//!
//! # Watch two computer duelists, narrated
//! cargo run -p duelsters-cli -- watch --one tank --two acrobat --seed 7
//!
//! # Balance run: 10k seeded matches in parallel
//! cargo run -p duelsters-cli -- batch --count 10000 --output results.json
//!
//! # Check a seed replays identically
//! cargo run -p duelsters-cli -- verify --seed 12345 --runs 5
//! ```
//!
//! Prompts and narration go to stdout, logs to stderr.

use std::cell::RefCell;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use duelsters_cli::{display, Console, HumanSource, Narrator};
use duelsters_core::batch::{run_batch, verify_determinism, BatchConfig};
use duelsters_core::combatant::{ClassArchetype, Combatant, ControllerKind, Side};
use duelsters_core::config::DuelRules;
use duelsters_core::controller::{ActionSource, ComputerPolicy};
use duelsters_core::dice::{self, Dice};
use duelsters_core::simulation::Match;

#[derive(Parser)]
#[command(name = "duelsters")]
#[command(about = "Turn-based duels in the terminal")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON rules file overriding the default tuning
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play an interactive duel
    Play {
        /// Second player is a human at the same keyboard
        #[arg(long)]
        hotseat: bool,

        /// Seed for the match dice (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Watch a narrated computer-vs-computer duel
    Watch {
        /// Player One's class
        #[arg(long, value_enum, default_value = "random")]
        one: ClassArg,

        /// Player Two's class
        #[arg(long, value_enum, default_value = "random")]
        two: ClassArg,

        /// Seed for the match dice (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Rounds after which the duel is called off
        #[arg(long, default_value = "500")]
        max_rounds: u32,
    },

    /// Run a batch of computer-vs-computer matches for balance testing
    Batch {
        /// Number of matches to run
        #[arg(short, long, default_value = "100")]
        count: u32,

        /// Seed of the first match
        #[arg(long, default_value = "0")]
        seed: u64,

        /// Rounds after which a match is abandoned
        #[arg(long, default_value = "500")]
        max_rounds: u32,

        /// Player One's class
        #[arg(long, value_enum, default_value = "random")]
        one: ClassArg,

        /// Player Two's class
        #[arg(long, value_enum, default_value = "random")]
        two: ClassArg,

        /// Write full results as JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify determinism by replaying one seed several times
    Verify {
        /// Seed to verify
        #[arg(long, default_value = "12345")]
        seed: u64,

        /// Number of replays
        #[arg(short, long, default_value = "5")]
        runs: u32,
    },
}

/// Class as picked on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ClassArg {
    Balanced,
    Tank,
    Brawler,
    Acrobat,
    Support,
    Random,
}

impl ClassArg {
    fn archetype(self) -> Option<ClassArchetype> {
        match self {
            Self::Balanced => Some(ClassArchetype::Balanced),
            Self::Tank => Some(ClassArchetype::Tank),
            Self::Brawler => Some(ClassArchetype::Brawler),
            Self::Acrobat => Some(ClassArchetype::Acrobat),
            Self::Support => Some(ClassArchetype::Support),
            Self::Random => None,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries prompts and narration
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let rules = load_rules(cli.rules.as_deref())?;

    match cli.command.unwrap_or(Commands::Play {
        hotseat: false,
        seed: None,
    }) {
        Commands::Play { hotseat, seed } => cmd_play(rules, hotseat, seed),
        Commands::Watch {
            one,
            two,
            seed,
            max_rounds,
        } => cmd_watch(rules, one, two, seed, max_rounds),
        Commands::Batch {
            count,
            seed,
            max_rounds,
            one,
            two,
            output,
        } => cmd_batch(rules, count, seed, max_rounds, one, two, output),
        Commands::Verify { seed, runs } => cmd_verify(rules, seed, runs),
    }
}

fn load_rules(path: Option<&Path>) -> anyhow::Result<DuelRules> {
    match path {
        Some(path) => {
            let rules = DuelRules::load(path)
                .with_context(|| format!("cannot load rules from '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "loaded rules");
            Ok(rules)
        }
        None => Ok(DuelRules::default()),
    }
}

fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs() ^ u64::from(elapsed.subsec_nanos()))
}

/// Interactive duel against the computer or a second human.
fn cmd_play(rules: DuelRules, hotseat: bool, seed: Option<u64>) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(entropy_seed);
    tracing::info!(seed, hotseat, "starting interactive match");

    let console = RefCell::new(Console::stdio());
    let mut dice = dice::seeded(seed);

    let (one, two) = {
        let mut console = console.borrow_mut();
        console.say("Welcome to Duelsters!\n")?;
        let one = create_human(&mut *console, "Player One", &rules, &mut dice)?;
        let two = if hotseat {
            create_human(&mut *console, "Player Two", &rules, &mut dice)?
        } else {
            let archetype = ClassArchetype::random(&mut dice);
            Combatant::new("The Computer", archetype, ControllerKind::Computer, &rules)?
        };
        for combatant in [&one, &two] {
            console.say(&format!("\n{}", display::character_sheet(combatant)))?;
        }
        (one, two)
    };

    let narrator = Narrator::new(one.name(), two.name());
    let mut source_one = source_for(one.controller(), &console);
    let mut source_two = source_for(two.controller(), &console);
    let mut duel = Match::with_dice(one, two, rules, dice)?;

    loop {
        while !duel.is_over() {
            let header = display::round_header(
                duel.round(),
                duel.combatant(Side::One),
                duel.combatant(Side::Two),
            );
            say(&console, &format!("\n{header}"))?;

            let report = duel.play_round(source_one.as_mut(), source_two.as_mut())?;
            say(&console, "")?;
            for line in narrator.round(&report) {
                say(&console, &line)?;
            }
        }

        if !console.borrow_mut().confirm("\nRematch?", false)? {
            break;
        }
        duel.rematch();
    }

    say(&console, "Thanks for playing!")?;
    Ok(())
}

/// Narrated computer-vs-computer duel.
fn cmd_watch(
    rules: DuelRules,
    one: ClassArg,
    two: ClassArg,
    seed: Option<u64>,
    max_rounds: u32,
) -> anyhow::Result<()> {
    let seed = seed.unwrap_or_else(entropy_seed);
    let mut dice = dice::seeded(seed);
    let one_class = one.archetype().unwrap_or_else(|| ClassArchetype::random(&mut dice));
    let two_class = two.archetype().unwrap_or_else(|| ClassArchetype::random(&mut dice));
    tracing::info!(seed, %one_class, %two_class, "starting watched match");

    let red = Combatant::new("Red", one_class, ControllerKind::Computer, &rules)?;
    let blue = Combatant::new("Blue", two_class, ControllerKind::Computer, &rules)?;
    let narrator = Narrator::new(red.name(), blue.name());
    let mut duel = Match::with_dice(red, blue, rules, dice)?;
    let mut policy_one = ComputerPolicy::new();
    let mut policy_two = ComputerPolicy::new();

    let mut out = std::io::stdout().lock();
    while !duel.is_over() && duel.rounds_played() < max_rounds {
        let header = display::round_header(
            duel.round(),
            duel.combatant(Side::One),
            duel.combatant(Side::Two),
        );
        writeln!(out, "\n{header}\n")?;
        let report = duel.play_round(&mut policy_one, &mut policy_two)?;
        for line in narrator.round(&report) {
            writeln!(out, "{line}")?;
        }
    }

    if !duel.is_over() {
        writeln!(out, "\nThe duel is called off after {max_rounds} rounds.")?;
    }
    writeln!(out, "(seed {seed})")?;
    Ok(())
}

/// Parallel balance run with a printed summary and optional JSON dump.
fn cmd_batch(
    rules: DuelRules,
    count: u32,
    seed: u64,
    max_rounds: u32,
    one: ClassArg,
    two: ClassArg,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = BatchConfig::new(count)
        .with_seed(seed)
        .with_max_rounds(max_rounds)
        .with_archetypes(one.archetype(), two.archetype())
        .with_rules(rules);

    let results = run_batch(config).context("batch run failed")?;

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&results).context("cannot serialize results")?;
        std::fs::write(&path, json)
            .with_context(|| format!("cannot write results to '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "saved batch results");
    }

    println!("{}", display::batch_report(&results));
    Ok(())
}

/// Replays one seed and fails if any run differs.
fn cmd_verify(rules: DuelRules, seed: u64, runs: u32) -> anyhow::Result<()> {
    let config = BatchConfig::new(1).with_rules(rules);
    if verify_determinism(&config, seed, runs)? {
        println!("Seed {seed}: {runs} runs identical");
        Ok(())
    } else {
        bail!("seed {seed} diverged across {runs} runs")
    }
}

fn create_human<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    who: &str,
    rules: &DuelRules,
    dice: &mut dyn Dice,
) -> anyhow::Result<Combatant> {
    let name = console.ask_name(who)?;
    let archetype = match console.ask_class(&name)? {
        Some(archetype) => archetype,
        None => {
            let archetype = ClassArchetype::random(dice);
            console.say(&format!("The dice make {name} a {archetype}."))?;
            archetype
        }
    };
    Ok(Combatant::new(name, archetype, ControllerKind::Human, rules)?)
}

fn source_for<'a, R: BufRead + 'a, W: Write + 'a>(
    controller: ControllerKind,
    console: &'a RefCell<Console<R, W>>,
) -> Box<dyn ActionSource + 'a> {
    match controller {
        ControllerKind::Human => Box::new(HumanSource::new(console)),
        ControllerKind::Computer => Box::new(ComputerPolicy::new()),
    }
}

fn say<R: BufRead, W: Write>(console: &RefCell<Console<R, W>>, text: &str) -> anyhow::Result<()> {
    console.borrow_mut().say(text)?;
    Ok(())
}
