//! Slot Machine - terminal front end
//!
//! Main entry point. Reads one command per line from stdin and redraws the
//! machine after every intent.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use sm_core::{GameConfig, SmError, SmResult};
use sm_engine::{RandomSource, RoundEngine, RoundReport, Settlement, StdRandom};
use sm_stage::{Cue, CueEvent, FeedbackSink, NullSink};
use sm_state::JsonFileStore;

#[derive(Parser)]
#[command(name = "slot-machine", about = "Three-reel slot machine")]
struct Cli {
    /// Machine config (JSON); the classic machine when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// High-score file (defaults to the per-user config directory)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Seed the reels for a reproducible session
    #[arg(long)]
    seed: Option<u64>,

    /// Print the machine state as JSON after every command
    #[arg(long)]
    json: bool,

    /// Silence the terminal bell
    #[arg(long)]
    mute: bool,
}

const GAME_OVER_HINT: &str = "Game over. Type `new` to play again.";

/// A player intent typed at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Spin,
    Bet(i64),
    /// Restart from scratch, clearing the high score
    Reset,
    /// Play again after a game over, keeping the high score
    NewGame,
    Info,
    Quit,
}

impl Command {
    fn parse(line: &str) -> std::result::Result<Self, String> {
        let mut words = line.split_whitespace();
        let cmd = match words.next() {
            None => return Ok(Command::Spin),
            Some(word) => word.to_ascii_lowercase(),
        };
        match cmd.as_str() {
            "spin" | "s" => Ok(Command::Spin),
            "bet" | "b" => {
                let amount = words
                    .next()
                    .ok_or_else(|| "usage: bet <amount>".to_string())?;
                amount
                    .parse()
                    .map(Command::Bet)
                    .map_err(|_| format!("not a number: {amount}"))
            }
            "reset" => Ok(Command::Reset),
            "new" | "again" => Ok(Command::NewGame),
            "info" | "help" | "?" => Ok(Command::Info),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {other} (try `info`)")),
        }
    }
}

/// Rings the terminal bell for payouts and game over
struct BellSink;

impl FeedbackSink for BellSink {
    fn play(&mut self, event: &CueEvent) -> SmResult<()> {
        log::debug!("cue {}", event.cue);
        if event.cue.is_celebration() || event.cue == Cue::GameOver {
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Starting Slot Machine...");

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GameConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::classic(),
    };
    let store = match &cli.store {
        Some(path) => JsonFileStore::open(path),
        None => JsonFileStore::open_default(),
    };
    log::debug!("High score file: {}", store.path().display());

    let rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(StdRandom::seeded(seed)),
        None => Box::new(StdRandom::from_os()),
    };
    let feedback: Box<dyn FeedbackSink> = if cli.mute {
        Box::new(NullSink)
    } else {
        Box::new(BellSink)
    };

    let mut engine = RoundEngine::new(config, Box::new(store), rng, feedback)
        .context("Failed to start the machine")?;

    let stdin = io::stdin();
    let mut out = io::stdout();
    render(&mut out, &engine, cli.json)?;

    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(msg) => {
                writeln!(out, "{msg}")?;
                prompt(&mut out, &engine)?;
                continue;
            }
        };

        if !dispatch(&mut engine, command, &mut out)? {
            break;
        }

        render(&mut out, &engine, cli.json)?;
    }

    let stats = engine.stats();
    log::info!(
        "Session ended: {} spins, {} wins, net {:+}",
        stats.spins,
        stats.wins,
        stats.net()
    );
    Ok(())
}

/// Apply one command; `false` once the player quits
///
/// While the game is over only `new`, `reset`, `info` and `quit` act.
fn dispatch(engine: &mut RoundEngine, command: Command, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Spin => match engine.play_round() {
            Ok(report) => announce(out, &report)?,
            Err(SmError::GameOver) => writeln!(out, "{GAME_OVER_HINT}")?,
            Err(e) => writeln!(out, "{e}")?,
        },
        Command::Bet(_) if engine.is_game_over() => writeln!(out, "{GAME_OVER_HINT}")?,
        Command::Bet(amount) => {
            if let Err(e) = engine.set_bet(amount) {
                writeln!(out, "{e} (choose from {:?})", engine.config().allowed_bets)?;
            }
        }
        Command::Reset => engine.reset_game(true),
        Command::NewGame => {
            if engine.is_game_over() {
                engine.reset_game(false);
            } else {
                writeln!(out, "Still in play. Use `reset` to start over.")?;
            }
        }
        Command::Info => info(out, engine.config())?,
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

fn render(out: &mut impl Write, engine: &RoundEngine, json: bool) -> Result<()> {
    let view = engine.view();
    if json {
        writeln!(out, "{}", serde_json::to_string(&view)?)?;
    } else {
        let reels: Vec<String> = view.symbols.iter().map(|s| format!("[{s:^10}]")).collect();
        let bets: Vec<String> = view
            .allowed_bets
            .iter()
            .map(|&b| {
                if b == view.bet {
                    format!("({b})")
                } else {
                    format!(" {b} ")
                }
            })
            .collect();

        writeln!(out)?;
        writeln!(out, "  {}", reels.join(" "))?;
        writeln!(
            out,
            "  Your coins: {:<8} High score: {}",
            view.coins, view.high_score
        )?;
        writeln!(out, "  Bet: {}", bets.join(" "))?;
        if view.game_over {
            writeln!(out)?;
            writeln!(out, "  *** GAME OVER ***")?;
            writeln!(out, "  Bad luck! You lost all of the coins. Let's play again!")?;
        }
    }
    prompt(out, engine)
}

fn prompt(out: &mut impl Write, engine: &RoundEngine) -> Result<()> {
    if engine.is_game_over() {
        write!(out, "new/reset/quit> ")?;
    } else {
        write!(out, "spin> ")?;
    }
    out.flush()?;
    Ok(())
}

fn announce(out: &mut impl Write, report: &RoundReport) -> Result<()> {
    match report.settlement {
        Settlement::Win {
            payout,
            new_high_score: true,
        } => writeln!(out, "Three of a kind! +{payout} coins. New high score!")?,
        Settlement::Win { payout, .. } => writeln!(out, "Three of a kind! +{payout} coins.")?,
        Settlement::Loss { stake } => writeln!(out, "No match. -{stake} coins.")?,
    }
    Ok(())
}

fn info(out: &mut impl Write, config: &GameConfig) -> Result<()> {
    writeln!(out, "Slot Machine")?;
    writeln!(
        out,
        "  Match all three reels to win {}x your bet. Anything else loses the bet.",
        config.payout_multiplier
    )?;
    writeln!(out, "  Commands:")?;
    writeln!(out, "    spin (or Enter)   spin the reels")?;
    writeln!(out, "    bet <amount>      stake one of {:?}", config.allowed_bets)?;
    writeln!(out, "    new               play again after a game over")?;
    writeln!(out, "    reset             start over and clear the high score")?;
    writeln!(out, "    quit              leave the machine")?;
    Ok(())
}
