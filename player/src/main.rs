use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gerrymander::puzzle::{Catalog, Puzzle};
use gerrymander::{Action, Game, Location, Rejection, Tribe};
use tracing_subscriber::EnvFilter;

/// Play a districting puzzle from the terminal
#[derive(Parser, Debug)]
#[command(name = "player")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Puzzle catalog in TOML (default: the built-in catalog)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Index of the puzzle to play
    #[arg(short, long, default_value = "0")]
    puzzle: usize,

    /// List the puzzles in the catalog and exit
    #[arg(short, long)]
    list: bool,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable board and district summary.
    Text,
    /// One JSON document per line.
    Json,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Dispatch(Action),
    Reset,
    Print,
    Quit,
}

const USAGE: &str =
    "commands: `t <row> <col>` toggles a unit, `s [district]` switches district, `r` resets, `p` prints, `q` quits";

fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let numbers = words
        .map(|word| word.parse::<usize>().with_context(|| format!("{word:?} is not a number")))
        .collect::<Result<Vec<_>>>()?;

    let command = match (verb, numbers.as_slice()) {
        ("t", [row, col]) => Command::Dispatch(Action::ToggleUnit { coordinates: Location(*row, *col) }),
        ("s", []) => Command::Dispatch(Action::SwitchDistrict { index: None }),
        // shown numbered from 1, see `DistrictId`'s Display
        ("s", [0]) => bail!("districts are numbered from 1"),
        ("s", [district]) => Command::Dispatch(Action::SwitchDistrict { index: Some(*district - 1) }),
        ("r", []) => Command::Reset,
        ("p", []) => Command::Print,
        ("q", []) => Command::Quit,
        _ => bail!("unrecognised command {line:?}; {USAGE}"),
    };
    Ok(Some(command))
}

/// Apply `command` to `game`, returning the rejection if the game refused it.
fn step(command: &Command, puzzle: &Puzzle, game: &mut Game) -> Result<Option<Rejection>> {
    match command {
        Command::Dispatch(action) => Ok(game.dispatch(*action).err()),
        Command::Reset => {
            *game = puzzle.new_game()?;
            tracing::debug!(title = %puzzle.title, "reset puzzle");
            Ok(None)
        }
        Command::Print | Command::Quit => Ok(None),
    }
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    let Some(path) = path else {
        return Ok(Catalog::builtin()?);
    };
    let document = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    Catalog::from_toml_str(&document).with_context(|| format!("failed to load {}", path.display()))
}

fn list(catalog: &Catalog, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for (index, puzzle) in catalog.puzzles().iter().enumerate() {
                writeln!(
                    out,
                    "{index}: {} ({} rows, districts of {}, {} needs {})",
                    puzzle.title,
                    puzzle.distribution.len(),
                    puzzle.district_size,
                    puzzle.win.tribe,
                    puzzle.win.at_least
                )?;
            }
        }
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(catalog.puzzles())?)?,
    }
    Ok(())
}

fn introduce(puzzle: &Puzzle, game: &Game, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    if format == OutputFormat::Json {
        return Ok(());
    }

    let vote = game.popular_vote();
    writeln!(out, "{}", puzzle.title)?;
    writeln!(out, "{}", puzzle.description)?;
    writeln!(
        out,
        "popular vote: {} RED, {} BLUE; win at least {} districts for {}",
        vote.get(&Tribe::Red).copied().unwrap_or(0),
        vote.get(&Tribe::Blue).copied().unwrap_or(0),
        puzzle.win.at_least,
        puzzle.win.tribe
    )?;
    writeln!(out, "{USAGE}")?;
    Ok(())
}

fn report(puzzle: &Puzzle, game: &Game, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let verdict = puzzle.win.evaluate(game);

    match format {
        OutputFormat::Text => {
            write!(out, "{game}")?;
            for id in game.district_ids() {
                let marker = if id == game.current_district_id() { '*' } else { ' ' };
                if let Some(district) = game.district(id) {
                    writeln!(out, "{marker} {id}: {district}")?;
                }
            }
            writeln!(out, "{verdict}")?;
        }
        OutputFormat::Json => {
            let document = serde_json::json!({ "game": game.snapshot(), "verdict": verdict });
            writeln!(out, "{document}")?;
        }
    }
    Ok(())
}

fn reject(rejection: &Rejection, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "rejected: {rejection}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::json!({ "rejected": rejection.to_string() }))?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let catalog = load_catalog(args.catalog.as_ref())?;
    let mut out = io::stdout().lock();

    if args.list {
        return list(&catalog, args.format, &mut out);
    }

    let puzzle = catalog
        .get(args.puzzle)
        .with_context(|| format!("no puzzle at index {}; the catalog holds {}", args.puzzle, catalog.len()))?;
    let mut game = puzzle.new_game()?;
    tracing::info!(title = %puzzle.title, "starting puzzle");

    introduce(puzzle, &game, args.format, &mut out)?;
    report(puzzle, &game, args.format, &mut out)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read command")?;

        match parse_command(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => {
                if let Some(rejection) = step(&command, puzzle, &mut game)? {
                    reject(&rejection, args.format, &mut out)?;
                }
                report(puzzle, &game, args.format, &mut out)?;
            }
            Err(error) => writeln!(out, "{error:#}")?,
        }
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use gerrymander::puzzle::Catalog;
    use gerrymander::{Action, Location, Rejection};

    use crate::{parse_command, step, Command};

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn parses_every_command() {
        assert_eq!(parse("t 2 3"), Command::Dispatch(Action::ToggleUnit { coordinates: Location(2, 3) }));
        assert_eq!(parse("  t   0 4  "), Command::Dispatch(Action::ToggleUnit { coordinates: Location(0, 4) }));
        assert_eq!(parse("s"), Command::Dispatch(Action::SwitchDistrict { index: None }));
        assert_eq!(parse("s 1"), Command::Dispatch(Action::SwitchDistrict { index: Some(0) }));
        assert_eq!(parse("s 5"), Command::Dispatch(Action::SwitchDistrict { index: Some(4) }));
        assert_eq!(parse("r"), Command::Reset);
        assert_eq!(parse("p"), Command::Print);
        assert_eq!(parse("q"), Command::Quit);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("").unwrap(), None);
    }

    #[test]
    fn rejects_malformed_commands() {
        let err = parse_command("s 0").unwrap_err();
        assert_eq!(err.to_string(), "districts are numbered from 1");

        let err = parse_command("t 1 x").unwrap_err();
        assert_eq!(err.to_string(), "\"x\" is not a number");
        assert!(parse_command("t -1 0").is_err());

        for line in ["t 1", "t 1 2 3", "s 1 2", "p 1", "r 0", "x", "toggle 1 1"] {
            let err = parse_command(line).unwrap_err();
            assert!(err.to_string().starts_with("unrecognised command"), "{line}: {err}");
        }
    }

    #[test]
    fn reset_restores_a_fresh_game() {
        let catalog = Catalog::builtin().unwrap();
        let puzzle = catalog.get(0).unwrap();
        let mut game = puzzle.new_game().unwrap();
        let fresh = game.snapshot();

        assert_eq!(step(&parse("t 0 0"), puzzle, &mut game).unwrap(), None);
        assert_eq!(step(&parse("s 2"), puzzle, &mut game).unwrap(), None);
        assert!(matches!(
            step(&parse("t 0 0"), puzzle, &mut game).unwrap(),
            Some(Rejection::OwnedByOtherDistrict { address: Location(0, 0), owner }) if owner.index() == 0
        ));
        assert_ne!(game.snapshot(), fresh);

        assert_eq!(step(&Command::Reset, puzzle, &mut game).unwrap(), None);
        assert_eq!(game.snapshot(), fresh);
        assert_eq!(game.current_district_id().index(), 0);
    }

    #[test]
    fn print_and_quit_leave_the_game_alone() {
        let catalog = Catalog::builtin().unwrap();
        let puzzle = catalog.get(1).unwrap();
        let mut game = puzzle.new_game().unwrap();
        step(&parse("t 1 1"), puzzle, &mut game).unwrap();
        let before = game.snapshot();

        assert_eq!(step(&Command::Print, puzzle, &mut game).unwrap(), None);
        assert_eq!(step(&Command::Quit, puzzle, &mut game).unwrap(), None);
        assert_eq!(game.snapshot(), before);
    }
}
