use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};
use std::{env, fs};
use tictactoe::{Error, HumanVsComputerMatch, MatchConfig, Player, Turn};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("reading match config from {path}"))?;
            MatchConfig::from_json_str(&json)
                .with_context(|| format!("parsing match config from {path}"))?
        }
        None => MatchConfig::default(),
    };
    info!(?config, "starting match");
    play_human_computer(&config)
}

fn play_human_computer(config: &MatchConfig) -> Result<()> {
    let mut game_match = HumanVsComputerMatch::from_config(config)?;
    let mut lines = io::stdin().lock().lines();
    println!(
        "You play {}. Enter your move as `row column`, each from 1 to 3.",
        game_match.human().mark()
    );

    while !game_match.is_over() {
        match game_match.turn() {
            Turn::Computer => {
                game_match.computer_move()?;
            }
            Turn::Human => {
                print!("{}", game_match.game().board());
                print!("Your move: ");
                io::stdout().flush()?;
                let Some(line) = lines.next() else {
                    println!("\nGame abandoned.");
                    return Ok(());
                };
                let line = line.context("reading move from stdin")?;
                let Some((row, col)) = parse_move(&line) else {
                    println!("Unknown move {:?}, please try again (e.g. `2 3`).", line.trim());
                    continue;
                };
                match game_match.human_move(row, col) {
                    Ok(status) => debug!(%status, "human move accepted"),
                    Err(err @ Error::OccupiedCell { .. }) => println!("{err}"),
                    Err(err) => return Err(err.into()),
                }
            }
        }
    }

    print!("{}", game_match.game().board());
    match game_match.status().win {
        Some(mark) if mark == game_match.human().mark() => {
            println!("Congratulations! You have won!")
        }
        Some(_) => println!("Really sorry, you have lost."),
        None => println!("The game ended in a draw."),
    }
    Ok(())
}

/// Parses `row column` given 1-based, returning 0-based coordinates.
fn parse_move(line: &str) -> Option<(usize, usize)> {
    let mut numbers = line.split_whitespace().map(|part| part.parse::<usize>().ok());
    let row = numbers.next()??;
    let col = numbers.next()??;
    if numbers.next().is_some() || !(1..=3).contains(&row) || !(1..=3).contains(&col) {
        return None;
    }
    Some((row - 1, col - 1))
}
