//! Headless greedy simulator.
//!
//! Plays `--games` sessions, always blasting the largest group (or a power tile when its
//! column is bigger) and shuffling when stuck. Prints one JSON summary per game on stdout.
//!
//! Usage: `tile-blast-sim [--seed N] [--games N] [--config path]`

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use log::LevelFilter;
use serde::Serialize;

use tile_blast::core::{largest_group, GameConfig, NullPresenter, Resolution, Session};
use tile_blast::types::FinishReason;
use tile_blast::{init_logger, load_config, LogSink};

/// Command-line arguments for the headless simulator.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct SimArgs {
    /// Seed of the first game; later games use consecutive seeds.
    #[arg(long, value_name = "SEED")]
    seed: Option<u32>,
    /// Number of games to play.
    #[arg(
        long,
        value_name = "COUNT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    games: u32,
    /// JSON config file layered under the `TILE_BLAST_*` environment.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct GameSummary {
    game: u32,
    seed: u32,
    reason: Option<FinishReason>,
    score: u32,
    win_score: u32,
    turns_used: u32,
    shuffles_used: u32,
    power_activations: u32,
}

/// Best power tile: the one whose column holds the most tiles
fn best_power_tile(session: &Session) -> Option<(usize, usize, usize)> {
    let grid = session.grid();
    grid.iter()
        .filter(|(_, _, t)| t.is_power())
        .map(|(col, row, _)| (col, row, grid.column_len(col)))
        .max_by_key(|&(_, _, len)| len)
}

fn play(game: u32, config: GameConfig) -> Result<GameSummary> {
    let seed = config.seed;
    let min_blast = config.min_blast_group as usize;
    let mut session = Session::new(config)?;
    session.start(&mut NullPresenter);

    let mut power_activations = 0;
    while session.is_playing() {
        let mut scratch = session.grid().clone();
        let group = largest_group(&mut scratch).filter(|&(_, _, size)| size >= min_blast);
        let power = best_power_tile(&session);

        let target = match (group, power) {
            (Some(g), Some(p)) if p.2 > g.2 => Some((p.0, p.1, true)),
            (Some(g), _) => Some((g.0, g.1, false)),
            (None, Some(p)) => Some((p.0, p.1, true)),
            (None, None) => None,
        };

        match target {
            Some((col, row, is_power)) => {
                if let Resolution::Cleared { .. } = session.select_at(col, row, &mut NullPresenter) {
                    power_activations += u32::from(is_power);
                } else {
                    bail!("game {game}: selection at ({col}, {row}) did not clear");
                }
            }
            None => {
                if !session.request_shuffle(&mut NullPresenter) {
                    log::warn!("game {game}: stuck with no shuffles and no finish");
                    break;
                }
            }
        }
    }

    let config = session.config();
    Ok(GameSummary {
        game,
        seed,
        reason: session.phase().finish_reason(),
        score: session.score(),
        win_score: config.win_score,
        turns_used: config.turn_budget - session.turns_remaining(),
        shuffles_used: config.shuffle_budget - session.shuffles_remaining(),
        power_activations,
    })
}

fn main() -> Result<()> {
    let args = SimArgs::parse();
    init_logger(LogSink::Stderr, LevelFilter::Warn)?;
    let base = load_config(args.config.as_deref())?;
    let first_seed = args.seed.unwrap_or(base.seed);

    for game in 0..args.games {
        let config = GameConfig {
            seed: first_seed.wrapping_add(game),
            ..base.clone()
        };
        let summary = play(game, config)?;
        println!("{}", serde_json::to_string(&summary)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        SimArgs::command().debug_assert();
    }

    #[test]
    fn test_args_accept_equals_syntax() {
        let args = SimArgs::try_parse_from(["tile-blast-sim", "--games=3", "--seed", "7"]).unwrap();
        assert_eq!(args.games, 3);
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_args_defaults_and_range() {
        let args = SimArgs::try_parse_from(["tile-blast-sim"]).unwrap();
        assert_eq!(args.games, 1);
        assert!(SimArgs::try_parse_from(["tile-blast-sim", "--games", "0"]).is_err());
        assert!(SimArgs::try_parse_from(["tile-blast-sim", "--bogus"]).is_err());
    }
}
