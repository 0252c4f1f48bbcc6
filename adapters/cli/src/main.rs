#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Dungeon Delve experience.
//!
//! Loads an optional TOML configuration, generates a dungeon, and drives the
//! tick loop at the configured cadence, painting dirty frames with ANSI
//! colors. No input binding is attached, so the run plays out on its own:
//! enemies wander, the boss hunts the player, and the outcome is reported
//! when the run ends or the tick budget is exhausted.

use std::{
    env, fs, thread,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use dungeon_delve_core::{config::Config, CellCoord, CellKind, GameStatus};
use dungeon_delve_game::Game;
use dungeon_delve_rendering::{compose_frame, palette, Color, Frame, RenderingBackend};
use dungeon_delve_world::query;

/// Upper bound on unattended ticks before the adapter gives up.
const MAX_TICKS: u32 = 600;

/// Entry point for the Dungeon Delve command-line interface.
fn main() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading configuration from {path}"))?;
            toml::from_str(&text).with_context(|| format!("parsing configuration from {path}"))?
        }
        None => Config::default(),
    };

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default();
    let mut game = Game::new(&config, seed).context("dungeon generation failed")?;

    println!("{}", query::welcome_banner(game.world()));

    let mut backend = AnsiBackend;
    backend.present(&compose_frame(game.world()))?;

    let mut ticks = 0;
    while !game.status().is_terminal() && ticks < MAX_TICKS {
        thread::sleep(config.tick_interval());
        let _ = game.tick();
        ticks += 1;

        let frame = compose_frame(game.world());
        if frame.is_dirty() {
            backend.present(&frame)?;
        }
    }

    match game.status() {
        GameStatus::Won => println!("The dungeon is cleared."),
        GameStatus::Lost => println!("The player has fallen."),
        GameStatus::Active => println!(
            "Still going after {} ticks; stopping.",
            query::tick(game.world())
        ),
    }
    Ok(())
}

/// Terminal backend painting frames with 24-bit ANSI colors.
struct AnsiBackend;

impl RenderingBackend for AnsiBackend {
    fn present(&mut self, frame: &Frame) -> Result<()> {
        let mut out = String::new();
        out.push_str("\x1b[2J\x1b[H");
        for row in 0..frame.rows {
            for column in 0..frame.columns {
                let tile = frame
                    .tile(CellCoord::new(column, row))
                    .context("frame tile out of bounds")?;
                let attacking = tile.unit.is_some_and(|unit| unit.attacking);
                if attacking {
                    out.push_str("\x1b[7m");
                }
                out.push_str(&foreground(palette(tile.kind)));
                out.push(glyph(tile.kind));
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        print!("{out}");
        Ok(())
    }
}

fn glyph(kind: CellKind) -> char {
    match kind {
        CellKind::Wall => '#',
        CellKind::Floor => ' ',
        CellKind::Player => '@',
        CellKind::Enemy => 'e',
        CellKind::Boss => 'B',
        CellKind::Sword => '/',
        CellKind::Potion => '!',
    }
}

fn foreground(color: Color) -> String {
    let red = (color.red * 255.0) as u8;
    let green = (color.green * 255.0) as u8;
    let blue = (color.blue * 255.0) as u8;
    format!("\x1b[38;2;{red};{green};{blue}m")
}
