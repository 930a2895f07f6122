//! Shape text from the command line or stdin and print the glyph stream.
//!
//! Usage: cargo run --example shape_text -- [--config engine.json] [TEXT...]
//!
//! Set RUST_LOG=debug to see table loading and per-line details.

use anyhow::{Context, Result};
use arabic_glyphs::Engine;
use std::io::{self, BufRead};

fn main() -> Result<()> {
    env_logger::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let engine = match args.iter().position(|a| a == "--config") {
        Some(i) => {
            let path = args
                .get(i + 1)
                .cloned()
                .context("--config needs a path")?;
            args.drain(i..=i + 1);
            Engine::from_config_path(&path)
                .with_context(|| format!("loading engine config {}", path))?
        }
        None => Engine::new().context("loading builtin shaping table")?,
    };

    if !args.is_empty() {
        for line in engine.shape_paragraph(&args.join(" "))? {
            println!("{}", line);
        }
        return Ok(());
    }

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let shaped = engine
            .shape_to_glyphs(&line)
            .with_context(|| format!("shaping {:?}", line))?;
        println!("{}", shaped);
    }
    Ok(())
}
