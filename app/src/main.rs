//! Deskpet launcher
//!
//! Starts the pet overlay. Image paths given on the command line are loaded
//! right away, exactly as if they had been picked from the menu.
//!
//! # Usage
//!
//! ```text
//! deskpet [--speed <ms>] [--opacity <percent>] [FILES...]
//! ```

use anyhow::Result;
use deskpet::app::{self, LaunchOptions};
use std::env;
use std::path::PathBuf;

const USAGE: &str = "\
Usage: deskpet [OPTIONS] [FILES...]

Shows a frameless, always-on-top desktop pet. Right-click the pet for the menu.

Options:
  --speed <ms>         Milliseconds per frame (10-10000)
  --opacity <percent>  Window opacity (0-100)
  -h, --help           Print this help

FILES are .png frames (played in name order) or a single .gif animation.";

/// Parse launch options from command line args
///
/// Unknown flags are ignored with a warning; anything that is not a flag is
/// treated as an image path.
fn parse_launch_options(args: &[String]) -> LaunchOptions {
    let mut options = LaunchOptions::default();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => options.show_help = true,
            "--speed" => match iter.next().map(|v| v.parse::<u32>()) {
                Some(Ok(ms)) => options.speed_ms = Some(ms),
                _ => tracing::warn!("--speed expects milliseconds per frame"),
            },
            "--opacity" => match iter.next().map(|v| v.parse::<u8>()) {
                Some(Ok(percent)) => options.opacity = Some(percent.min(100)),
                _ => tracing::warn!("--opacity expects a percentage"),
            },
            flag if flag.starts_with('-') => {
                tracing::warn!("Ignoring unknown option: {}", flag);
            }
            path => options.files.push(PathBuf::from(path)),
        }
    }

    options
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_launch_options(&args);

    if options.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    app::run(options)?;
    Ok(())
}
