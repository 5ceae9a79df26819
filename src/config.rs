//! Command-line configuration.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::Viewport;
use crate::renderer::RenderMode;

/// Fallback when the terminal size cannot be queried (pipes, CI).
pub const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Render a keyed tree, activate it, and watch the values propagate to the root
#[derive(Parser, Debug)]
#[command(name = "spark-tree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Seed JSON file (default: built-in seed)
    #[arg(short, long, value_name = "FILE")]
    pub seed: Option<PathBuf>,

    /// Render width in columns (default: terminal width)
    #[arg(short = 'W', long)]
    pub width: Option<u16>,

    /// Render height in rows (default: terminal height)
    #[arg(short = 'H', long)]
    pub height: Option<u16>,

    /// Use the alternate screen and wait for q/Esc/Ctrl-C
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Print the final top-level entries as JSON
    #[arg(short, long)]
    pub dump: bool,

    /// Verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved run settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub seed: Option<PathBuf>,
    pub width: u16,
    pub height: u16,
    pub mode: RenderMode,
    pub dump: bool,
    pub verbose: u8,
}

impl Config {
    /// Resolve CLI flags against the current terminal size.
    pub fn from_cli(cli: Cli) -> Self {
        let terminal = crossterm::terminal::size().unwrap_or(DEFAULT_SIZE);
        Self::resolve(cli, terminal)
    }

    fn resolve(cli: Cli, (term_width, term_height): (u16, u16)) -> Self {
        Self {
            seed: cli.seed,
            width: cli.width.unwrap_or(term_width).max(1),
            height: cli.height.unwrap_or(term_height).max(1),
            mode: if cli.fullscreen {
                RenderMode::Fullscreen
            } else {
                RenderMode::Inline
            },
            dump: cli.dump,
            verbose: cli.verbose,
        }
    }

    /// Inline output grows with the tree; fullscreen is clamped to the screen.
    pub fn viewport(&self) -> Viewport {
        match self.mode {
            RenderMode::Inline => Viewport::inline(self.width),
            RenderMode::Fullscreen => Viewport::fixed(self.width, self.height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_follow_terminal() {
        let cli = Cli::parse_from(["spark-tree"]);
        let config = Config::resolve(cli, (120, 40));

        assert_eq!(config.width, 120);
        assert_eq!(config.height, 40);
        assert_eq!(config.mode, RenderMode::Inline);
        assert_eq!(config.viewport(), Viewport::inline(120));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_flags_override() {
        let cli = Cli::parse_from([
            "spark-tree",
            "--seed",
            "tree.json",
            "-W",
            "50",
            "-H",
            "20",
            "--fullscreen",
            "--dump",
            "-vv",
        ]);
        let config = Config::resolve(cli, DEFAULT_SIZE);

        assert_eq!(config.seed, Some(PathBuf::from("tree.json")));
        assert_eq!(config.viewport(), Viewport::fixed(50, 20));
        assert!(config.dump);
        assert_eq!(config.verbose, 2);
    }
}
