use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ideomap_core::{Axis, ClassificationMode, Point3};

#[derive(Parser)]
#[command(name = "ideomap")]
#[command(about = "Classify positions in a three-axis ideology space")]
#[command(version)]
pub struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.ideomap)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Category definition file (overrides config; default: builtin set)
    #[arg(short, long, global = true)]
    pub definitions: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Coordinates of a point
#[derive(Args, Clone, Copy, Debug)]
pub struct PointArgs {
    /// Economic score (-: collective, +: laissez-faire)
    #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
    pub economic: f64,

    /// Culture score (-: progressive, +: traditional)
    #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
    pub culture: f64,

    /// Authority score (-: decentralized, +: centralized)
    #[arg(allow_negative_numbers = true, value_parser = parse_finite)]
    pub authority: f64,
}

fn parse_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("coordinate must be a finite number, got '{}'", s))
    }
}

impl From<PointArgs> for Point3 {
    fn from(args: PointArgs) -> Self {
        Point3::new(args.economic, args.culture, args.authority)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List categories in declaration order
    List {
        /// Include descriptions, ranges and examples
        #[arg(short, long)]
        long: bool,
    },

    /// Show a single category
    Show {
        /// Category key
        name: String,
    },

    /// Classify a point
    Classify {
        #[command(flatten)]
        point: PointArgs,

        /// Classification mode (first-match, nearest; default: from config)
        #[arg(short, long)]
        mode: Option<ClassificationMode>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rank all categories by how well they match a point
    Rank {
        #[command(flatten)]
        point: PointArgs,

        /// Maximum results to show
        #[arg(short, long, default_value = "5")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-axis distribution of the category set
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Center point of every category
    Centers {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Project every category box onto two axes
    Project {
        /// Horizontal axis (economic, culture, authority)
        horizontal: Axis,

        /// Vertical axis (economic, culture, authority)
        vertical: Axis,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Vertices and edges of a category box
    #[command(name = "box")]
    Cuboid {
        /// Category key
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a survey submission and print its id and class label
    Submit {
        /// Income tier (low, middle, high)
        #[arg(long, default_value = "")]
        income: String,

        /// Respondent IP address
        #[arg(long, default_value = "")]
        ip: String,

        /// Respondent province
        #[arg(long, default_value = "")]
        province: String,

        /// Respondent name
        #[arg(long, default_value = "")]
        name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., classify.mode)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., classify.mode)
        key: String,

        /// Value to set (e.g., "nearest")
        value: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Create config file with default template
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_classify_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["ideomap", "classify", "-5", "0", "-2.5"]).unwrap();
        match cli.command {
            Some(Commands::Classify { point, mode, json }) => {
                assert_eq!(Point3::from(point), Point3::new(-5.0, 0.0, -2.5));
                assert!(mode.is_none());
                assert!(!json);
            }
            _ => panic!("expected classify"),
        }
    }

    #[test]
    fn test_classify_mode_and_project_axes() {
        let cli =
            Cli::try_parse_from(["ideomap", "classify", "1", "2", "3", "--mode", "nearest"])
                .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Classify {
                mode: Some(ClassificationMode::Nearest),
                ..
            })
        ));

        let cli = Cli::try_parse_from(["ideomap", "project", "economic", "auth"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Project {
                horizontal: Axis::Economic,
                vertical: Axis::Authority,
                ..
            })
        ));
        assert!(Cli::try_parse_from(["ideomap", "project", "economic", "height"]).is_err());
    }

    #[test]
    fn test_point_rejects_non_finite_coordinates() {
        for bad in ["NaN", "nan", "inf", "-inf", "infinity"] {
            assert!(
                Cli::try_parse_from(["ideomap", "classify", bad, "0", "0"]).is_err(),
                "accepted {}",
                bad
            );
            assert!(Cli::try_parse_from(["ideomap", "rank", "0", "0", bad]).is_err());
        }
        assert!(Cli::try_parse_from(["ideomap", "classify", "1e3", "0", "0"]).is_ok());
    }
}
