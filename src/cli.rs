use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "outfit-explorer")]
#[command(version, about = "Browse, filter and compare game outfit catalogs")]
pub struct Cli {
    /// Outfit JSON file to open at start-up
    pub data: Option<PathBuf>,

    /// JSON config file (ignore patterns, default columns)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_and_config() {
        let cli = Cli::try_parse_from(["outfit-explorer", "outfits.json", "-c", "explorer.json"]).unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("outfits.json")));
        assert_eq!(cli.config, Some(PathBuf::from("explorer.json")));
    }

    #[test]
    fn everything_is_optional() {
        let cli = Cli::try_parse_from(["outfit-explorer"]).unwrap();
        assert!(cli.data.is_none() && cli.config.is_none());
    }
}
