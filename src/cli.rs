//! Command-line interface definitions for Funding Radar.
//!
//! This module defines the CLI arguments using the `clap` crate. In the
//! usual deployment nothing is passed on the command line: the sheet id and
//! credentials arrive through the environment and the delay bounds keep
//! their defaults, so the binary runs as a no-argument batch job.

use clap::Parser;

/// Command-line arguments for the Funding Radar pipeline.
///
/// # Examples
///
/// ```sh
/// # Environment-driven batch run
/// SHEET_ID=... GCP_CREDENTIALS='{"token":"..."}' funding_radar
///
/// # Slower pacing against the detail pages
/// funding_radar --min-delay 2 --max-delay 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Spreadsheet id of the tracking sheet
    #[arg(
        long,
        env = "SHEET_ID",
        default_value = "1NBxLY4qD4RpBVDTjExLnkWSZ2gj0-f0uTCkOiFnglec"
    )]
    pub sheet_id: String,

    /// Credentials blob (JSON) carrying the API bearer token; required,
    /// the run aborts without it
    #[arg(long, env = "GCP_CREDENTIALS", hide_env_values = true)]
    pub credentials: String,

    /// Lower bound of the politeness delay between detail fetches, in seconds
    #[arg(long, default_value_t = 1.0)]
    pub min_delay: f64,

    /// Upper bound of the politeness delay between detail fetches, in seconds
    #[arg(long, default_value_t = 3.0)]
    pub max_delay: f64,

    /// Per-request HTTP timeout, in seconds
    #[arg(long, default_value_t = 30)]
    pub http_timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["funding_radar", "--credentials", "{}"]);
        assert_eq!(cli.min_delay, 1.0);
        assert_eq!(cli.max_delay, 3.0);
        assert_eq!(cli.http_timeout, 30);
        assert!(!cli.sheet_id.is_empty());
    }

    #[test]
    fn test_cli_delay_overrides() {
        let cli = Cli::parse_from([
            "funding_radar",
            "--credentials",
            "{}",
            "--min-delay",
            "2.5",
            "--max-delay",
            "6",
        ]);
        assert_eq!(cli.min_delay, 2.5);
        assert_eq!(cli.max_delay, 6.0);
    }
}
