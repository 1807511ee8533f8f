use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "labconsole",
    version,
    about = "TUI for browsing laboratory master data"
)]
pub struct Args {
    /// Screen to open on start (e.g., "departments", "users")
    #[arg(short, long)]
    pub screen: Option<String>,

    /// JSON dataset to browse instead of the bundled sample
    #[arg(short, long)]
    pub data: Option<PathBuf>,

    /// Rows per page, overriding the configured default
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_overrides() {
        let args = Args::try_parse_from([
            "labconsole",
            "--screen",
            "users",
            "--page-size",
            "25",
        ])
        .unwrap();
        assert_eq!(args.screen.as_deref(), Some("users"));
        assert_eq!(args.page_size, Some(25));
        assert!(args.data.is_none());
    }

    #[test]
    fn test_rejects_zero_page_size() {
        assert!(Args::try_parse_from(["labconsole", "--page-size", "0"]).is_err());
    }
}
