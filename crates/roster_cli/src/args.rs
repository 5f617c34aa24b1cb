//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(name = "roster", version, about = "Student roster with shared addresses")]
pub struct Cli {
    /// SQLite database file (or set `ROSTER_DB_PATH`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error (or set `ROSTER_LOG_LEVEL`).
    #[clap(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files (or set `ROSTER_LOG_DIR`).
    #[clap(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List all students in creation order
    List {
        /// Include city/street/street number when the student has an address.
        #[clap(long)]
        expand_address: bool,
    },
    /// Show one student
    Get {
        id: i64,
        #[clap(long)]
        expand_address: bool,
    },
    /// Create a student, optionally with an address
    Create {
        #[clap(flatten)]
        student: StudentArgs,
        #[clap(flatten)]
        address: AddressArgs,
    },
    /// Remove a student
    Remove {
        id: i64,
        /// Also delete the address if no other student uses it.
        #[clap(long)]
        remove_address: bool,
    },
    /// Overwrite a student's name and age
    Update {
        id: i64,
        #[clap(flatten)]
        student: StudentArgs,
    },
}

#[derive(Debug, Args)]
pub struct StudentArgs {
    #[clap(long)]
    pub first_name: String,
    #[clap(long)]
    pub last_name: String,
    #[clap(long, allow_negative_numbers = true)]
    pub age: i64,
}

/// Address flags; all three or none.
#[derive(Debug, Args)]
pub struct AddressArgs {
    #[clap(long, requires_all = ["street", "street_number"])]
    pub city: Option<String>,
    #[clap(long, requires_all = ["city", "street_number"])]
    pub street: Option<String>,
    #[clap(long, requires_all = ["city", "street"], allow_negative_numbers = true)]
    pub street_number: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn create_accepts_full_address() {
        let cli = Cli::try_parse_from([
            "roster",
            "create",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--age",
            "20",
            "--city",
            "Metropolis",
            "--street",
            "Main St",
            "--street-number",
            "5",
        ])
        .unwrap();
        match cli.command {
            Command::Create { address, .. } => {
                assert_eq!(address.city.as_deref(), Some("Metropolis"));
                assert_eq!(address.street_number, Some(5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn create_rejects_partial_address() {
        let result = Cli::try_parse_from([
            "roster",
            "create",
            "--first-name",
            "Jane",
            "--last-name",
            "Doe",
            "--age",
            "20",
            "--city",
            "Metropolis",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_default_to_false() {
        let cli = Cli::try_parse_from(["roster", "remove", "7"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Remove {
                id: 7,
                remove_address: false
            }
        ));
    }
}
