//! Command-line transport over `roster_core`.
//!
//! Startup opens one `RosterStore` for the configured database; the store
//! (and its connection) is dropped when `main` returns.

mod args;

use anyhow::Context;
use args::{AddressArgs, Cli, Command, StudentArgs};
use clap::Parser;
use log::info;
use roster_core::{
    core_version, init_logging, NewAddress, NewStudent, ReadOptions, RemoveOptions, RosterConfig,
    RosterError, RosterStore,
};
use serde_json::{json, Value};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let config = RosterConfig::from_env()
        .with_db_path(cli.db)
        .with_log_level(cli.log_level)
        .with_log_dir(cli.log_dir);

    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir).context("logging setup failed")?;
    }

    let store = RosterStore::open(&config.db_path)
        .with_context(|| format!("cannot open roster at {}", config.db_path.display()))?;
    info!(
        "event=cli_start module=cli status=ok version={} db_path={}",
        core_version(),
        config.db_path.display()
    );

    let output = dispatch(&store, cli.command)?;
    Ok(serde_json::to_string_pretty(&output)?)
}

fn dispatch(store: &RosterStore, command: Command) -> anyhow::Result<Value> {
    let output = match command {
        Command::List { expand_address } => {
            serde_json::to_value(store.list(ReadOptions { expand_address })?)?
        }
        Command::Get { id, expand_address } => {
            serde_json::to_value(store.get(id, ReadOptions { expand_address })?)?
        }
        Command::Create { student, address } => {
            let student = to_new_student(student);
            let created = match to_new_address(address) {
                Some(address) => store.create_with_address(&student, &address)?,
                None => store.create_without_address(&student)?,
            };
            serde_json::to_value(created)?
        }
        Command::Remove { id, remove_address } => {
            let removed = store.remove(
                id,
                RemoveOptions {
                    remove_address_if_orphaned: remove_address,
                },
            )?;
            json!({ "removed": removed })
        }
        Command::Update { id, student } => {
            serde_json::to_value(store.update(id, &to_new_student(student))?)?
        }
    };
    Ok(output)
}

fn to_new_student(args: StudentArgs) -> NewStudent {
    NewStudent::new(args.first_name, args.last_name, args.age)
}

fn to_new_address(args: AddressArgs) -> Option<NewAddress> {
    match (args.city, args.street, args.street_number) {
        (Some(city), Some(street), Some(number)) => Some(NewAddress::new(city, street, number)),
        _ => None,
    }
}

fn exit_code_for(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<RosterError>() {
        Some(RosterError::Validation(_)) => 2,
        Some(RosterError::NotFound(_)) => 3,
        Some(RosterError::StoreUnavailable(_)) => 4,
        _ => 1,
    }
}
