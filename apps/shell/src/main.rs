#![allow(clippy::print_stdout)]

mod handlers;
mod models;

use crate::handlers::{config, demo, secrets};
use crate::models::args::{AppCommands, Cli};

use anyhow::{Context, Result};
use clap::Parser;
use lockbox::Lockbox;
use lockbox::kernel::config::load_settings;
use lockbox_logger::Logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = match cli.command {
        AppCommands::Demo {} => demo::settings(),
        _ => load_settings(cli.config.as_deref()).context("Critical: Configuration is malformed")?,
    };
    let _log = Logger::from_settings(env!("CARGO_PKG_NAME"), &settings.logging)?;

    match cli.command {
        AppCommands::Demo {} => demo::run(settings)?,
        AppCommands::Set { category, value } => {
            secrets::set(&Lockbox::from_settings(settings)?, &category, value)?;
        },
        AppCommands::Get { category } => {
            secrets::get(&Lockbox::from_settings(settings)?, &category)?;
        },
        AppCommands::Generate { length, kind } => {
            secrets::generate(&Lockbox::from_settings(settings)?, length, kind.as_deref())?;
        },
        AppCommands::ShowConfig {} => config::show(&Lockbox::from_settings(settings)?),
    }

    Ok(())
}
