// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cw: terminal client for the claimwatch data service

mod color;
mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};

use commands::{claims, login, tile_cost, watch};
use exit_error::ExitError;
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "cw",
    version = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH")),
    about = "Live claim data from the BitCraft game database",
    styles = color::styles(),
)]
struct Cli {
    /// Output format
    #[arg(long, short = 'o', value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Connect and stream claim updates until interrupted
    Watch(watch::WatchArgs),
    /// Request or redeem an email access code
    Login(login::LoginArgs),
    /// List claims saved from the last session
    Claims,
    /// Supplies per hour consumed by a claim of the given size
    TileCost(tile_cost::TileCostArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let code = match e.downcast_ref::<ExitError>() {
            Some(exit) => exit.code,
            None => 1,
        };
        eprintln!("error: {e:#}");
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Watch(args) => watch::handle(args, cli.output).await,
        Command::Login(args) => login::handle(args, cli.output).await,
        Command::Claims => claims::handle(cli.output),
        Command::TileCost(args) => tile_cost::handle(args, cli.output),
    }
}
