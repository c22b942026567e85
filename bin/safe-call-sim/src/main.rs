//! Scenario runner for safe calls and value transfers.

use clap::Parser;
use safe_call_sim::{MainCmd, SimError};

fn main() -> Result<(), SimError> {
    MainCmd::parse().run().inspect_err(|e| eprintln!("{e}"))
}
