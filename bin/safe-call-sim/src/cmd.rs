use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use crate::{run_scenario, LogArgs, Result, Scenario};

/// Main command enumeration for the safe-call-sim CLI tool
#[derive(Parser, Debug)]
#[command(infer_subcommands = true, version)]
pub enum MainCmd {
    /// Run a scenario file
    Run(RunCmd),
}

impl MainCmd {
    /// Execute the main command
    pub fn run(&self) -> Result<()> {
        match self {
            Self::Run(cmd) => cmd.run(),
        }
    }
}

/// Run a scenario file against an in-memory host
#[derive(Parser, Debug)]
pub struct RunCmd {
    /// Scenario file (JSON)
    #[arg(long = "scenario", value_name = "FILE")]
    pub scenario: PathBuf,

    /// Override the maximum batch size of the scenario
    #[arg(long = "max-batch-size")]
    pub max_batch_size: Option<usize>,

    /// Write the report to this file instead of stdout
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Logging configuration
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl RunCmd {
    /// Loads the scenario, applying command line overrides.
    pub fn load_scenario(&self) -> Result<Scenario> {
        let mut scenario = Scenario::load(&self.scenario)?;
        if let Some(max_batch_size) = self.max_batch_size {
            scenario.config.max_batch_size = max_batch_size;
        }
        Ok(scenario)
    }

    /// Execute the run command
    pub fn run(&self) -> Result<()> {
        self.log_args.init()?;

        let scenario = self.load_scenario()?;
        info!(
            file = %self.scenario.display(),
            operations = scenario.operations.len(),
            max_batch_size = scenario.config.max_batch_size,
            "Running scenario"
        );

        let report = run_scenario(&scenario);
        if report.failures() > 0 {
            warn!(failures = report.failures(), "Some operations failed");
        }

        let json = serde_json::to_string_pretty(&report)?;
        match &self.output {
            Some(path) => std::fs::write(path, json)?,
            None => println!("{json}"),
        }
        Ok(())
    }
}
