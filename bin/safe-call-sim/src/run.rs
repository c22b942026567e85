use alloy_primitives::{Bytes, U256};
use mega_safe_call::{
    test_utils::MemoryHost, Diagnostics, FunctionCaller, LogCollector, SafeCallError,
    SafeCallEvent, TracingDiagnostics, ValueTransferCoordinator,
};
use tracing::{debug, info, warn};

use crate::{ErrorReport, Operation, OperationReport, Report, Scenario};

/// Records events for the report and mirrors them to `tracing`.
#[derive(Debug, Default)]
struct EventSink {
    events: Vec<SafeCallEvent>,
}

impl Diagnostics for EventSink {
    fn emit(&mut self, event: SafeCallEvent) {
        TracingDiagnostics.emit(event.clone());
        self.events.push(event);
    }
}

/// What a committed operation produced.
#[derive(Debug)]
enum Completed {
    Sent,
    Batch(U256),
    Called(Bytes),
}

/// Runs every operation of `scenario` in order against a fresh host.
///
/// Each operation is atomic on its own. A failed operation is reported and the run continues
/// with the state left by the operations before it.
pub fn run_scenario(scenario: &Scenario) -> Report {
    let mut host = scenario.build_host();
    let mut operations = Vec::with_capacity(scenario.operations.len());

    for (index, operation) in scenario.operations.iter().enumerate() {
        info!(index, op = operation.name(), "Running operation");
        let mut sink = EventSink::default();
        let result = execute(scenario, &mut host, &mut sink, operation);

        let mut report = OperationReport {
            op: operation.name(),
            ok: result.is_ok(),
            output: None,
            total_amount: None,
            error: None,
            events: Vec::new(),
            logs: Vec::new(),
        };
        match result {
            Ok(Completed::Sent) => {}
            Ok(Completed::Batch(total)) => report.total_amount = Some(total),
            Ok(Completed::Called(output)) => report.output = Some(output),
            Err(error) => {
                warn!(index, op = operation.name(), %error, "Operation failed");
                report.error = Some(ErrorReport::from(&error));
            }
        }

        let mut logs = LogCollector::new(scenario.sender);
        for event in &sink.events {
            logs.emit(event.clone());
        }
        report.logs = logs.into_logs();
        report.events = sink.events;
        operations.push(report);
    }

    let balances = scenario
        .addresses()
        .into_iter()
        .map(|address| (address, host.balance(address)))
        .collect();
    Report { sender: scenario.sender, operations, balances }
}

fn execute(
    scenario: &Scenario,
    host: &mut MemoryHost,
    sink: &mut EventSink,
    operation: &Operation,
) -> Result<Completed, SafeCallError> {
    let sender = scenario.sender;
    match operation {
        Operation::SendValue { recipient, amount } => {
            ValueTransferCoordinator::new(sender, scenario.config, sink)
                .send_value(host, *recipient, *amount)?;
            Ok(Completed::Sent)
        }
        Operation::SendBatch { recipients, amounts } => {
            let total = ValueTransferCoordinator::new(sender, scenario.config, sink)
                .send_batch(host, recipients, amounts)?;
            Ok(Completed::Batch(total))
        }
        Operation::SendBatchUniform { recipients, amount } => {
            let total = ValueTransferCoordinator::new(sender, scenario.config, sink)
                .send_batch_uniform(host, recipients, *amount)?;
            Ok(Completed::Batch(total))
        }
        Operation::FunctionCall { target, data, value } => {
            let mut caller = FunctionCaller::new(sender, sink);
            let output = if value.is_zero() {
                caller.function_call(host, *target, data.clone())?
            } else {
                caller.function_call_with_value(host, *target, data.clone(), *value)?
            };
            debug!(output_len = output.len(), "Call returned");
            Ok(Completed::Called(output))
        }
        Operation::StaticCall { target, data } => {
            let output =
                FunctionCaller::new(sender, sink).function_static_call(host, *target, data.clone())?;
            Ok(Completed::Called(output))
        }
    }
}
