use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use roboadvisor_core::config::{AppConfig, LoadOptions};
use roboadvisor_core::{LexRequest, TurnDispatcher};

use crate::commands::{escape_json, CommandResult};

pub fn run(event: &Path) -> CommandResult {
    match read_event(event) {
        Ok(raw) => run_with_input(&raw),
        Err(error) => CommandResult::failure("invoke", "event_read", format!("{error:#}"), 2),
    }
}

/// Dispatches one serialized dialog event and prints the platform response on success.
pub fn run_with_input(raw: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("invoke", "config_validation", error.to_string(), 2)
        }
    };

    let request: LexRequest = match serde_json::from_str(raw) {
        Ok(request) => request,
        Err(error) => {
            return CommandResult::failure(
                "invoke",
                "event_parse",
                format!("dialog event is not a valid request: {error}"),
                2,
            )
        }
    };

    let dispatcher = TurnDispatcher::from_config(&config.dialog);
    match dispatcher.dispatch(request) {
        Ok(response) => {
            let output = serde_json::to_string(&response).unwrap_or_else(|error| {
                format!(
                    "{{\"command\":\"invoke\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
                    escape_json(&error.to_string())
                )
            });
            CommandResult { exit_code: 0, output }
        }
        Err(error) => CommandResult::failure("invoke", "dispatch", error.to_string(), 1),
    }
}

fn read_event(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw).context("could not read dialog event from stdin")?;
        return Ok(raw);
    }

    fs::read_to_string(path)
        .with_context(|| format!("could not read dialog event file `{}`", path.display()))
}
