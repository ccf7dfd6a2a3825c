use std::env;
use std::fs;
use std::path::Path;

use roboadvisor_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    render(&config, config_file_path.as_deref())
}

pub fn render(config: &AppConfig, config_file_path: Option<&Path>) -> String {
    let config_file_doc = load_config_file_doc(config_file_path);
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path)
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["ROBOADVISOR_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["ROBOADVISOR_SERVER_PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["ROBOADVISOR_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));
    lines.push(render_line(
        "dialog.intent_name",
        &config.dialog.intent_name,
        source("dialog.intent_name", &["ROBOADVISOR_DIALOG_INTENT_NAME"]),
    ));
    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["ROBOADVISOR_LOGGING_LEVEL", "ROBOADVISOR_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["ROBOADVISOR_LOGGING_FORMAT", "ROBOADVISOR_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use roboadvisor_core::config::AppConfig;
    use tempfile::TempDir;

    use super::{contains_path, render};

    #[test]
    fn file_values_are_attributed_to_the_file() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("roboadvisor.toml");
        fs::write(&path, "[dialog]\nintent_name = \"portfolioAdvice\"\n").expect("write config");

        let output = render(&AppConfig::default(), Some(&path));

        let intent_line = output
            .lines()
            .find(|line| line.starts_with("- dialog.intent_name"))
            .unwrap_or_default();
        assert!(intent_line.contains("source: file ("), "got: {intent_line}");

        let format_line = output
            .lines()
            .find(|line| line.starts_with("- logging.format"))
            .unwrap_or_default();
        assert!(format_line.ends_with("(source: default)"), "got: {format_line}");
    }

    #[test]
    fn nested_paths_are_resolved() {
        let doc: toml::Value = "[server]\nport = 9000\n".parse().expect("toml");
        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "dialog.intent_name"));
    }
}
