use super::{apply_config, load_config_file, types::ConfigFile};
use clap::{CommandFactory, FromArgMatches};
use std::time::Duration;
use tempfile::tempdir;

use crate::args::{HttpMethod, OutputFormat, RunArgs};

fn parse_with_matches(argv: &[&str]) -> Result<(RunArgs, clap::ArgMatches), String> {
    let matches = RunArgs::command()
        .try_get_matches_from(argv)
        .map_err(|err| format!("parse failed: {}", err))?;
    let args = RunArgs::from_arg_matches(&matches).map_err(|err| format!("{}", err))?;
    Ok((args, matches))
}

#[test]
fn parse_toml_config() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("volley.toml");
    let content = r#"
url = "http://localhost:3000/hello"
method = "post"
data = "ping"
rps = 40
duration = 15
burst = true
timeout = "2s"
output_format = "json"
"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    if config.url.as_deref() != Some("http://localhost:3000/hello") {
        return Err("Unexpected url".to_owned());
    }
    if config.method != Some(HttpMethod::Post) {
        return Err("Unexpected method".to_owned());
    }
    if config.rps != Some(40) || config.duration != Some(15) {
        return Err("Unexpected rps/duration".to_owned());
    }
    if config.burst != Some(true) {
        return Err("Expected burst".to_owned());
    }
    let timeout = config
        .timeout
        .as_ref()
        .ok_or_else(|| "Expected timeout".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if timeout != Duration::from_secs(2) {
        return Err(format!("Unexpected timeout: {:?}", timeout));
    }
    if config.output_format != Some(OutputFormat::Json) {
        return Err("Unexpected output format".to_owned());
    }
    Ok(())
}

#[test]
fn parse_json_config_numeric_timeout() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("volley.json");
    let content = r#"{ "url": "http://localhost:3000", "rps": 3, "timeout": 5 }"#;
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;

    let config = load_config_file(&path).map_err(|err| err.to_string())?;
    let timeout = config
        .timeout
        .as_ref()
        .ok_or_else(|| "Expected timeout".to_owned())?
        .to_duration()
        .map_err(|err| err.to_string())?;
    if timeout != Duration::from_secs(5) {
        return Err(format!("Unexpected timeout: {:?}", timeout));
    }
    Ok(())
}

#[test]
fn unknown_extension_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("volley.yaml");
    std::fs::write(&path, "url: x").map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unsupported extension error".to_owned());
    }
    Ok(())
}

#[test]
fn unknown_field_is_rejected() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("volley.toml");
    std::fs::write(&path, "url = \"http://x\"\nconcurrency = 4\n")
        .map_err(|err| format!("write failed: {}", err))?;
    if load_config_file(&path).is_ok() {
        return Err("Expected unknown field error".to_owned());
    }
    Ok(())
}

#[test]
fn cli_values_override_config() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["volley", "-r", "7", "-u", "http://cli"])?;
    let config = ConfigFile {
        url: Some("http://config".to_owned()),
        rps: Some(99),
        duration: Some(3),
        burst: Some(true),
        ..ConfigFile::default()
    };

    apply_config(&mut args, &matches, &config).map_err(|err| err.to_string())?;

    if args.url.as_deref() != Some("http://cli") {
        return Err("CLI url should win".to_owned());
    }
    if args.rps.get() != 7 {
        return Err("CLI rps should win".to_owned());
    }
    if args.duration != 3 {
        return Err("Config duration should apply".to_owned());
    }
    if !args.burst {
        return Err("Config burst should apply".to_owned());
    }
    Ok(())
}

#[test]
fn config_rps_must_be_positive() -> Result<(), String> {
    let (mut args, matches) = parse_with_matches(&["volley"])?;
    let config = ConfigFile {
        rps: Some(0),
        ..ConfigFile::default()
    };
    if apply_config(&mut args, &matches, &config).is_ok() {
        return Err("Expected rps 0 to be rejected".to_owned());
    }
    Ok(())
}
