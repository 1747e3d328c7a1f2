// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use the_assembly::config::{build_model, load_and_validate_config};
use the_assembly::graph::path;
use tracing_subscriber::EnvFilter;

/// Parsed command line
struct Args {
    model_file: String,
    sets: Vec<(String, Value)>,
    gets: Vec<String>,
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {} <model.yaml> [--set path=json]... [--get path]...\n\
         Example: {} configs/chain.yaml --set p.x=5 --get result",
        program, program
    )
}

fn parse_args(args: &[String]) -> Result<Args> {
    let program = args.first().map(String::as_str).unwrap_or("the-assembly");
    let mut rest = args.iter().skip(1);
    let mut model_file = None;
    let mut sets = Vec::new();
    let mut gets = Vec::new();

    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--set" => {
                let Some(assignment) = rest.next() else {
                    bail!("--set needs a path=value argument\n{}", usage(program));
                };
                let Some((path, raw)) = assignment.split_once('=') else {
                    bail!("--set expects path=value, got '{}'", assignment);
                };
                // bare words are taken as strings
                let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::from(raw));
                sets.push((path.to_string(), value));
            }
            "--get" => {
                let Some(path) = rest.next() else {
                    bail!("--get needs a path argument\n{}", usage(program));
                };
                gets.push(path.clone());
            }
            other if model_file.is_none() && !other.starts_with("--") => {
                model_file = Some(other.to_string());
            }
            other => bail!("unexpected argument '{}'\n{}", other, usage(program)),
        }
    }

    let Some(model_file) = model_file else {
        bail!("{}", usage(program));
    };
    Ok(Args {
        model_file,
        sets,
        gets,
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let args = parse_args(&args)?;

    let config = load_and_validate_config(&args.model_file)
        .with_context(|| format!("loading {}", args.model_file))?;
    let mut model = build_model(&config).with_context(|| format!("building {}", config.name))?;
    let root = model.root();

    for (path, value) in &args.sets {
        model
            .set(root, path, value.clone())
            .with_context(|| format!("setting {}", path))?;
    }

    let start = Instant::now();
    let executed = model.run(root).context("running the model")?;
    println!(
        "Model '{}': {} component(s) executed in {:?}",
        config.name,
        executed,
        start.elapsed()
    );

    // without --get, report every boundary variable fed by a connection
    let gets = if args.gets.is_empty() {
        model
            .list_connections(root, true)?
            .into_iter()
            .map(|(_, dst)| dst)
            .filter(|dst| path::owner(dst).is_none())
            .collect()
    } else {
        args.gets
    };

    for path in gets {
        let value = model.get(root, &path)?;
        println!("  {} = {}", path, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_sets_and_gets() {
        let parsed = parse_args(&args(&[
            "the-assembly",
            "model.yaml",
            "--set",
            "p.x=2.5",
            "--set",
            "label.left=hello",
            "--get",
            "result",
        ]))
        .unwrap();
        assert_eq!(parsed.model_file, "model.yaml");
        assert_eq!(
            parsed.sets,
            vec![
                ("p.x".to_string(), json!(2.5)),
                ("label.left".to_string(), json!("hello"))
            ]
        );
        assert_eq!(parsed.gets, vec!["result".to_string()]);
    }

    #[test]
    fn model_file_is_required() {
        assert!(parse_args(&args(&["the-assembly", "--get", "x"])).is_err());
        assert!(parse_args(&args(&["the-assembly", "m.yaml", "--set", "novalue"])).is_err());
    }
}
