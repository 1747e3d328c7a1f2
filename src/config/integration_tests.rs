// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use std::io::Write;

    use serde_json::json;
    use tempfile::NamedTempFile;

    use crate::config::{build_model, load_and_validate_config, load_config};
    use crate::errors::{ConfigError, ValidationError};

    fn write_model(yaml: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();
        file
    }

    /// Test that the chain model loads and computes end to end
    #[test]
    fn test_chain_yaml_loading_and_run() {
        let config = load_and_validate_config("configs/chain.yaml").unwrap();
        assert_eq!(config.name, "chain");
        assert_eq!(config.body.components.len(), 3);
        assert_eq!(config.body.connections.len(), 4);

        let mut model = build_model(&config).unwrap();
        let root = model.root();
        assert_eq!(model.workflow_order(root).unwrap(), vec!["p", "q", "r"]);

        model.run(root).unwrap();
        // (3 * 2 + 1) * 0.5
        assert_eq!(model.get(root, "result").unwrap(), &json!(3.5));
        assert_eq!(model.get_valids(root, &["result", "offset"]).unwrap(), vec![true, true]);
    }

    /// Test a nested assembly wired through explicit and implicit passthroughs
    #[test]
    fn test_nested_yaml_loading_and_run() {
        let config = load_and_validate_config("configs/nested.yaml").unwrap();
        let mut model = build_model(&config).unwrap();
        let root = model.root();
        let stage = model.find("stage").unwrap();

        // stage.double.y was promoted under a longer name because `y` is taken
        assert_eq!(
            model.passthroughs(stage).unwrap().target("double_y"),
            Some("double.y")
        );

        model.run(root).unwrap();
        assert_eq!(model.get(root, "total").unwrap(), &json!(12.0));
        assert_eq!(model.get(root, "partial").unwrap(), &json!(4.0));
        assert_eq!(model.get(root, "label.text").unwrap(), &json!("total: "));

        // expression links are never pulled
        assert_eq!(model.get_valids(root, &["report"]).unwrap(), vec![false]);
    }

    #[test]
    fn test_rerun_after_set_recomputes_downstream_only() {
        let config = load_and_validate_config("configs/nested.yaml").unwrap();
        let mut model = build_model(&config).unwrap();
        let root = model.root();
        model.run(root).unwrap();

        model.set(root, "source.x", json!(1.0)).unwrap();
        assert_eq!(
            model.get_valids(root, &["total", "partial", "label.text"]).unwrap(),
            vec![false, false, true]
        );

        // source, double and triple run again; label does not
        assert_eq!(model.run(root).unwrap(), 3);
        assert_eq!(model.get(root, "total").unwrap(), &json!(6.0));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = load_config("configs/does-not-exist.yaml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_malformed_yaml_is_a_parse_error() {
        let file = write_model("components: [ { name: p, kind: scale }\n");
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validation_errors_are_accumulated() {
        let file = write_model(
            r#"
components:
  - { name: p, kind: scale }
  - { name: p, kind: frobnicate }
connections:
  - { from: ghost.y, to: p.x }
"#,
        );
        match load_and_validate_config(file.path()) {
            Err(ConfigError::Invalid(errors)) => {
                assert_eq!(errors.len(), 3);
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ValidationError::UnresolvedEndpoint { component, .. } if component == "ghost")));
            }
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_value_fails_the_build() {
        let file = write_model(
            r#"
variables:
  - { name: ratio, direction: in, type: float, low: 0.0, high: 1.0 }
values:
  ratio: 2.0
"#,
        );
        let config = load_and_validate_config(file.path()).unwrap();
        let err = build_model(&config).unwrap_err();
        assert!(err.to_string().contains("ratio"));
    }
}
