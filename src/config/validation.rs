// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Model file validation.
//!
//! Checks a [`ModelConfig`] for the mistakes that can be found without
//! building anything, so a broken file is rejected with every problem listed
//! instead of failing halfway through construction.
//!
//! # Validation Pipeline
//!
//! Each assembly, the root first, goes through the same checks:
//!
//! 1. **Uniqueness**: variables, children and passthrough aliases share one namespace
//! 2. **Kinds**: every leaf kind is known to the component factory, and only
//!    assemblies carry nested content
//! 3. **Endpoints**: connections, passthroughs and values name children that exist
//!
//! Nested assemblies are then validated recursively. Errors from every level
//! are accumulated.
//!
//! What can only be decided by building the model (direction and type
//! compatibility, cycles between components) is left to the model itself.
//!
//! # Examples
//!
//! ```rust
//! use the_assembly::config::{validate_model_config, ModelConfig};
//! use the_assembly::errors::ValidationError;
//!
//! let yaml = r#"
//! components:
//!   - { name: p, kind: scale }
//!   - { name: p, kind: warp_drive }
//! connections:
//!   - { from: p.y, to: q.x }
//! "#;
//! let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
//!
//! let errors = validate_model_config(&config).unwrap_err();
//! assert_eq!(errors.len(), 3);
//! for error in errors {
//!     match error {
//!         ValidationError::DuplicateName { name, .. } => assert_eq!(name, "p"),
//!         ValidationError::UnknownKind { kind, .. } => assert_eq!(kind, "warp_drive"),
//!         ValidationError::UnresolvedEndpoint { component, .. } => assert_eq!(component, "q"),
//!         other => panic!("unexpected {}", other),
//!     }
//! }
//! ```

use std::collections::HashSet;

use crate::backends::local::LocalComponentFactory;
use crate::config::{AssemblyConfig, ModelConfig};
use crate::errors::ValidationError;
use crate::graph::path;

/// Validates a whole model description.
///
/// # Returns
///
/// * `Ok(())` - The description can be handed to [`crate::config::build_model`]
/// * `Err(Vec<ValidationError>)` - Every problem found, outermost assembly first
pub fn validate_model_config(config: &ModelConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    validate_assembly(&config.name, &config.body, &mut errors);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_assembly(scope: &str, body: &AssemblyConfig, errors: &mut Vec<ValidationError>) {
    errors.extend(validate_unique_names(scope, body));
    errors.extend(validate_kinds(scope, body));
    errors.extend(validate_endpoints(scope, body));

    for component in body.components.iter().filter(|c| c.is_assembly()) {
        validate_assembly(&path::join(scope, &component.name), &component.body, errors);
    }
}

/// Every name declared directly in an assembly must be unique: boundary
/// variables, children and the aliases its passthroughs will create.
fn validate_unique_names(scope: &str, body: &AssemblyConfig) -> Vec<ValidationError> {
    let declared = body
        .variables
        .iter()
        .map(|v| v.name.as_str())
        .chain(body.components.iter().map(|c| c.name.as_str()))
        .chain(
            body.passthroughs
                .iter()
                .map(|p| p.alias.as_deref().unwrap_or_else(|| path::leaf(&p.path))),
        );

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut errors = Vec::new();
    for name in declared {
        if !seen.insert(name) && reported.insert(name) {
            errors.push(ValidationError::DuplicateName {
                scope: scope.to_string(),
                name: name.to_string(),
            });
        }
    }
    errors
}

fn validate_kinds(scope: &str, body: &AssemblyConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for component in &body.components {
        if component.is_assembly() {
            continue;
        }
        if !LocalComponentFactory::is_kind_available(&component.kind) {
            errors.push(ValidationError::UnknownKind {
                scope: scope.to_string(),
                name: component.name.clone(),
                kind: component.kind.clone(),
            });
        }
        if !component.body.is_empty() {
            errors.push(ValidationError::UnexpectedBody {
                scope: scope.to_string(),
                name: component.name.clone(),
            });
        }
    }
    errors
}

/// Paths with a child segment must name children that exist, following
/// nested assemblies as deep as the path goes. Bare names are boundary
/// variables, which a connection may create on the fly.
fn validate_endpoints(scope: &str, body: &AssemblyConfig) -> Vec<ValidationError> {
    let connection_ends = body
        .connections
        .iter()
        .flat_map(|c| [c.from.as_str(), c.to.as_str()]);
    let value_paths = body.values.keys().map(String::as_str);

    let mut errors: Vec<ValidationError> = connection_ends
        .chain(value_paths)
        .filter_map(|endpoint| {
            missing_segment(body, endpoint).map(|component| ValidationError::UnresolvedEndpoint {
                scope: scope.to_string(),
                path: endpoint.to_string(),
                component,
            })
        })
        .collect();

    for passthrough in &body.passthroughs {
        let missing = match path::owner(&passthrough.path) {
            None => Some(passthrough.path.clone()),
            Some(_) => missing_segment(body, &passthrough.path),
        };
        if let Some(component) = missing {
            errors.push(ValidationError::UnresolvedEndpoint {
                scope: scope.to_string(),
                path: passthrough.path.clone(),
                component,
            });
        }
    }
    errors
}

/// The first child segment of `endpoint` that doesn't exist.
fn missing_segment(body: &AssemblyConfig, endpoint: &str) -> Option<String> {
    let (Some(child), rest) = path::split(endpoint) else {
        return None;
    };
    match body.component(child) {
        None => Some(child.to_string()),
        Some(c) if c.is_assembly() && path::owner(rest).is_some() => missing_segment(&c.body, rest),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> ModelConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn valid_model_passes() {
        let cfg = parse(
            r#"
components:
  - { name: p, kind: scale }
  - name: sub
    kind: assembly
    components:
      - { name: inner, kind: identity }
connections:
  - { from: p.y, to: sub.inner.x }
  - { from: p.y, to: result }
"#,
        );
        assert!(validate_model_config(&cfg).is_ok());
    }

    #[test]
    fn duplicates_are_reported_once_per_name() {
        let cfg = parse(
            r#"
variables:
  - { name: p, direction: in }
components:
  - { name: p, kind: scale }
  - { name: p, kind: adder }
"#,
        );
        let errors = validate_model_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateName {
                scope: "top".into(),
                name: "p".into()
            }]
        );
    }

    #[test]
    fn passthrough_alias_collides_with_child() {
        let cfg = parse(
            r#"
components:
  - { name: x, kind: identity }
  - { name: q, kind: identity }
passthroughs:
  - { path: q.x }
"#,
        );
        let errors = validate_model_config(&cfg).unwrap_err();
        assert!(matches!(
            &errors[0],
            ValidationError::DuplicateName { name, .. } if name == "x"
        ));
    }

    #[test]
    fn leaf_with_nested_content_is_rejected() {
        let cfg = parse(
            r#"
components:
  - name: p
    kind: scale
    components:
      - { name: q, kind: scale }
"#,
        );
        let errors = validate_model_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnexpectedBody {
                scope: "top".into(),
                name: "p".into()
            }]
        );
    }

    #[test]
    fn errors_in_nested_assemblies_carry_their_scope() {
        let cfg = parse(
            r#"
name: plant
components:
  - name: sub
    kind: assembly
    components:
      - { name: q, kind: nope }
    connections:
      - { from: q.y, to: r.x }
connections:
  - { from: sub.ghost.y, to: out }
"#,
        );
        let errors = validate_model_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::UnresolvedEndpoint {
                    scope: "plant".into(),
                    path: "sub.ghost.y".into(),
                    component: "ghost".into()
                },
                ValidationError::UnknownKind {
                    scope: "plant.sub".into(),
                    name: "q".into(),
                    kind: "nope".into()
                },
                ValidationError::UnresolvedEndpoint {
                    scope: "plant.sub".into(),
                    path: "r.x".into(),
                    component: "r".into()
                },
            ]
        );
    }

    #[test]
    fn passthrough_needs_a_child_path() {
        let cfg = parse(
            r#"
variables:
  - { name: x, direction: in }
passthroughs:
  - { path: x, alias: y }
values:
  missing.x: 1.0
"#,
        );
        let errors = validate_model_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::UnresolvedEndpoint { .. })));
    }
}
