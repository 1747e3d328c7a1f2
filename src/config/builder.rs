// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::LocalComponentFactory;
use crate::config::{AssemblyConfig, ModelConfig};
use crate::errors::ConfigError;
use crate::graph::path;
use crate::model::{ComponentId, Model};

/// Build a [`Model`] from a model description.
///
/// Leaf components come from the [`LocalComponentFactory`]; entries of kind
/// `assembly` become nested assemblies built from their own body. Within
/// each assembly, boundary variables are declared first, then children,
/// passthroughs and connections, and finally initial values are set.
///
/// The description should already have passed
/// [`crate::config::validate_model_config`]; anything it doesn't catch
/// (a cycle, a type mismatch) surfaces as [`ConfigError::Model`].
///
/// # Examples
/// ```
/// use serde_json::json;
/// use the_assembly::config::{build_model, ModelConfig};
///
/// let yaml = r#"
/// components:
///   - { name: p, kind: scale, options: { factor: 2.0 } }
/// connections:
///   - { from: p.y, to: result }
/// values:
///   p.x: 1.5
/// "#;
/// let config: ModelConfig = serde_yaml::from_str(yaml).unwrap();
/// let mut model = build_model(&config).unwrap();
///
/// let root = model.root();
/// model.run(root).unwrap();
/// assert_eq!(model.get(root, "result").unwrap(), &json!(3.0));
/// ```
pub fn build_model(config: &ModelConfig) -> Result<Model, ConfigError> {
    let mut model = Model::new(&config.name);
    let root = model.root();
    build_assembly(&mut model, root, &config.body)?;
    Ok(model)
}

fn build_assembly(
    model: &mut Model,
    scope: ComponentId,
    body: &AssemblyConfig,
) -> Result<(), ConfigError> {
    for variable in &body.variables {
        model.add_variable(scope, variable.to_port_spec())?;
    }

    for component in &body.components {
        if component.is_assembly() {
            let child = model.add_assembly(scope, &component.name)?;
            build_assembly(model, child, &component.body)?;
            continue;
        }
        let instance = LocalComponentFactory::create(&component.kind, &component.options)
            .map_err(|reason| ConfigError::Component {
                name: path::join(&model.pathname(scope), &component.name),
                reason,
            })?;
        model.add_component(scope, &component.name, instance)?;
    }

    for passthrough in &body.passthroughs {
        model.create_passthrough(scope, &passthrough.path, passthrough.alias.as_deref())?;
    }

    for connection in &body.connections {
        if connection.expression {
            model.connect_expression(scope, &connection.from, &connection.to)?;
        } else {
            model.connect(scope, &connection.from, &connection.to)?;
        }
    }

    for (path, value) in &body.values {
        model.set(scope, path, value.clone())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ComponentError, GraphError, ModelError};

    fn parse(yaml: &str) -> ModelConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn builds_children_and_connections() {
        let cfg = parse(
            r#"
components:
  - { name: p, kind: scale }
  - { name: q, kind: identity }
connections:
  - { from: p.y, to: q.x }
"#,
        );
        let mut model = build_model(&cfg).unwrap();
        let root = model.root();
        assert_eq!(model.children(root), vec!["p", "q"]);
        assert_eq!(
            model.list_connections(root, false).unwrap(),
            vec![("p.y".to_string(), "q.x".to_string())]
        );
        assert_eq!(model.component_graph(root).unwrap().refcount("p", "q"), 1);
    }

    #[test]
    fn bad_option_names_the_component() {
        let cfg = parse(
            r#"
components:
  - name: sub
    kind: assembly
    components:
      - { name: p, kind: scale, options: { factor: fast } }
"#,
        );
        match build_model(&cfg) {
            Err(ConfigError::Component { name, reason }) => {
                assert_eq!(name, "top.sub.p");
                assert!(matches!(reason, ComponentError::BadOption { .. }));
            }
            other => panic!("expected a component error, got {:?}", other),
        }
    }

    #[test]
    fn cycles_surface_as_model_errors() {
        let cfg = parse(
            r#"
components:
  - { name: p, kind: identity }
  - { name: q, kind: identity }
connections:
  - { from: p.y, to: q.x }
  - { from: q.y, to: p.x }
"#,
        );
        assert!(matches!(
            build_model(&cfg),
            Err(ConfigError::Model(ModelError::Graph(
                GraphError::CyclicDependency { .. }
            )))
        ));
    }
}
