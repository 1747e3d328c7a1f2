// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::json;

use crate::backends::local::{Adder, Concat, Identity, Scale};
use crate::errors::{ComponentError, ModelError};
use crate::model::{Model, PortSpec, VarType};
use crate::traits::{Component, Values};

/// Integration tests for the default driver using real local components
#[cfg(test)]
mod tests {
    use super::*;

    /// Fails whenever its input is negative.
    #[derive(Debug)]
    struct NonNegative;

    impl Component for NonNegative {
        fn kind(&self) -> &str {
            "non_negative"
        }

        fn ports(&self) -> Vec<PortSpec> {
            vec![
                PortSpec::input("x", VarType::float()),
                PortSpec::output("y", VarType::float()),
            ]
        }

        fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
            let x = crate::traits::component::number(inputs, "x")?;
            if x < 0.0 {
                return Err(ComponentError::Failed(format!("{} is negative", x)));
            }
            Ok(Values::from([("y".to_string(), json!(x))]))
        }
    }

    /// Declares two outputs but only ever returns `y`; `z` is out of range
    /// for its declaration whenever `x` is above one.
    #[derive(Debug)]
    struct Partial {
        emit_z: bool,
    }

    impl Component for Partial {
        fn kind(&self) -> &str {
            "partial"
        }

        fn ports(&self) -> Vec<PortSpec> {
            vec![
                PortSpec::input("x", VarType::float()),
                PortSpec::output("y", VarType::float()),
                PortSpec::output(
                    "z",
                    VarType::Float {
                        low: None,
                        high: Some(1.0),
                    },
                ),
            ]
        }

        fn execute(&mut self, inputs: &Values) -> Result<Values, ComponentError> {
            let x = crate::traits::component::number(inputs, "x")?;
            let mut outputs = Values::from([("y".to_string(), json!(x))]);
            if self.emit_z {
                outputs.insert("z".to_string(), json!(x));
            }
            Ok(outputs)
        }
    }

    #[test]
    fn test_workflow_follows_dataflow_not_insertion() {
        let mut model = Model::new("top");
        let root = model.root();
        model.add_component(root, "last", Box::new(Scale::new(1.0))).unwrap();
        model.add_component(root, "first", Box::new(Scale::new(2.0))).unwrap();
        model.add_component(root, "loner", Box::new(Identity::new())).unwrap();
        assert_eq!(model.workflow_order(root).unwrap(), vec!["last", "first", "loner"]);

        model.connect(root, "first.y", "last.x").unwrap();
        assert_eq!(model.workflow_order(root).unwrap(), vec!["first", "loner", "last"]);

        model.set(root, "first.x", json!(4.0)).unwrap();
        assert_eq!(model.run(root).unwrap(), 3);
        assert_eq!(model.get(root, "last.y").unwrap(), &json!(8.0));
    }

    #[test]
    fn test_diamond_runs_each_component_once() {
        let mut model = Model::new("top");
        let root = model.root();
        model.add_component(root, "src", Box::new(Identity::new())).unwrap();
        model.add_component(root, "left", Box::new(Scale::new(2.0))).unwrap();
        model.add_component(root, "right", Box::new(Scale::new(3.0))).unwrap();
        model.add_component(root, "sum", Box::new(Adder::new())).unwrap();
        model.connect(root, "src.y", "left.x").unwrap();
        model.connect(root, "src.y", "right.x").unwrap();
        model.connect(root, "left.y", "sum.a").unwrap();
        model.connect(root, "right.y", "sum.b").unwrap();

        model.set(root, "src.x", json!(1.0)).unwrap();
        assert_eq!(model.run(root).unwrap(), 4);
        assert_eq!(model.get(root, "sum.sum").unwrap(), &json!(5.0));

        // a change on one branch leaves the other one alone
        model.disconnect(root, "src.y", Some("right.x")).unwrap();
        model.set(root, "right.x", json!(10.0)).unwrap();
        assert_eq!(model.run(root).unwrap(), 2);
        assert_eq!(model.get(root, "sum.sum").unwrap(), &json!(32.0));
    }

    #[test]
    fn test_failed_component_stops_the_run() {
        let mut model = Model::new("top");
        let root = model.root();
        model.add_component(root, "guard", Box::new(NonNegative)).unwrap();
        model.add_component(root, "after", Box::new(Scale::new(2.0))).unwrap();
        model.connect(root, "guard.y", "after.x").unwrap();

        model.set(root, "guard.x", json!(-1.0)).unwrap();
        match model.run(root) {
            Err(ModelError::ExecutionFailed { component, reason }) => {
                assert_eq!(component, "top.guard");
                assert_eq!(reason, ComponentError::Failed("-1 is negative".into()));
            }
            other => panic!("expected an execution failure, got {:?}", other),
        }
        assert_eq!(
            model.get_valids(root, &["guard.y", "after.y"]).unwrap(),
            vec![false, false]
        );

        model.set(root, "guard.x", json!(1.5)).unwrap();
        assert_eq!(model.run(root).unwrap(), 2);
        assert_eq!(model.get(root, "after.y").unwrap(), &json!(3.0));
    }

    #[test]
    fn test_nested_assembly_runs_its_own_workflow() {
        let mut model = Model::new("top");
        let root = model.root();
        let sub = model.add_assembly(root, "sub").unwrap();
        model.add_component(sub, "head", Box::new(Concat::with_separator(" "))).unwrap();
        model.add_component(sub, "tail", Box::new(Concat::with_separator("!"))).unwrap();
        model.connect(sub, "head.text", "tail.left").unwrap();
        model.connect(sub, "greeting", "head.left").unwrap();
        model.connect(sub, "tail.text", "message").unwrap();
        model.add_component(root, "echo", Box::new(Identity::new())).unwrap();
        model.connect(root, "sub.message", "echo.x").unwrap();

        model.set(root, "sub.greeting", json!("hello")).unwrap();
        model.set(root, "sub.head.right", json!("world")).unwrap();
        assert_eq!(model.workflow_order(root).unwrap(), vec!["sub", "echo"]);
        assert_eq!(model.run(root).unwrap(), 3);
        assert_eq!(model.get(root, "echo.y").unwrap(), &json!("hello world!"));

        // running only the nested assembly touches nothing above it
        model.set(root, "sub.head.right", json!("there")).unwrap();
        assert_eq!(model.run(sub).unwrap(), 2);
        assert_eq!(model.get_valids(root, &["echo.x"]).unwrap(), vec![false]);
        assert_eq!(model.run(root).unwrap(), 1);
        assert_eq!(model.get(root, "echo.y").unwrap(), &json!("hello there!"));
    }

    #[test]
    fn test_running_a_leaf_pulls_from_its_parent() {
        let mut model = Model::new("top");
        let root = model.root();
        model.add_component(root, "p", Box::new(Scale::new(2.0))).unwrap();
        let q = model.add_component(root, "q", Box::new(Scale::new(2.0))).unwrap();
        model.connect(root, "p.y", "q.x").unwrap();
        model.set(root, "p.x", json!(1.0)).unwrap();

        assert_eq!(model.run(q).unwrap(), 1);
        assert_eq!(model.get(root, "q.y").unwrap(), &json!(4.0));
        // p ran during the pull, so the root has nothing left to do
        assert_eq!(model.run(root).unwrap(), 0);
    }

    #[test]
    fn test_unproduced_output_fails_and_stays_invalid() {
        let mut model = Model::new("top");
        let root = model.root();
        model
            .add_component(root, "s", Box::new(Partial { emit_z: false }))
            .unwrap();
        model.set(root, "s.x", json!(0.5)).unwrap();

        match model.run(root) {
            Err(ModelError::ExecutionFailed { component, reason }) => {
                assert_eq!(component, "top.s");
                assert_eq!(reason, ComponentError::MissingOutput("z".into()));
            }
            other => panic!("expected a missing output, got {:?}", other),
        }
        // nothing was stored, so a stale default never looks fresh
        assert_eq!(model.get_valids(root, &["s.y", "s.z"]).unwrap(), vec![false, false]);
        assert_eq!(model.get(root, "s.y").unwrap(), &json!(0.0));
    }

    #[test]
    fn test_rejected_output_stores_nothing() {
        let mut model = Model::new("top");
        let root = model.root();
        model
            .add_component(root, "s", Box::new(Partial { emit_z: true }))
            .unwrap();
        model.set(root, "s.x", json!(0.5)).unwrap();
        assert_eq!(model.run(root).unwrap(), 1);
        assert_eq!(model.get_valids(root, &["s.y", "s.z"]).unwrap(), vec![true, true]);

        model.set(root, "s.x", json!(4.0)).unwrap();
        assert!(matches!(
            model.run(root),
            Err(ModelError::TypeOrRangeError { ref path, .. }) if path == "top.s.z"
        ));
        // y was returned as well but is not half-updated
        assert_eq!(model.get(root, "s.y").unwrap(), &json!(0.5));
        assert_eq!(model.get_valids(root, &["s.y", "s.z"]).unwrap(), vec![false, false]);
    }
}
