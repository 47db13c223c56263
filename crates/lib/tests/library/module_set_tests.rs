//! Archive, intended and deployed module set checks.

use mtac_lib::config::TargetConfig;
use mtac_lib::descriptor::DeploymentDescriptor;
use mtac_lib::{CloudModelBuilder, CompileError, MessageKey};

use super::common::names;

const DESCRIPTOR: &str = r#"
_schema-version: "3"
ID: closure
modules:
  - name: A
    type: java
    parameters:
      dependency-type: hard
    requires:
      - name: B
  - name: B
    type: java
  - name: C
    type: java
"#;

fn content_error(err: CompileError) -> (MessageKey, Vec<String>) {
  match err {
    CompileError::Content(content) => (content.key, content.args),
    other => panic!("expected a content error, got: {other}"),
  }
}

fn descriptor() -> DeploymentDescriptor {
  DeploymentDescriptor::from_yaml_str(DESCRIPTOR).unwrap()
}

#[test]
fn dependency_resolved_through_deployed_state() {
  let descriptor = descriptor();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();

  let apps = builder
    .build(&names(&["A"]), &names(&["A", "B"]), &names(&["A", "B"]))
    .unwrap();

  assert_eq!(apps.len(), 1);
  assert_eq!(apps[0].module_name, "A");
}

#[test]
fn dependency_neither_built_nor_deployed() {
  let descriptor = descriptor();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();

  let err = builder
    .build(&names(&["A"]), &names(&["A", "B"]), &names(&[]))
    .unwrap_err();

  assert_eq!(content_error(err), (MessageKey::UnresolvedModules, vec!["B".to_string()]));
}

#[test]
fn every_unresolved_module_is_reported() {
  let descriptor = descriptor();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();

  let err = builder
    .build(&names(&["A"]), &names(&["A", "B", "C"]), &names(&[]))
    .unwrap_err();

  assert_eq!(err.to_string(), "unresolved modules: B, C");
}

#[test]
fn archived_module_not_intended() {
  let descriptor = descriptor();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();

  let err = builder
    .build(&names(&["A", "C"]), &names(&["A"]), &names(&["B"]))
    .unwrap_err();

  assert_eq!(
    content_error(err),
    (MessageKey::ArchiveModulesNotIntended, vec!["C".to_string()])
  );
}

#[test]
fn hard_dependency_cycle() {
  let yaml = DESCRIPTOR.replace(
    "  - name: B\n    type: java\n",
    "  - name: B\n    type: java\n    parameters:\n      dependency-type: hard\n    requires:\n      - name: A\n",
  );
  let descriptor = DeploymentDescriptor::from_yaml_str(&yaml).unwrap();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();

  let err = builder
    .build(&names(&["A", "B"]), &names(&["A", "B"]), &names(&[]))
    .unwrap_err();

  assert_eq!(
    content_error(err),
    (
      MessageKey::CircularModuleDependencies,
      vec!["A".to_string(), "B".to_string()]
    )
  );
}

#[test]
fn builder_is_reusable() {
  let descriptor = descriptor();
  let config = TargetConfig::default();
  let builder = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();
  let all = names(&["A", "B", "C"]);

  let first = builder.build(&all, &all, &names(&[])).unwrap();
  let second = builder.build(&all, &all, &names(&[])).unwrap();

  assert_eq!(first, second);
  let order: Vec<_> = first.iter().map(|a| a.module_name.as_str()).collect();
  assert_eq!(order, vec!["B", "A", "C"]);
}
