//! Parameter-driven behavior observed through the builder.

use mtac_lib::config::TargetConfig;
use mtac_lib::descriptor::DeploymentDescriptor;
use mtac_lib::{CloudModelBuilder, CompileError};

fn build_module(module_parameters: &str, config: &TargetConfig) -> Result<mtac_lib::model::CloudApplication, CompileError> {
  let yaml = format!(
    r#"
_schema-version: "3"
ID: params
modules:
  - name: app
    type: java
    parameters:
{module_parameters}
resources:
  - name: store
    parameters:
      service: objectstore
"#
  );
  let descriptor = DeploymentDescriptor::from_yaml_str(&yaml).unwrap();
  CloudModelBuilder::new(&descriptor, &[], config)?.build_module("app")
}

fn idle_config() -> TargetConfig {
  TargetConfig {
    default_domain: Some("example.com".to_string()),
    default_idle_domain: Some("idle.example.com".to_string()),
    ..Default::default()
  }
}

#[test]
fn idle_route_keeps_host_and_replaces_domain() {
  let app = build_module("      host: foo", &idle_config()).unwrap();
  assert_eq!(app.routes, vec!["foo.example.com"]);
  assert_eq!(app.idle_routes, vec!["foo.idle.example.com"]);
}

#[test]
fn host_without_any_domain_is_a_domain() {
  let app = build_module("      host: foo", &TargetConfig::default()).unwrap();
  assert_eq!(app.routes, vec!["foo"]);
}

#[test]
fn no_route_wins() {
  let app = build_module(
    "      no-route: true\n      host: foo\n      routes:\n        - route: foo.example.com",
    &idle_config(),
  )
  .unwrap();
  assert!(app.routes.is_empty());
  assert!(app.idle_routes.is_empty());
}

#[test]
fn tcp_and_tcps_together_fail() {
  let err = build_module("      tcp: true\n      tcps: true\n      no-route: true", &idle_config()).unwrap_err();
  assert_eq!(
    err.to_string(),
    "invalid configuration: both TCP and TCPS routing requested"
  );
}

#[test]
fn memory_units() {
  assert_eq!(build_module("      memory: 2G", &idle_config()).unwrap().memory, Some(2048));
  assert_eq!(build_module("      memory: 512M", &idle_config()).unwrap().memory, Some(512));
  assert_eq!(build_module("      memory: 1024", &idle_config()).unwrap().memory, Some(1024));
  assert!(matches!(
    build_module("      memory: 1X", &idle_config()).unwrap_err(),
    CompileError::InvalidValue { .. }
  ));
}

#[test]
fn managed_service_without_plan() {
  let descriptor = DeploymentDescriptor::from_yaml_str(
    r#"
_schema-version: "3"
ID: params
resources:
  - name: store
    parameters:
      service: objectstore
"#,
  )
  .unwrap();
  let config = TargetConfig::default();
  let err = CloudModelBuilder::new(&descriptor, &[], &config)
    .unwrap()
    .build_services()
    .unwrap_err();
  assert!(matches!(err, CompileError::MissingRequiredParameter { ref key, .. } if key == "service-plan"));

  let v1 = DeploymentDescriptor::from_yaml_str(
    r#"
_schema-version: "1.0"
ID: params
resources:
  - name: store
    parameters:
      service: objectstore
"#,
  )
  .unwrap();
  let services = CloudModelBuilder::new(&v1, &[], &config)
    .unwrap()
    .build_services()
    .unwrap();
  assert_eq!(services[0].name, "store");
}

#[test]
fn placeholders_in_routes() {
  let app = build_module(
    "      routes:\n        - route: \"app.{xsa-placeholder-domain-default}\"",
    &idle_config(),
  )
  .unwrap();
  assert_eq!(app.routes, vec!["app.example.com"]);

  let err = build_module(
    "      routes:\n        - route: \"app.{xsa-placeholder-endpoint-controller}\"",
    &idle_config(),
  )
  .unwrap_err();
  assert!(matches!(err, CompileError::Placeholder(_)));
}
