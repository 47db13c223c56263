//! Services command integration tests.

use predicates::prelude::*;

use super::common::{fixture_path, json_stdout, shop_cmd};

#[test]
fn services_skip_inactive_resources() {
  shop_cmd("services")
    .assert()
    .success()
    .stdout(predicate::str::contains("eu10-db (resource db)"))
    .stdout(predicate::str::contains("Plan: small"))
    .stdout(predicate::str::contains("orders-v1 (resource legacy-orders)"))
    .stdout(predicate::str::contains("audit").not());
}

#[test]
fn extension_activates_resource() {
  let services = json_stdout(
    shop_cmd("services")
      .arg("-e")
      .arg(fixture_path("prod.mtaext"))
      .arg("--format")
      .arg("json"),
  );

  let names: Vec<_> = services
    .as_array()
    .unwrap()
    .iter()
    .map(|s| s["name"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(names, vec!["eu10-db", "orders-v1", "eu10-audit"]);
  assert_eq!(services[0]["resource-type"], "managed-service");
  assert_eq!(services[0]["shared"], true);
}
