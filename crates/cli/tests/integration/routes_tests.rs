//! Routes command integration tests.

use predicates::prelude::*;

use super::common::{json_stdout, shop_cmd};

#[test]
fn routes_of_module() {
  shop_cmd("routes")
    .arg("catalog")
    .assert()
    .success()
    .stdout(predicate::str::contains("→ eu10-catalog.apps.example.com"))
    .stdout(predicate::str::contains("→ catalog-idle.idle.example.com"))
    .stdout(predicate::str::contains("→ eu10-catalog-temp.temp.example.com"));
}

#[test]
fn routes_json_output() {
  let routes = json_stdout(shop_cmd("routes").arg("web").arg("--format").arg("json"));

  assert_eq!(routes["module"], "web");
  assert_eq!(routes["routes"][0], "shop.apps.example.com");
  assert_eq!(routes["idle-routes"][0], "shop.idle.example.com");
  assert_eq!(routes["temp-routes"][0], "eu10-web-temp.temp.example.com");
}

#[test]
fn module_without_routes() {
  shop_cmd("routes")
    .arg("docs")
    .assert()
    .success()
    .stdout(predicate::str::contains("Routes:\n  (none)"));
}

#[test]
fn unknown_module_fails() {
  shop_cmd("routes")
    .arg("billing")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unresolvable dependency 'billing'"));
}
