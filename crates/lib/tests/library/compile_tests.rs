//! End-to-end compilation of the shop fixture.

use mtac_lib::CloudModelBuilder;
use mtac_lib::model::{CloudApplication, ServiceKeyToInject};
use mtac_lib::resource::ResourceType;

use super::common::{names, prod_extension, shop_descriptor, target_config};

fn build_shop() -> Vec<CloudApplication> {
  let descriptor = shop_descriptor();
  let config = target_config();
  let builder = CloudModelBuilder::new(&descriptor, &[prod_extension()], &config).unwrap();
  let modules = names(&["web", "catalog"]);
  builder.build(&modules, &modules, &names(&[])).unwrap()
}

#[test]
fn hard_dependency_on_provider_orders_modules() {
  let apps = build_shop();
  let modules: Vec<_> = apps.iter().map(|a| a.module_name.as_str()).collect();
  assert_eq!(modules, vec!["catalog", "web"]);
}

#[test]
fn catalog_application() {
  let apps = build_shop();
  let catalog = &apps[0];

  assert_eq!(catalog.name, "eu10-catalog");
  assert_eq!(catalog.memory, Some(1024));
  assert_eq!(catalog.instances, Some(3));
  assert_eq!(catalog.routes, vec!["eu10-catalog.apps.example.com"]);
  assert_eq!(catalog.idle_routes, vec!["catalog-idle.idle.example.com"]);
  assert_eq!(catalog.temp_routes, vec!["eu10-catalog-temp.temp.example.com"]);
  assert_eq!(catalog.domains, vec!["apps.example.com"]);
  assert_eq!(catalog.services, vec!["eu10-db"]);
  assert_eq!(catalog.env["MTA_MODULE_PROVIDED_DEPENDENCIES"], r#"["catalog-api"]"#);
}

#[test]
fn web_application_with_extension_overrides() {
  let apps = build_shop();
  let web = &apps[1];

  assert_eq!(web.name, "eu10-web");
  assert_eq!(web.memory, Some(512));
  assert_eq!(web.instances, Some(4));
  assert_eq!(web.routes, vec!["www.apps.example.com"]);
  assert_eq!(web.temp_routes, vec!["eu10-web-temp.temp.example.com"]);
  assert_eq!(web.staging.health_check_http_endpoint.as_deref(), Some("/"));
  assert_eq!(web.services, vec!["eu10-db"]);
  assert_eq!(web.binding_parameters["eu10-db"]["role"], "reader");
  assert_eq!(
    web.service_keys_to_inject,
    vec![ServiceKeyToInject {
      env_var_name: "PAYMENT_CREDENTIALS".to_string(),
      service_name: "payment-service".to_string(),
      service_key_name: "shop-key".to_string(),
    }]
  );
  assert_eq!(web.tasks.len(), 1);
  assert_eq!(web.tasks[0].memory, Some(128));
}

#[test]
fn web_environment() {
  let apps = build_shop();
  let env = &apps[1].env;

  assert_eq!(env["NODE_ENV"], "production-eu");
  assert_eq!(
    env["destinations"],
    r#"[{"name":"catalog-api","url":"https://catalog.internal"}]"#
  );
  assert_eq!(env["MTA_SERVICES"], r#"["eu10-db"]"#);
  let metadata: serde_json::Value = serde_json::from_str(&env["MTA_METADATA"]).unwrap();
  assert_eq!(metadata["id"], "com.example.shop");
  assert_eq!(metadata["provider"], "Example Corp");
}

#[test]
fn model_serializes_to_json() {
  let apps = build_shop();
  let json = serde_json::to_value(&apps).unwrap();

  assert_eq!(json[1]["module-name"], "web");
  assert_eq!(json[1]["service-keys-to-inject"][0]["env-var-name"], "PAYMENT_CREDENTIALS");
}

#[test]
fn extension_activates_optional_resource() {
  let descriptor = shop_descriptor();
  let config = target_config();

  let base = CloudModelBuilder::new(&descriptor, &[], &config).unwrap();
  let services: Vec<_> = base
    .build_services()
    .unwrap()
    .into_iter()
    .map(|s| s.name)
    .collect();
  assert_eq!(services, vec!["eu10-db", "orders-v1"]);

  let extended = CloudModelBuilder::new(&descriptor, &[prod_extension()], &config).unwrap();
  let services = extended.build_services().unwrap();
  let audit = services.iter().find(|s| s.resource_name == "audit").unwrap();
  assert_eq!(audit.name, "eu10-audit");
  assert_eq!(audit.resource_type, ResourceType::ManagedService);
  assert!(services.iter().find(|s| s.resource_name == "db").unwrap().shared);
}
