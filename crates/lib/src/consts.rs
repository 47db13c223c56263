//! Parameter, property and environment names understood by the compiler.

// Naming
pub const PARAM_APP_NAME: &str = "app-name";
pub const PARAM_SERVICE_NAME: &str = "service-name";
pub const PARAM_SERVICE_KEY_NAME: &str = "service-key-name";
pub const PARAM_ENV_VAR_NAME: &str = "env-var-name";

// Routing
pub const PARAM_ROUTE: &str = "route";
pub const PARAM_ROUTES: &str = "routes";
pub const PARAM_IDLE_ROUTES: &str = "idle-routes";
pub const PARAM_ROUTE_PATH: &str = "route-path";
pub const PARAM_HOST: &str = "host";
pub const PARAM_HOSTS: &str = "hosts";
pub const PARAM_DOMAIN: &str = "domain";
pub const PARAM_DOMAINS: &str = "domains";
pub const PARAM_PORT: &str = "port";
pub const PARAM_PORTS: &str = "ports";
pub const PARAM_IDLE_HOST: &str = "idle-host";
pub const PARAM_IDLE_HOSTS: &str = "idle-hosts";
pub const PARAM_IDLE_DOMAIN: &str = "idle-domain";
pub const PARAM_IDLE_DOMAINS: &str = "idle-domains";
pub const PARAM_IDLE_PORT: &str = "idle-port";
pub const PARAM_IDLE_PORTS: &str = "idle-ports";
pub const PARAM_TEMP_HOST: &str = "temp-host";
pub const PARAM_TEMP_HOSTS: &str = "temp-hosts";
pub const PARAM_TEMP_DOMAIN: &str = "temp-domain";
pub const PARAM_TEMP_DOMAINS: &str = "temp-domains";
pub const PARAM_TEMP_PORT: &str = "temp-port";
pub const PARAM_TEMP_PORTS: &str = "temp-ports";
pub const PARAM_NO_ROUTE: &str = "no-route";
pub const PARAM_NO_HOSTNAME: &str = "no-hostname";
pub const PARAM_TCP: &str = "tcp";
pub const PARAM_TCPS: &str = "tcps";

// System parameters, appended to every module chain from the target config
pub const PARAM_DEFAULT_HOST: &str = "default-host";
pub const PARAM_DEFAULT_DOMAIN: &str = "default-domain";
pub const PARAM_DEFAULT_PORT: &str = "default-port";
pub const PARAM_DEFAULT_IDLE_HOST: &str = "default-idle-host";
pub const PARAM_DEFAULT_IDLE_DOMAIN: &str = "default-idle-domain";
pub const PARAM_DEFAULT_IDLE_PORT: &str = "default-idle-port";
pub const PARAM_DEFAULT_TEMP_HOST: &str = "default-temp-host";
pub const PARAM_DEFAULT_TEMP_DOMAIN: &str = "default-temp-domain";
pub const PARAM_DEFAULT_TEMP_PORT: &str = "default-temp-port";
pub const TEMP_HOST_SUFFIX: &str = "-temp";

// Staging and sizing
pub const PARAM_COMMAND: &str = "command";
pub const PARAM_BUILDPACK: &str = "buildpack";
pub const PARAM_BUILDPACKS: &str = "buildpacks";
pub const PARAM_STACK: &str = "stack";
pub const PARAM_HEALTH_CHECK_TIMEOUT: &str = "health-check-timeout";
pub const PARAM_HEALTH_CHECK_TYPE: &str = "health-check-type";
pub const PARAM_HEALTH_CHECK_HTTP_ENDPOINT: &str = "health-check-http-endpoint";
pub const PARAM_ENABLE_SSH: &str = "enable-ssh";
pub const PARAM_MEMORY: &str = "memory";
pub const PARAM_DISK_QUOTA: &str = "disk-quota";
pub const PARAM_INSTANCES: &str = "instances";
pub const PARAM_TASKS: &str = "tasks";
pub const PARAM_DEPENDENCY_TYPE: &str = "dependency-type";
pub const PARAM_RESTART_ON_ENV_CHANGE: &str = "restart-on-env-change";
pub const PARAM_DOCKER: &str = "docker";

// Restart entries
pub const RESTART_ON_VCAP_APP_CHANGE: &str = "vcap-application";
pub const RESTART_ON_VCAP_SERVICES_CHANGE: &str = "vcap-services";
pub const RESTART_ON_USER_PROVIDED_CHANGE: &str = "user-provided";

// Docker entries
pub const DOCKER_IMAGE: &str = "image";
pub const DOCKER_USERNAME: &str = "username";
pub const DOCKER_PASSWORD: &str = "password";

// Task entries
pub const TASK_NAME: &str = "name";
pub const TASK_COMMAND: &str = "command";
pub const TASK_ENV: &str = "env";

// Services
pub const PARAM_TYPE: &str = "type";
pub const PARAM_SERVICE: &str = "service";
pub const PARAM_SERVICE_PLAN: &str = "service-plan";
pub const PARAM_SERVICE_PROVIDER: &str = "service-provider";
pub const PARAM_SERVICE_VERSION: &str = "service-version";
pub const PARAM_SERVICE_TAGS: &str = "service-tags";
pub const PARAM_SERVICE_ALTERNATIVES: &str = "service-alternatives";
pub const PARAM_SERVICE_CONFIG: &str = "config";
pub const PARAM_SHARED: &str = "shared";
pub const PARAM_IGNORE_UPDATE_ERRORS: &str = "ignore-update-errors";
pub const PARAM_BINDING_CONFIG: &str = "config";

// Application attributes exported through DEPLOY_ATTRIBUTES
pub const PARAM_CHECK_DEPLOY_ID: &str = "check-deploy-id";
pub const PARAM_SERVICE_URL: &str = "service-url";
pub const PARAM_SERVICE_BROKER_URL: &str = "service-broker-url";

pub const DEPENDENCY_TYPE_SOFT: &str = "soft";
pub const DEPENDENCY_TYPE_HARD: &str = "hard";
pub const HEALTH_CHECK_TYPE_HTTP: &str = "http";
pub const DEFAULT_HEALTH_CHECK_HTTP_ENDPOINT: &str = "/";

/// Module parameters copied into `DEPLOY_ATTRIBUTES`.
pub const APP_ATTRIBUTES: &[&str] = &[
  "execute-app",
  "success-marker",
  "failure-marker",
  "stop-app",
  PARAM_CHECK_DEPLOY_ID,
  "register-service-url",
  PARAM_SERVICE_NAME,
  PARAM_SERVICE_URL,
  "create-service-broker",
  "service-broker-name",
  "service-broker-user",
  "service-broker-password",
  PARAM_SERVICE_BROKER_URL,
  "service-broker-space-scoped",
  PARAM_DEPENDENCY_TYPE,
  "no-start",
  "upload-timeout",
];

/// Module parameters consumed while building the application itself.
pub const APP_PROPS: &[&str] = &[
  PARAM_APP_NAME,
  PARAM_HOST,
  PARAM_HOSTS,
  PARAM_DOMAIN,
  PARAM_DOMAINS,
  PARAM_PORT,
  PARAM_PORTS,
  PARAM_ROUTE,
  PARAM_ROUTES,
  PARAM_IDLE_ROUTES,
  PARAM_ROUTE_PATH,
  PARAM_COMMAND,
  PARAM_BUILDPACK,
  PARAM_BUILDPACKS,
  PARAM_HEALTH_CHECK_TYPE,
  PARAM_HEALTH_CHECK_HTTP_ENDPOINT,
  PARAM_ENABLE_SSH,
  PARAM_STACK,
  PARAM_HEALTH_CHECK_TIMEOUT,
  PARAM_IDLE_HOST,
  PARAM_IDLE_HOSTS,
  PARAM_IDLE_DOMAIN,
  PARAM_IDLE_DOMAINS,
  PARAM_IDLE_PORT,
  PARAM_IDLE_PORTS,
  PARAM_TEMP_HOST,
  PARAM_TEMP_HOSTS,
  PARAM_TEMP_DOMAIN,
  PARAM_TEMP_DOMAINS,
  PARAM_TEMP_PORT,
  PARAM_TEMP_PORTS,
  PARAM_MEMORY,
  PARAM_INSTANCES,
  PARAM_NO_HOSTNAME,
  PARAM_NO_ROUTE,
  PARAM_DISK_QUOTA,
  PARAM_TASKS,
  PARAM_TCP,
  PARAM_TCPS,
  PARAM_RESTART_ON_ENV_CHANGE,
  PARAM_DOCKER,
  "keep-existing-routes",
];

/// Singular parameter name and the plural collection it aliases.
pub const SINGULAR_PLURAL_MAPPING: &[(&str, &str)] = &[
  (PARAM_ROUTE, PARAM_ROUTES),
  (PARAM_HOST, PARAM_HOSTS),
  (PARAM_DOMAIN, PARAM_DOMAINS),
  (PARAM_PORT, PARAM_PORTS),
  (PARAM_IDLE_HOST, PARAM_IDLE_HOSTS),
  (PARAM_IDLE_DOMAIN, PARAM_IDLE_DOMAINS),
  (PARAM_IDLE_PORT, PARAM_IDLE_PORTS),
  (PARAM_TEMP_HOST, PARAM_TEMP_HOSTS),
  (PARAM_TEMP_DOMAIN, PARAM_TEMP_DOMAINS),
  (PARAM_TEMP_PORT, PARAM_TEMP_PORTS),
  (PARAM_BUILDPACK, PARAM_BUILDPACKS),
];

// Environment variables
pub const ENV_MTA_METADATA: &str = "MTA_METADATA";
pub const ENV_MTA_MODULE_METADATA: &str = "MTA_MODULE_METADATA";
pub const ENV_MTA_MODULE_PROVIDED_DEPENDENCIES: &str = "MTA_MODULE_PROVIDED_DEPENDENCIES";
pub const ENV_MTA_SERVICES: &str = "MTA_SERVICES";
pub const ENV_DEPLOY_ATTRIBUTES: &str = "DEPLOY_ATTRIBUTES";
pub const ENV_DEPLOY_ID: &str = "DEPLOY_ID";

pub const ATTR_ID: &str = "id";
pub const ATTR_NAME: &str = "name";
pub const ATTR_VERSION: &str = "version";
pub const ATTR_DESCRIPTION: &str = "description";
pub const ATTR_PROVIDER: &str = "provider";
pub const ATTR_COPYRIGHT: &str = "copyright";

// Naming limits
pub const NAMESPACE_SEPARATOR: &str = "-";
pub const APP_NAME_MAX_LENGTH: usize = 1024;
pub const SERVICE_NAME_MAX_LENGTH: usize = 50;
pub const NAME_HASH_LEN: usize = 8;

// Target configuration overrides
pub const ENV_DEFAULT_DOMAIN: &str = "MTAC_DEFAULT_DOMAIN";
pub const ENV_NAMESPACE: &str = "MTAC_NAMESPACE";
pub const ENV_PRETTY_PRINTING: &str = "MTAC_PRETTY_PRINTING";
