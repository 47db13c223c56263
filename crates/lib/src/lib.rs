//! mtac-lib: compiles MTA deployment descriptors into cloud application models
//!
//! The compiler takes a deployment descriptor, its extension descriptors and
//! a target configuration, and produces one deployable application per
//! module:
//! - `chain` / `lookup`: layered parameter resolution, first match wins
//! - `resource`: classification of resources into service kinds
//! - `routes`: live, idle and temporary route assembly
//! - `services`: service names, service keys and binding parameters
//! - `builder`: the cloud application model builder

pub mod builder;
pub mod chain;
pub mod config;
pub mod consts;
pub mod descriptor;
pub mod env;
pub mod error;
pub mod lookup;
pub mod model;
pub mod naming;
pub mod placeholder;
pub mod resource;
pub mod routes;
pub mod services;
pub mod sort;
pub mod uri;

pub use builder::CloudModelBuilder;
pub use error::{CompileError, ContentError, MessageKey, Result};
