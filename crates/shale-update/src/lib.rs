mod config;
mod context;
mod culling;
mod error;
mod log_builder;
mod node;
mod parse_update;
mod paths;
mod plan;
mod pull;
mod pull_all;

pub use config::{ConfigError, UpdateConfig};
pub use context::{ApplyParams, ApplyResult};
pub use error::{ErrorKind, UpdateError};
pub use log_builder::LogBuilder;
pub use node::UpdateNode;
pub use parse_update::parse_update;
pub use paths::{ImmutablePaths, IndexedPaths};
pub use plan::UpdatePlan;
pub use pull::PullNode;
pub use pull_all::PullAllNode;
