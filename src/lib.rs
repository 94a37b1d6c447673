//! # terraform-tasks
//!
//! Composable task collections that wrap Terraform invocations in a
//! generic task-runner abstraction: declare a named collection once, get
//! `validate`/`plan`/`apply`/`destroy`/`output` tasks that each run
//! `terraform init` (and workspace selection when configured) before
//! their primary action.
//!
//! ```no_run
//! use terraform_tasks::{Parameter, TaskCollectionBuilder};
//!
//! let collection = TaskCollectionBuilder::new()
//!     .for_configuration("network")
//!     .with_global_parameters(vec![
//!         Parameter::new("region", "eu-west-1").with_help("Deployment region"),
//!     ])
//!     .with_global_configure(|_context, arguments, configuration| {
//!         configuration.source_directory = Some("infra/network".to_string());
//!         configuration.workspace = arguments.get_str("region").map(String::from);
//!         Ok(())
//!     })
//!     .create();
//! ```
//!
//! ## Modules
//!
//! - `collection` - Immutable fluent builder for named task collections
//! - `config` - Per-invocation configuration and configure-callback resolution
//! - `factory` - Task construction and the init/workspace/operation sequencing
//! - `subprocess` - Executor abstraction over `tokio::process`, with a mock for testing
//! - `tasks` - Interface to the task-runner framework (tasks, parameters, collections)
//! - `terraform` - Command construction and the operation façade

pub mod collection;
pub mod config;
pub mod factory;
pub mod subprocess;
pub mod tasks;
pub mod terraform;

pub use collection::TaskCollectionBuilder;
pub use config::{Configuration, ConfigureFn, InitConfig, OutputConfig, ValidateConfig};
pub use factory::{TaskFactory, TaskName};
pub use tasks::{Arguments, Collection, Context, Parameter, Task};
pub use terraform::{BackendConfig, Environment, Terraform, Variables};
