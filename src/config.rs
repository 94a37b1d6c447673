//! Per-invocation task configuration and its resolution.
//!
//! Every task invocation allocates a fresh [`Configuration`] with default
//! fields, then runs the user's configure callbacks against it in
//! composition order. Nothing is shared between invocations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::tasks::{Arguments, Context};
use crate::terraform::{BackendConfig, Environment, Variables};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitConfig {
    pub backend_config: BackendConfig,
    pub reconfigure: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub name: Option<String>,
    pub json: bool,
    pub raw: bool,
    pub capture_stdout: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidateConfig {
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub source_directory: Option<String>,
    pub variables: Variables,
    pub workspace: Option<String>,
    pub auto_approve: bool,
    pub environment: Option<Environment>,
    pub init: InitConfig,
    pub output: OutputConfig,
    pub validate: ValidateConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            source_directory: None,
            variables: Variables::new(),
            workspace: None,
            auto_approve: true,
            environment: None,
            init: InitConfig::default(),
            output: OutputConfig::default(),
            validate: ValidateConfig::default(),
        }
    }
}

impl Configuration {
    /// Environment handed to the executor: always a concrete map, whether
    /// or not the callbacks set one.
    pub fn resolved_environment(&self) -> Environment {
        self.environment.clone().unwrap_or_default()
    }
}

/// Callback mutating a configuration in place. Errors propagate to the
/// task invocation unmodified.
pub type ConfigureFn =
    Arc<dyn Fn(&Context, &Arguments, &mut Configuration) -> anyhow::Result<()> + Send + Sync>;

pub fn configure<F>(f: F) -> ConfigureFn
where
    F: Fn(&Context, &Arguments, &mut Configuration) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn noop() -> ConfigureFn {
    Arc::new(|_context, _arguments, _configuration| Ok(()))
}

/// Runs `first` then `second` against the same configuration instance.
/// Composition order is load-bearing: later callbacks see (and may
/// overwrite) what earlier ones set.
pub fn compose(first: ConfigureFn, second: ConfigureFn) -> ConfigureFn {
    Arc::new(move |context, arguments, configuration| {
        first(context, arguments, configuration)?;
        second(context, arguments, configuration)
    })
}

pub fn resolve(
    configure: &ConfigureFn,
    context: &Context,
    arguments: &Arguments,
) -> anyhow::Result<Configuration> {
    let mut configuration = Configuration::default();
    configure(context, arguments, &mut configuration)?;
    Ok(configuration)
}
