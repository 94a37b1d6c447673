//! Thin façade over the Terraform CLI: one method per operation, each
//! building its argument vector and handing it to the executor. Failures
//! from the executor propagate untouched.

pub mod command;
pub mod value;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::subprocess::{Capture, Executor, ExecutorError, ProcessCommandBuilder, ProcessOutput};

/// Variable name to value, insertion order preserved.
pub type Variables = serde_json::Map<String, Value>;

/// Environment overrides applied on top of the inherited environment.
pub type Environment = HashMap<String, String>;

/// Backend configuration: either a settings file path passed through
/// as-is, or key/value settings formatted like variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BackendConfig {
    File(String),
    Map(serde_json::Map<String, Value>),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Map(serde_json::Map::new())
    }
}

pub struct Terraform {
    executor: Arc<dyn Executor>,
}

impl Terraform {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    pub async fn init(
        &self,
        chdir: Option<&str>,
        backend_config: &BackendConfig,
        reconfigure: bool,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(command::init(chdir, backend_config, reconfigure), environment)
            .await
    }

    pub async fn plan(
        &self,
        chdir: Option<&str>,
        vars: &Variables,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(command::plan(chdir, vars), environment).await
    }

    pub async fn apply(
        &self,
        chdir: Option<&str>,
        vars: &Variables,
        auto_approve: bool,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(command::apply(chdir, vars, auto_approve), environment)
            .await
    }

    pub async fn destroy(
        &self,
        chdir: Option<&str>,
        vars: &Variables,
        auto_approve: bool,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(command::destroy(chdir, vars, auto_approve), environment)
            .await
    }

    pub async fn validate(
        &self,
        chdir: Option<&str>,
        json: bool,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(command::validate(chdir, json), environment).await
    }

    pub async fn output(
        &self,
        chdir: Option<&str>,
        name: Option<&str>,
        json: bool,
        raw: bool,
        capture: Capture,
        environment: &Environment,
    ) -> Result<ProcessOutput, ExecutorError> {
        self.execute(command::output(chdir, name, json, raw), environment, capture)
            .await
    }

    pub async fn select_workspace(
        &self,
        workspace: &str,
        chdir: Option<&str>,
        or_create: bool,
        environment: &Environment,
    ) -> Result<(), ExecutorError> {
        self.run(
            command::select_workspace(chdir, workspace, or_create),
            environment,
        )
        .await
    }

    async fn run(&self, args: Vec<String>, environment: &Environment) -> Result<(), ExecutorError> {
        self.execute(args, environment, Capture::default())
            .await
            .map(|_| ())
    }

    async fn execute(
        &self,
        args: Vec<String>,
        environment: &Environment,
        capture: Capture,
    ) -> Result<ProcessOutput, ExecutorError> {
        let command = ProcessCommandBuilder::new(command::PROGRAM)
            .args(&args)
            .envs(environment)
            .capture(capture)
            .build();
        self.executor.execute(command).await
    }
}
