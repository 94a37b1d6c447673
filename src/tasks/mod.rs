//! Interface to the task-runner framework the collections plug into:
//! named tasks with declared, defaulted, help-documented arguments,
//! grouped into named collections.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Declarative description of a task argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub default: Value,
    pub help: Option<String>,
}

impl Parameter {
    pub fn new(name: &str, default: impl Into<Value>) -> Self {
        Self {
            name: name.to_string(),
            default: default.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}

/// Invocation context supplied by the task runner.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: Map<String, Value>,
}

/// Argument values for one task invocation: parameter defaults overlaid
/// with whatever the caller supplied.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }
}

pub type TaskBody =
    Arc<dyn Fn(Context, Arguments) -> BoxFuture<'static, anyhow::Result<Option<String>>> + Send + Sync>;

/// A runnable, introspectable task: a name, its declared parameters, and
/// a body invoked with the resolved arguments.
#[derive(Clone)]
pub struct Task {
    name: String,
    parameters: Vec<Parameter>,
    body: TaskBody,
}

impl Task {
    pub fn new<F>(name: &str, parameters: Vec<Parameter>, body: F) -> Self
    where
        F: Fn(Context, Arguments) -> BoxFuture<'static, anyhow::Result<Option<String>>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.to_string(),
            parameters,
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Runs the task. Declared parameters contribute their defaults;
    /// `overrides` wins where both are present.
    pub async fn invoke(
        &self,
        context: Context,
        overrides: Map<String, Value>,
    ) -> anyhow::Result<Option<String>> {
        let mut values = Map::new();
        for parameter in &self.parameters {
            values.insert(parameter.name.clone(), parameter.default.clone());
        }
        for (name, value) in overrides {
            values.insert(name, value);
        }
        (self.body)(context, Arguments::new(values)).await
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// An ordered, named group of tasks.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    name: String,
    tasks: Vec<Task>,
}

impl Collection {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.name == name)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}
