//! Fluent, immutable builder for named Terraform task collections.
//!
//! Every `with_*` method returns a new builder and leaves the receiver
//! untouched, so partially-configured builders can be branched and reused
//! safely.

use std::collections::HashMap;

use crate::config::{self, Configuration, ConfigureFn};
use crate::factory::{TaskFactory, TaskName};
use crate::tasks::{Arguments, Collection, Context, Parameter};

#[derive(Clone, Default)]
pub struct TaskCollectionBuilder {
    configuration_name: Option<String>,
    global_parameters: Vec<Parameter>,
    global_configure: Option<ConfigureFn>,
    extra_parameters: HashMap<TaskName, Vec<Parameter>>,
    overridden_parameters: HashMap<TaskName, Vec<Parameter>>,
    extra_configure: HashMap<TaskName, ConfigureFn>,
    overridden_configure: HashMap<TaskName, ConfigureFn>,
    factory: TaskFactory,
}

impl TaskCollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder backed by a specific factory (and through it, executor).
    pub fn with_factory(factory: TaskFactory) -> Self {
        Self {
            factory,
            ..Self::default()
        }
    }

    pub fn for_configuration(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.configuration_name = Some(name.to_string());
        next
    }

    pub fn with_global_parameters(&self, parameters: Vec<Parameter>) -> Self {
        let mut next = self.clone();
        next.global_parameters = parameters;
        next
    }

    pub fn with_global_configure<F>(&self, configure: F) -> Self
    where
        F: Fn(&Context, &Arguments, &mut Configuration) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        let mut next = self.clone();
        next.global_configure = Some(config::configure(configure));
        next
    }

    /// Appends task-specific parameters after the global list.
    pub fn with_extra_task_parameters(&self, task: TaskName, parameters: Vec<Parameter>) -> Self {
        let mut next = self.clone();
        next.extra_parameters.insert(task, parameters);
        next
    }

    /// Replaces the global parameter list (and any extras) for one task.
    pub fn with_overridden_task_parameters(
        &self,
        task: TaskName,
        parameters: Vec<Parameter>,
    ) -> Self {
        let mut next = self.clone();
        next.overridden_parameters.insert(task, parameters);
        next
    }

    /// Chains a task-specific configure callback after the global one.
    pub fn with_extra_task_configure<F>(&self, task: TaskName, configure: F) -> Self
    where
        F: Fn(&Context, &Arguments, &mut Configuration) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        let mut next = self.clone();
        next.extra_configure.insert(task, config::configure(configure));
        next
    }

    /// Replaces the global configure callback entirely for one task.
    pub fn with_overridden_task_configure<F>(&self, task: TaskName, configure: F) -> Self
    where
        F: Fn(&Context, &Arguments, &mut Configuration) -> anyhow::Result<()>
            + Send
            + Sync
            + 'static,
    {
        let mut next = self.clone();
        next.overridden_configure
            .insert(task, config::configure(configure));
        next
    }

    /// Materializes the collection: all five operation tasks, each with
    /// its effective parameter list and configure chain.
    pub fn create(&self) -> Collection {
        let name = self.configuration_name.clone().unwrap_or_default();
        let mut collection = Collection::new(&name);

        for task_name in TaskName::ALL {
            let parameters = self.effective_parameters(task_name);
            let configure = self.effective_configure(task_name);
            let task = match task_name {
                TaskName::Validate => self.factory.create_validate_task(configure, parameters),
                TaskName::Plan => self.factory.create_plan_task(configure, parameters),
                TaskName::Apply => self.factory.create_apply_task(configure, parameters),
                TaskName::Destroy => self.factory.create_destroy_task(configure, parameters),
                TaskName::Output => self.factory.create_output_task(configure, parameters),
            };
            collection.add_task(task);
        }

        collection
    }

    fn effective_parameters(&self, task: TaskName) -> Vec<Parameter> {
        if let Some(overridden) = self.overridden_parameters.get(&task) {
            return overridden.clone();
        }

        let mut parameters = self.global_parameters.clone();
        if let Some(extra) = self.extra_parameters.get(&task) {
            parameters.extend(extra.iter().cloned());
        }
        parameters
    }

    fn effective_configure(&self, task: TaskName) -> ConfigureFn {
        if let Some(overridden) = self.overridden_configure.get(&task) {
            return overridden.clone();
        }

        let global = self.global_configure.clone().unwrap_or_else(config::noop);
        match self.extra_configure.get(&task) {
            Some(extra) => config::compose(global, extra.clone()),
            None => global,
        }
    }
}
