//! Builds the runnable task for each operation: resolve the configuration,
//! run init (and workspace selection when configured), then the primary
//! action.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::config::{self, Configuration, ConfigureFn};
use crate::subprocess::{Capture, Executor, TokioExecutor};
use crate::tasks::{Parameter, Task};
use crate::terraform::Terraform;

/// The five operations every collection exposes, in listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskName {
    Validate,
    Plan,
    Apply,
    Destroy,
    Output,
}

impl TaskName {
    pub const ALL: [TaskName; 5] = [
        TaskName::Validate,
        TaskName::Plan,
        TaskName::Apply,
        TaskName::Destroy,
        TaskName::Output,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskName::Validate => "validate",
            TaskName::Plan => "plan",
            TaskName::Apply => "apply",
            TaskName::Destroy => "destroy",
            TaskName::Output => "output",
        }
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct TaskFactory {
    executor: Arc<dyn Executor>,
}

impl Default for TaskFactory {
    fn default() -> Self {
        Self::new(Arc::new(TokioExecutor))
    }
}

impl TaskFactory {
    pub fn new(executor: Arc<dyn Executor>) -> Self {
        Self { executor }
    }

    pub fn create_plan_task(&self, configure: ConfigureFn, parameters: Vec<Parameter>) -> Task {
        self.create_task(TaskName::Plan, configure, parameters, |terraform, configuration| async move {
            terraform
                .plan(
                    configuration.source_directory.as_deref(),
                    &configuration.variables,
                    &configuration.resolved_environment(),
                )
                .await?;
            Ok(None)
        })
    }

    pub fn create_apply_task(&self, configure: ConfigureFn, parameters: Vec<Parameter>) -> Task {
        self.create_task(TaskName::Apply, configure, parameters, |terraform, configuration| async move {
            terraform
                .apply(
                    configuration.source_directory.as_deref(),
                    &configuration.variables,
                    configuration.auto_approve,
                    &configuration.resolved_environment(),
                )
                .await?;
            Ok(None)
        })
    }

    pub fn create_destroy_task(&self, configure: ConfigureFn, parameters: Vec<Parameter>) -> Task {
        self.create_task(TaskName::Destroy, configure, parameters, |terraform, configuration| async move {
            terraform
                .destroy(
                    configuration.source_directory.as_deref(),
                    &configuration.variables,
                    configuration.auto_approve,
                    &configuration.resolved_environment(),
                )
                .await?;
            Ok(None)
        })
    }

    pub fn create_validate_task(&self, configure: ConfigureFn, parameters: Vec<Parameter>) -> Task {
        self.create_task(TaskName::Validate, configure, parameters, |terraform, configuration| async move {
            terraform
                .validate(
                    configuration.source_directory.as_deref(),
                    configuration.validate.json,
                    &configuration.resolved_environment(),
                )
                .await?;
            Ok(None)
        })
    }

    /// The only task with a return value: when stdout capture is
    /// configured, the captured text is trimmed and returned.
    pub fn create_output_task(&self, configure: ConfigureFn, parameters: Vec<Parameter>) -> Task {
        self.create_task(TaskName::Output, configure, parameters, |terraform, configuration| async move {
            let capture = Capture {
                stdout: configuration.output.capture_stdout,
                stderr: false,
            };
            let result = terraform
                .output(
                    configuration.source_directory.as_deref(),
                    configuration.output.name.as_deref(),
                    configuration.output.json,
                    configuration.output.raw,
                    capture,
                    &configuration.resolved_environment(),
                )
                .await?;
            Ok(result.stdout.map(|stdout| stdout.trim().to_string()))
        })
    }

    fn create_task<Run, Fut>(
        &self,
        name: TaskName,
        configure: ConfigureFn,
        parameters: Vec<Parameter>,
        run: Run,
    ) -> Task
    where
        Run: Fn(Terraform, Configuration) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Option<String>>> + Send + 'static,
    {
        let executor = Arc::clone(&self.executor);
        let run = Arc::new(run);
        Task::new(name.as_str(), parameters, move |context, arguments| {
            let executor = Arc::clone(&executor);
            let configure = Arc::clone(&configure);
            let run = Arc::clone(&run);
            Box::pin(async move {
                let configuration = config::resolve(&configure, &context, &arguments)?;
                tracing::debug!("resolved configuration for {} task", name);
                let terraform = Terraform::new(executor);
                prepare(&terraform, &configuration).await?;
                run(terraform, configuration).await
            })
        })
    }
}

// Mandatory pre-steps for every operation: init always, workspace
// selection only when a workspace is configured. A failure here stops the
// sequence before the primary action runs.
async fn prepare(terraform: &Terraform, configuration: &Configuration) -> anyhow::Result<()> {
    let chdir = configuration.source_directory.as_deref();
    let environment = configuration.resolved_environment();

    terraform
        .init(
            chdir,
            &configuration.init.backend_config,
            configuration.init.reconfigure,
            &environment,
        )
        .await?;

    if let Some(workspace) = &configuration.workspace {
        terraform
            .select_workspace(workspace, chdir, true, &environment)
            .await?;
    }

    Ok(())
}
