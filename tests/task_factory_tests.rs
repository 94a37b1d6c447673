//! Integration tests for task construction: configuration resolution and
//! the init → workspace → operation command sequence.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use terraform_tasks::config;
use terraform_tasks::subprocess::MockExecutor;
use terraform_tasks::{BackendConfig, Context, Environment, Task, TaskFactory, Variables};

fn factory(mock: &MockExecutor) -> TaskFactory {
    TaskFactory::new(Arc::new(mock.clone()))
}

fn variables(value: Value) -> Variables {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

async fn invoke(task: &Task) -> anyhow::Result<Option<String>> {
    task.invoke(Context::default(), Map::new()).await
}

#[tokio::test]
async fn test_plan_invokes_init_before_plan() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.variables = variables(json!({"foo": 1}));
        configuration.init.backend_config =
            BackendConfig::Map(variables(json!({"path": "state_file.tfstate"})));
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    invoke(&plan).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[0].args,
        vec![
            "-chdir=/some/path",
            "init",
            "-backend-config=\"path=state_file.tfstate\""
        ]
    );
    assert_eq!(
        calls[1].args,
        vec!["-chdir=/some/path", "plan", "-var=\"foo=1\""]
    );
}

#[tokio::test]
async fn test_plan_does_not_select_workspace_when_not_set() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    invoke(&plan).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls
        .iter()
        .all(|call| !call.args.iter().any(|arg| arg == "workspace")));
}

#[tokio::test]
async fn test_plan_selects_workspace_with_or_create_when_set() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.workspace = Some("staging".to_string());
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    invoke(&plan).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[1].args,
        vec![
            "-chdir=/some/path",
            "workspace",
            "select",
            "-or-create=true",
            "staging"
        ]
    );
    assert_eq!(calls[2].args, vec!["-chdir=/some/path", "plan"]);
}

#[tokio::test]
async fn test_plan_initialises_with_reconfigure() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.init.reconfigure = true;
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    invoke(&plan).await.unwrap();

    assert_eq!(
        mock.calls()[0].args,
        vec!["-chdir=/some/path", "init", "-reconfigure"]
    );
}

#[tokio::test]
async fn test_environment_is_used_in_every_command() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.workspace = Some("staging".to_string());
        configuration.environment = Some(Environment::from([(
            "ENV_VAR".to_string(),
            "value".to_string(),
        )]));
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    invoke(&plan).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls.len(), 3);
    for call in &calls {
        assert_eq!(call.env.get("ENV_VAR"), Some(&"value".to_string()));
    }
}

#[tokio::test]
async fn test_apply_auto_approves_by_default() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.variables = variables(json!({"foo": 1}));
        Ok(())
    });

    let apply = factory(&mock).create_apply_task(configure, vec![]);
    invoke(&apply).await.unwrap();

    assert_eq!(
        mock.calls()[1].args,
        vec![
            "-chdir=/some/path",
            "apply",
            "-var=\"foo=1\"",
            "-auto-approve"
        ]
    );
}

#[tokio::test]
async fn test_apply_omits_auto_approve_when_disabled() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.auto_approve = false;
        Ok(())
    });

    let apply = factory(&mock).create_apply_task(configure, vec![]);
    invoke(&apply).await.unwrap();

    assert_eq!(mock.calls()[1].args, vec!["apply"]);
}

#[tokio::test]
async fn test_destroy_invokes_init_then_destroy() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.variables = variables(json!({"foo": 1}));
        Ok(())
    });

    let destroy = factory(&mock).create_destroy_task(configure, vec![]);
    invoke(&destroy).await.unwrap();

    let calls = mock.calls();
    assert_eq!(calls[0].args, vec!["-chdir=/some/path", "init"]);
    assert_eq!(
        calls[1].args,
        vec![
            "-chdir=/some/path",
            "destroy",
            "-var=\"foo=1\"",
            "-auto-approve"
        ]
    );
}

#[tokio::test]
async fn test_validate_passes_json_flag() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.validate.json = true;
        Ok(())
    });

    let validate = factory(&mock).create_validate_task(configure, vec![]);
    invoke(&validate).await.unwrap();

    assert_eq!(mock.calls()[1].args, vec!["validate", "-json"]);
}

#[tokio::test]
async fn test_output_returns_trimmed_captured_stdout() {
    let mock = MockExecutor::new();
    mock.expect_command("terraform")
        .with_args(|args| args.iter().any(|arg| arg == "output"))
        .returns_stdout("output_value\n")
        .finish();

    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.source_directory = Some("/some/path".to_string());
        configuration.output.capture_stdout = true;
        Ok(())
    });

    let output = factory(&mock).create_output_task(configure, vec![]);
    let value = invoke(&output).await.unwrap();

    assert_eq!(value, Some("output_value".to_string()));
}

#[tokio::test]
async fn test_output_returns_nothing_without_capture() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.output.name = Some("vpc_id".to_string());
        configuration.output.json = true;
        Ok(())
    });

    let output = factory(&mock).create_output_task(configure, vec![]);
    let value = invoke(&output).await.unwrap();

    assert_eq!(value, None);
    assert_eq!(mock.calls()[1].args, vec!["output", "vpc_id", "-json"]);
}

#[tokio::test]
async fn test_failed_init_stops_the_sequence() {
    let mock = MockExecutor::new();
    mock.expect_command("terraform")
        .with_args(|args| args.iter().any(|arg| arg == "init"))
        .returns_exit_code(1)
        .finish();

    let configure = config::configure(|_context, _arguments, configuration| {
        configuration.workspace = Some("staging".to_string());
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    let result = invoke(&plan).await;

    assert!(result.is_err());
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_configure_receives_task_arguments() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, arguments, configuration| {
        configuration.workspace = arguments.get_str("workspace").map(String::from);
        Ok(())
    });

    let plan = factory(&mock).create_plan_task(
        configure,
        vec![terraform_tasks::Parameter::new("workspace", "staging")],
    );
    invoke(&plan).await.unwrap();

    assert_eq!(
        mock.calls()[1].args,
        vec!["workspace", "select", "-or-create=true", "staging"]
    );
}

#[tokio::test]
async fn test_configure_errors_fail_the_invocation_before_any_command() {
    let mock = MockExecutor::new();
    let configure = config::configure(|_context, _arguments, _configuration| {
        anyhow::bail!("missing region")
    });

    let plan = factory(&mock).create_plan_task(configure, vec![]);
    let result = invoke(&plan).await;

    assert_eq!(result.unwrap_err().to_string(), "missing region");
    assert!(mock.calls().is_empty());
}
