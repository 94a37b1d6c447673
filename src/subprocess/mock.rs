use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::error::ExecutorError;
use super::runner::{Executor, ProcessCommand, ProcessOutput};

/// Scripted executor for tests. Commands matching a registered expectation
/// return the stubbed output; anything else succeeds with no output, so
/// orchestration tests only stub the calls they assert on. Every call is
/// recorded in order.
#[derive(Clone, Default)]
pub struct MockExecutor {
    expectations: Arc<Mutex<Vec<MockExpectation>>>,
    call_history: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct MockExpectation {
    program: String,
    #[allow(clippy::type_complexity)]
    args_matcher: Option<Box<dyn Fn(&[String]) -> bool + Send + Sync>>,
    stdout: String,
    stderr: String,
    exit_code: i32,
    times_called: usize,
    expected_times: Option<usize>,
}

pub struct MockCommandConfig {
    runner: MockExecutor,
    expectation: MockExpectation,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_command(&self, program: &str) -> MockCommandConfig {
        MockCommandConfig {
            runner: self.clone(),
            expectation: MockExpectation {
                program: program.to_string(),
                args_matcher: None,
                stdout: String::new(),
                stderr: String::new(),
                exit_code: 0,
                times_called: 0,
                expected_times: None,
            },
        }
    }

    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        let history = self.call_history.lock().unwrap();
        let count = history.iter().filter(|cmd| cmd.program == program).count();
        count == times
    }

    pub fn reset(&self) {
        self.expectations.lock().unwrap().clear();
        self.call_history.lock().unwrap().clear();
    }
}

#[async_trait]
impl Executor for MockExecutor {
    async fn execute(&self, command: ProcessCommand) -> Result<ProcessOutput, ExecutorError> {
        self.call_history.lock().unwrap().push(command.clone());

        let mut expectations = self.expectations.lock().unwrap();

        for expectation in expectations.iter_mut() {
            if expectation.program != command.program {
                continue;
            }

            if let Some(ref args_matcher) = expectation.args_matcher {
                if !(args_matcher)(&command.args) {
                    continue;
                }
            }

            expectation.times_called += 1;

            if let Some(expected) = expectation.expected_times {
                if expectation.times_called > expected {
                    return Err(ExecutorError::MockExpectationNotMet(format!(
                        "Command '{}' called {} times, expected {}",
                        command.program, expectation.times_called, expected
                    )));
                }
            }

            if expectation.exit_code != 0 {
                return Err(ExecutorError::ExitCode(expectation.exit_code));
            }

            return Ok(ProcessOutput {
                stdout: command.capture.stdout.then(|| expectation.stdout.clone()),
                stderr: command.capture.stderr.then(|| expectation.stderr.clone()),
            });
        }

        Ok(ProcessOutput {
            stdout: command.capture.stdout.then(String::new),
            stderr: command.capture.stderr.then(String::new),
        })
    }
}

impl MockCommandConfig {
    pub fn with_args<F>(mut self, matcher: F) -> Self
    where
        F: Fn(&[String]) -> bool + Send + Sync + 'static,
    {
        self.expectation.args_matcher = Some(Box::new(matcher));
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.expectation.stdout = stdout.to_string();
        self
    }

    pub fn returns_stderr(mut self, stderr: &str) -> Self {
        self.expectation.stderr = stderr.to_string();
        self
    }

    pub fn returns_exit_code(mut self, code: i32) -> Self {
        self.expectation.exit_code = code;
        self
    }

    pub fn times(mut self, n: usize) -> Self {
        self.expectation.expected_times = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner
            .expectations
            .lock()
            .unwrap()
            .push(self.expectation);
    }
}
