pub mod builder;
pub mod error;
pub mod mock;
pub mod runner;


pub use builder::ProcessCommandBuilder;
pub use error::ExecutorError;
pub use mock::{MockCommandConfig, MockExecutor};
pub use runner::{Capture, Executor, ProcessCommand, ProcessOutput, TokioExecutor};
