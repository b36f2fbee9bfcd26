/// Process adapters for external command-line tools
mod system_command_runner;

pub use system_command_runner::SystemCommandRunner;
