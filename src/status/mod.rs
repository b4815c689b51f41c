//! Application status and user environment output.

pub mod env;
pub mod writer;

pub use env::{EnvVarSink, RecordingEnvSink, RegistryEnvSink, UNKNOWN_VALUE};
pub use writer::{AppStatusWriter, NOT_INSTALLED};
