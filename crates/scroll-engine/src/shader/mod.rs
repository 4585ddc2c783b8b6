//! Shader loading, compilation and linking.
//!
//! Each stage lives in its own WGSL source. Stages are parsed and validated on
//! the CPU with naga before wgpu ever sees them, so a bad shader is reported
//! as a `ShaderError` with a rendered diagnostic instead of a device panic.

mod compile;
mod error;
mod program;
mod source;

pub use compile::{compile_stage, link, CompiledStage, LinkedProgram};
pub use error::ShaderError;
pub use program::ShaderProgram;
pub use source::{ShaderSource, ShaderStage};
