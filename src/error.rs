//! Error types for the height-field pipeline.
//!
//! Compile errors are recovered locally (the previous program stays mounted), while
//! project, export and GPU errors propagate to whoever started the operation.

use std::path::PathBuf;

use thiserror::Error;

pub use crate::registry::RegistryError;

/// The GPU program compiler rejected a synthesized height program.
#[derive(Debug, Clone, Error)]
#[error("{diagnostic}")]
pub struct CompileError {
    pub diagnostic: String,
}

impl CompileError {
    pub fn new(diagnostic: impl Into<String>) -> Self {
        Self {
            diagnostic: diagnostic.into(),
        }
    }
}

/// A project file could not be understood.
#[derive(Debug, Error)]
pub enum ProjectFormatError {
    #[error("line {line}: content before the first section header: {content:?}")]
    ContentBeforeHeader { line: usize, content: String },

    #[error("line {line}: unknown section header {header:?}")]
    UnknownSection { line: usize, header: String },

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("invalid symbol table: {0}")]
    Registry(#[from] RegistryError),
}

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("failed to access project file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed project file: {0}")]
    Format(#[from] ProjectFormatError),
}

#[derive(Debug, Error)]
pub enum GpuError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(String),

    #[error("failed to create GPU device: {0}")]
    Device(String),

    #[error("grid buffer readback failed: {0}")]
    Readback(String),

    #[error("no compiled height program is mounted")]
    NoProgram,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write mesh {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("height buffer holds {available} samples but detail {detail} needs {required}")]
    ShortBuffer {
        detail: u32,
        available: usize,
        required: usize,
    },

    #[error(transparent)]
    Gpu(#[from] GpuError),
}
