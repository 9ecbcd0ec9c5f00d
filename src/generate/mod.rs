mod java;
mod stmt;
mod expr;
mod output;
mod types;

pub use java::JavaGenerator;
pub use output::{Destination, Emitter, FileDestination, Mapping};
pub use types::TypeMapper;

use crate::ast::Module;
use crate::error::GenerateError;

/// How statement indentation is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentMode {
    /// Copy each statement's source column offset verbatim
    #[default]
    SourceColumn,
    /// `width` spaces per level of block nesting
    Structural { width: usize },
}

/// Generator options
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub indent: IndentMode,
}

/// Generation result
#[derive(Debug, Clone, serde::Serialize)]
pub struct GenerateResult {
    pub code: String,
    pub mappings: Vec<Mapping>,
}

/// Generator trait - writes target code for a module into an emitter
pub trait Generator {
    fn generate(&self, module: &Module, out: &mut Emitter<'_>) -> Result<(), GenerateError>;
}
