//! pyjava transpiler: compiles a class written in a small Python subset to Java source.
//!
//! ```text
//! Python source --PythonParser--> ast::Module --JavaGenerator--> Emitter --> Destination
//! ```
//!
//! The generator works on any [`ast::Module`], whether parsed or built by hand.

pub mod ast;
pub mod error;
pub mod generate;
pub mod parser;

use std::path::Path;

pub use ast::Module;
pub use error::{CompileError, ErrorKind, GenerateError, ParseError};
pub use generate::{
    Destination, Emitter, FileDestination, GenerateOptions, GenerateResult, Generator, IndentMode,
    JavaGenerator, Mapping, TypeMapper,
};
pub use parser::{Parser, PythonParser};

/// Generate Java for `module` into memory
pub fn generate(module: &Module, options: &GenerateOptions) -> Result<GenerateResult, GenerateError> {
    let mut code = String::new();
    let mut out = Emitter::new(&mut code);
    JavaGenerator::new(options.clone()).generate(module, &mut out)?;
    let mappings = out.finish()?;
    Ok(GenerateResult { code, mappings })
}

/// Generate Java for `module` into the file at `path`.
///
/// The file is truncated first. On error it keeps whatever was written before the failure.
pub fn generate_to_path(
    module: &Module,
    path: impl AsRef<Path>,
    options: &GenerateOptions,
) -> Result<Vec<Mapping>, GenerateError> {
    let mut file = FileDestination::create(path)?;
    tracing::debug!(path = %file.path().display(), "writing");
    let mut out = Emitter::new(&mut file);
    JavaGenerator::new(options.clone()).generate(module, &mut out)?;
    out.finish()
}

/// Parse Python source and generate Java with default options
pub fn transpile(source: &str) -> Result<GenerateResult, CompileError> {
    transpile_with(source, &GenerateOptions::default())
}

/// Parse Python source and generate Java
pub fn transpile_with(source: &str, options: &GenerateOptions) -> Result<GenerateResult, CompileError> {
    let module = PythonParser::new().parse(source)?;
    Ok(generate(&module, options)?)
}
