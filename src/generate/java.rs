use super::{Emitter, GenerateOptions, Generator, IndentMode, TypeMapper};
use crate::ast::*;
use crate::error::GenerateError;

/// Name of the implicit instance parameter
pub(super) const RECEIVER: &str = "self";
/// Methods with this name become constructors
const INITIALIZER: &str = "__init__";
/// Decorator that makes a method `static`
const STATIC_MARKER: &str = "staticmethod";

/// Generates Java source from a Python class
pub struct JavaGenerator {
    options: GenerateOptions,
    types: TypeMapper,
}

/// Where the traversal currently is
#[derive(Debug, Clone, Copy)]
pub(super) struct Frame<'a> {
    class_name: Option<&'a str>,
    depth: usize,
}

impl<'a> Frame<'a> {
    fn root() -> Self {
        Self { class_name: None, depth: 0 }
    }

    /// One block level deeper
    pub(super) fn nested(self) -> Self {
        Self { depth: self.depth + 1, ..self }
    }

    fn in_class<'b>(&self, name: &'b str) -> Frame<'b> {
        Frame { class_name: Some(name), depth: self.depth }
    }
}

impl JavaGenerator {
    pub fn new(options: GenerateOptions) -> Self {
        Self {
            options,
            types: TypeMapper::new(),
        }
    }

    pub(super) fn types(&self) -> &TypeMapper {
        &self.types
    }

    /// Write the indentation for a line belonging to the node at `span`
    pub(super) fn indent(&self, out: &mut Emitter<'_>, span: Span, frame: Frame<'_>) -> Result<(), GenerateError> {
        let width = match self.options.indent {
            IndentMode::SourceColumn => span.col_offset(),
            IndentMode::Structural { width } => frame.depth * width,
        };
        out.write_text(&" ".repeat(width))
    }

    /// Indent and record where the statement at `span` begins
    pub(super) fn start(&self, out: &mut Emitter<'_>, span: Span, frame: Frame<'_>) -> Result<(), GenerateError> {
        self.indent(out, span, frame)?;
        out.map_source(span);
        Ok(())
    }

    pub(super) fn visit_block(&self, body: &[Stmt], out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        for stmt in body {
            self.visit_stmt(stmt, out, frame)?;
        }
        Ok(())
    }

    pub(super) fn visit_stmt(&self, stmt: &Stmt, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        tracing::trace!(kind = stmt.kind(), line = stmt.span().start.line + 1, "visit");
        match stmt {
            Stmt::ClassDef(node) => self.visit_class_def(node, out, frame),
            Stmt::FunctionDef(node) => self.visit_function_def(node, out, frame),
            Stmt::If(node) => self.visit_if(node, out, frame),
            Stmt::Assign(node) => self.visit_assign(node, out, frame),
            Stmt::AnnAssign(node) => self.visit_ann_assign(node, out, frame),
            Stmt::Return(node) => self.visit_return(node, out, frame),
            Stmt::Expr(node) => self.visit_expr_stmt(node, out, frame),
        }
    }

    fn visit_module(&self, module: &Module, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        self.visit_block(&module.body, out, Frame::root())
    }

    fn visit_class_def(&self, node: &ClassDef, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        tracing::debug!(class = %node.name, members = node.body.len(), "class");
        self.start(out, node.span, frame)?;
        out.write_text(&format!("public class {} {{\n", node.name))?;

        let members = frame.in_class(&node.name).nested();
        for (i, member) in node.body.iter().enumerate() {
            if i > 0 {
                out.newline()?;
            }
            self.visit_stmt(member, out, members)?;
        }

        self.indent(out, node.span, frame)?;
        out.write_text("}\n")
    }

    fn visit_function_def(&self, node: &FunctionDef, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        if node.name == INITIALIZER {
            self.visit_constructor(node, out, frame)
        } else {
            self.visit_method(node, out, frame)
        }
    }

    /// Fields for every constructor parameter, then the constructor itself
    fn visit_constructor(&self, node: &FunctionDef, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        let class_name = self.constructor_name(node, frame)?;
        let params = self.parameters(node)?;
        tracing::debug!(class = %class_name, fields = params.len(), "constructor");

        for (ty, name) in &params {
            self.start(out, node.span, frame)?;
            out.write_text(&format!("{} {};\n", ty, name))?;
        }
        if !params.is_empty() {
            out.newline()?;
        }

        self.start(out, node.span, frame)?;
        out.write_text(&format!("public {}({}) {{\n", class_name, signature(&params)))?;
        self.visit_block(&node.body, out, frame.nested())?;
        self.indent(out, node.span, frame)?;
        out.write_text("}\n")
    }

    fn visit_method(&self, node: &FunctionDef, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        let is_static = node
            .decorators
            .iter()
            .any(|decorator| matches!(decorator, Expr::Name(name) if name.id == STATIC_MARKER));
        let returns = self.types.render_return(node.returns.as_ref())?;
        let params = self.parameters(node)?;
        tracing::debug!(method = %node.name, is_static, params = params.len(), "method");

        self.start(out, node.span, frame)?;
        out.write_text(if is_static { "public static " } else { "public " })?;
        out.write_text(&format!("{} {}({}) {{\n", returns, node.name, signature(&params)))?;
        self.visit_block(&node.body, out, frame.nested())?;
        self.indent(out, node.span, frame)?;
        out.write_text("}\n")
    }

    /// The receiver's declared type, or the enclosing class when it has none
    fn constructor_name(&self, node: &FunctionDef, frame: Frame<'_>) -> Result<String, GenerateError> {
        let receiver = node.params.iter().find(|param| param.name == RECEIVER);
        match receiver.and_then(|param| param.annotation.as_ref()) {
            Some(Annotation::Name { id, .. }) => Ok(id.clone()),
            Some(other) => Err(GenerateError::UnsupportedAnnotationShape {
                shape: other.to_string(),
                span: other.span(),
            }),
            None => frame.class_name.map(str::to_string).ok_or_else(|| {
                GenerateError::UnsupportedAnnotationShape {
                    shape: format!("{} without annotation", RECEIVER),
                    span: receiver.map_or(node.span, |param| param.span),
                }
            }),
        }
    }

    /// Mapped `(type, name)` of every parameter except the receiver
    fn parameters<'n>(&self, node: &'n FunctionDef) -> Result<Vec<(String, &'n str)>, GenerateError> {
        node.params
            .iter()
            .filter(|param| param.name != RECEIVER)
            .map(|param| {
                let annotation = param.annotation.as_ref().ok_or_else(|| {
                    GenerateError::UnsupportedAnnotationShape {
                        shape: format!("{} without annotation", param.name),
                        span: param.span,
                    }
                })?;
                Ok((self.types.render(annotation)?, param.name.as_str()))
            })
            .collect()
    }
}

impl Generator for JavaGenerator {
    #[tracing::instrument(skip_all, fields(statements = module.body.len()))]
    fn generate(&self, module: &Module, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        self.visit_module(module, out)
    }
}

impl Default for JavaGenerator {
    fn default() -> Self {
        Self::new(GenerateOptions::default())
    }
}

fn signature(params: &[(String, &str)]) -> String {
    params
        .iter()
        .map(|(ty, name)| format!("{} {}", ty, name))
        .collect::<Vec<_>>()
        .join(", ")
}
