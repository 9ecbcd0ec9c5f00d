use super::Emitter;
use super::expr::is_receiver;
use super::java::{Frame, JavaGenerator};
use crate::ast::*;
use crate::error::GenerateError;

impl JavaGenerator {
    pub(super) fn visit_if(&self, node: &If, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        self.start(out, node.span, frame)?;
        out.write_text("if (")?;
        self.visit_expr(&node.test, out)?;
        out.write_text(") {\n")?;
        self.visit_block(&node.body, out, frame.nested())?;
        self.indent(out, node.span, frame)?;
        out.write_text("}")?;

        if !node.orelse.is_empty() {
            out.write_text(" else {\n")?;
            self.visit_block(&node.orelse, out, frame.nested())?;
            self.indent(out, node.span, frame)?;
            out.write_text("}")?;
        }
        out.newline()
    }

    pub(super) fn visit_return(&self, node: &Return, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        self.start(out, node.span, frame)?;
        match &node.value {
            Some(value) => {
                out.write_text("return ")?;
                self.visit_expr(value, out)?;
            }
            None => out.write_text("return")?,
        }
        out.write_text(";\n")
    }

    pub(super) fn visit_assign(&self, node: &Assign, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        self.start(out, node.span, frame)?;
        self.visit_target(&node.target, out)?;
        out.write_text(" = ")?;
        self.visit_expr(&node.value, out)?;
        out.write_text(";\n")
    }

    /// Declaration with initializer. Receiver members are already declared as fields.
    pub(super) fn visit_ann_assign(&self, node: &AnnAssign, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        let declared = self.types().render(&node.annotation)?;
        let is_field = matches!(&node.target, Expr::Attribute(attr) if is_receiver(&attr.value));

        self.start(out, node.span, frame)?;
        if !is_field {
            out.write_text(&declared)?;
            out.write_text(" ")?;
        }
        self.visit_target(&node.target, out)?;
        out.write_text(" = ")?;
        self.visit_expr(&node.value, out)?;
        out.write_text(";\n")
    }

    pub(super) fn visit_expr_stmt(&self, node: &ExprStmt, out: &mut Emitter<'_>, frame: Frame<'_>) -> Result<(), GenerateError> {
        self.start(out, node.span, frame)?;
        self.visit_expr(&node.value, out)?;
        out.write_text(";\n")
    }

    /// Left-hand side of an assignment: a bare name or a member
    fn visit_target(&self, target: &Expr, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        match target {
            Expr::Name(name) => out.write_text(&name.id),
            Expr::Attribute(attr) => self.visit_member(attr, out),
            other => Err(GenerateError::UnsupportedContext {
                what: other.kind().to_string(),
                context: ExprContext::Store,
                span: other.span(),
            }),
        }
    }
}
