use super::Emitter;
use super::java::{JavaGenerator, RECEIVER};
use crate::ast::*;
use crate::error::GenerateError;

/// Whether `expr` is the bare receiver name
pub(super) fn is_receiver(expr: &Expr) -> bool {
    matches!(expr, Expr::Name(name) if name.id == RECEIVER)
}

impl JavaGenerator {
    pub(super) fn visit_expr(&self, expr: &Expr, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        match expr {
            Expr::BinOp(node) => self.visit_bin_op(node, out),
            Expr::Compare(node) => self.visit_compare(node, out),
            Expr::Name(node) => self.visit_name(node, out),
            Expr::Attribute(node) => self.visit_attribute(node, out),
            Expr::Call(node) => self.visit_call(node, out),
            Expr::Num(node) => out.write_text(&node.value.to_string()),
            Expr::Constant(node) => self.visit_constant(node, out),
        }
    }

    fn visit_bin_op(&self, node: &BinOp, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        let symbol = match node.op {
            BinOperator::Add => "+",
            BinOperator::Sub => "-",
            BinOperator::Mult => "*",
            // Java has no power operator
            BinOperator::Pow => {
                out.write_text("Math.pow(")?;
                self.visit_expr(&node.left, out)?;
                out.write_text(", ")?;
                self.visit_expr(&node.right, out)?;
                return out.write_text(")");
            }
            other => {
                return Err(GenerateError::UnhandledNodeKind {
                    kind: other.kind().to_string(),
                    span: node.span,
                });
            }
        };

        out.write_text("(")?;
        self.visit_expr(&node.left, out)?;
        out.write_text(&format!(" {} ", symbol))?;
        self.visit_expr(&node.right, out)?;
        out.write_text(")")
    }

    fn visit_compare(&self, node: &Compare, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        let (op, right) = match (node.ops.as_slice(), node.comparators.as_slice()) {
            ([op @ (CmpOperator::Lt | CmpOperator::Gt)], [right]) => (op, right),
            _ => {
                let operators = node.ops.iter().map(CmpOperator::symbol).collect::<Vec<_>>().join(" ");
                return Err(GenerateError::UnsupportedComparison { operators, span: node.span });
            }
        };

        out.write_text("(")?;
        self.visit_expr(&node.left, out)?;
        out.write_text(&format!(" {} ", op.symbol()))?;
        self.visit_expr(right, out)?;
        out.write_text(")")
    }

    fn visit_name(&self, node: &Name, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        if node.ctx != ExprContext::Load {
            return Err(GenerateError::UnsupportedContext {
                what: node.id.clone(),
                context: node.ctx,
                span: node.span,
            });
        }

        match node.id.as_str() {
            "int" => out.write_text("Integer"),
            id => out.write_text(id),
        }
    }

    fn visit_attribute(&self, node: &Attribute, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        if node.ctx != ExprContext::Load {
            return Err(GenerateError::UnsupportedContext {
                what: node.attr.clone(),
                context: node.ctx,
                span: node.span,
            });
        }
        self.visit_member(node, out)
    }

    /// `this.attr` for receiver members, `<qualifier>.attr` otherwise
    pub(super) fn visit_member(&self, node: &Attribute, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        if is_receiver(&node.value) {
            out.write_text("this.")?;
        } else {
            self.visit_expr(&node.value, out)?;
            out.write_text(".")?;
        }
        out.write_text(&node.attr)
    }

    fn visit_call(&self, node: &Call, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        if let (Expr::Name(func), [arg]) = (node.func.as_ref(), node.args.as_slice()) {
            if func.id == "int" {
                out.write_text("(int)(")?;
                self.visit_expr(arg, out)?;
                return out.write_text(")");
            }
        }

        self.visit_expr(&node.func, out)?;
        out.write_text("(")?;
        for (i, arg) in node.args.iter().enumerate() {
            if i > 0 {
                out.write_text(", ")?;
            }
            self.visit_expr(arg, out)?;
        }
        out.write_text(")")
    }

    fn visit_constant(&self, node: &Constant, out: &mut Emitter<'_>) -> Result<(), GenerateError> {
        out.write_text(match node.value {
            ConstantValue::True => "true",
            ConstantValue::False => "false",
            // Only meaningful as a return type
            ConstantValue::None => "void",
        })
    }
}
