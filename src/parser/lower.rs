//! Lowering of the tree-sitter concrete tree into `ast` nodes.

use tree_sitter::Node;

use super::span_of;
use crate::ast::*;
use crate::error::{ErrorKind, ParseError};

pub(super) struct Lowering<'s> {
    source: &'s str,
}

impl<'s> Lowering<'s> {
    pub(super) fn new(source: &'s str) -> Self {
        Self { source }
    }

    pub(super) fn module(&self, root: Node<'_>) -> Result<Module, ParseError> {
        let mut body = Vec::new();
        for child in named_children(root) {
            match child.kind() {
                "import_statement" | "import_from_statement" | "future_import_statement" => continue,
                _ if self.is_noop(child) => continue,
                _ => body.push(self.statement(child)?),
            }
        }
        Ok(Module { body, span: span_of(root) })
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        &self.source[node.byte_range()]
    }

    fn field<'t>(&self, node: Node<'t>, name: &str) -> Result<Node<'t>, ParseError> {
        node.child_by_field_name(name).ok_or_else(|| {
            ParseError::new(
                ErrorKind::InvalidSyntax,
                format!("`{}` is missing its {}", node.kind(), name),
                span_of(node),
            )
        })
    }

    /// `pass` and docstrings produce no output
    fn is_noop(&self, node: Node<'_>) -> bool {
        match node.kind() {
            "pass_statement" => true,
            "expression_statement" => matches!(
                named_children(node).as_slice(),
                [only] if matches!(only.kind(), "string" | "concatenated_string")
            ),
            _ => false,
        }
    }

    fn block(&self, node: Node<'_>) -> Result<Vec<Stmt>, ParseError> {
        named_children(node)
            .into_iter()
            .filter(|child| !self.is_noop(*child))
            .map(|child| self.statement(child))
            .collect()
    }

    fn statement(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        match node.kind() {
            "class_definition" => self.class_def(node),
            "function_definition" => self.function_def(node, Vec::new()).map(Stmt::FunctionDef),
            "decorated_definition" => self.decorated(node),
            "if_statement" => self.if_statement(node),
            "return_statement" => self.return_statement(node),
            "expression_statement" => self.expression_statement(node),
            kind => Err(unhandled(node, kind)),
        }
    }

    fn class_def(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let name = self.text(self.field(node, "name")?).to_string();
        let body = self.block(self.field(node, "body")?)?;
        Ok(Stmt::ClassDef(ClassDef { name, body, span: span_of(node) }))
    }

    fn decorated(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let decorators = named_children(node)
            .into_iter()
            .filter(|child| child.kind() == "decorator")
            .map(|decorator| match named_children(decorator).as_slice() {
                [expr] => self.expression(*expr),
                _ => Err(unhandled(decorator, decorator.kind())),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let definition = self.field(node, "definition")?;
        match definition.kind() {
            "function_definition" => self.function_def(definition, decorators).map(Stmt::FunctionDef),
            _ => Err(ParseError::new(
                ErrorKind::UnsupportedShape,
                "decorators are only supported on methods",
                span_of(node),
            )),
        }
    }

    fn function_def(&self, node: Node<'_>, decorators: Vec<Expr>) -> Result<FunctionDef, ParseError> {
        let mut cursor = node.walk();
        if node.children(&mut cursor).any(|child| child.kind() == "async") {
            return Err(ParseError::new(ErrorKind::UnsupportedShape, "async functions are not supported", span_of(node)));
        }

        let name = self.text(self.field(node, "name")?).to_string();
        let params = self.parameters(self.field(node, "parameters")?)?;
        let returns = node.child_by_field_name("return_type").map(|ty| self.annotation(ty));
        let body = self.block(self.field(node, "body")?)?;

        Ok(FunctionDef { name, params, returns, decorators, body, span: span_of(node) })
    }

    fn parameters(&self, node: Node<'_>) -> Result<Vec<Param>, ParseError> {
        named_children(node)
            .into_iter()
            .map(|param| match param.kind() {
                "identifier" => Ok(Param {
                    name: self.text(param).to_string(),
                    annotation: None,
                    span: span_of(param),
                }),
                "typed_parameter" => {
                    let name = named_children(param)
                        .into_iter()
                        .find(|child| child.kind() == "identifier")
                        .ok_or_else(|| unsupported_parameter(param))?;
                    Ok(Param {
                        name: self.text(name).to_string(),
                        annotation: Some(self.annotation(self.field(param, "type")?)),
                        span: span_of(param),
                    })
                }
                _ => Err(unsupported_parameter(param)),
            })
            .collect()
    }

    /// Annotations never fail here; unknown shapes are rejected by the type mapper
    fn annotation(&self, node: Node<'_>) -> Annotation {
        let span = span_of(node);
        let inner = match (node.kind(), named_children(node).as_slice()) {
            ("type", [inner]) => *inner,
            _ => node,
        };

        match inner.kind() {
            "identifier" => Annotation::Name { id: self.text(inner).to_string(), span },
            "none" => Annotation::None { span },
            "generic_type" => {
                let children = named_children(inner);
                match children.as_slice() {
                    [base, params] if base.kind() == "identifier" && params.kind() == "type_parameter" => {
                        Annotation::Generic {
                            base: self.text(*base).to_string(),
                            args: named_children(*params).into_iter().map(|arg| self.annotation(arg)).collect(),
                            span,
                        }
                    }
                    _ => Annotation::Unsupported { text: self.text(inner).to_string(), span },
                }
            }
            "subscript" => match inner.child_by_field_name("value") {
                Some(base) if base.kind() == "identifier" => {
                    let mut cursor = inner.walk();
                    let args = inner
                        .children_by_field_name("subscript", &mut cursor)
                        .map(|arg| self.annotation(arg))
                        .collect();
                    Annotation::Generic { base: self.text(base).to_string(), args, span }
                }
                _ => Annotation::Unsupported { text: self.text(inner).to_string(), span },
            },
            _ => Annotation::Unsupported { text: self.text(inner).to_string(), span },
        }
    }

    fn if_statement(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let test = self.expression(self.field(node, "condition")?)?;
        let body = self.block(self.field(node, "consequence")?)?;

        let mut cursor = node.walk();
        let alternatives: Vec<_> = node.children_by_field_name("alternative", &mut cursor).collect();

        // Fold from the last clause so each `elif` owns everything after it
        let mut orelse = Vec::new();
        for clause in alternatives.iter().rev() {
            match clause.kind() {
                "else_clause" => orelse = self.block(self.field(*clause, "body")?)?,
                "elif_clause" => {
                    let nested = If {
                        test: self.expression(self.field(*clause, "condition")?)?,
                        body: self.block(self.field(*clause, "consequence")?)?,
                        orelse: std::mem::take(&mut orelse),
                        span: span_of(*clause),
                    };
                    orelse = vec![Stmt::If(nested)];
                }
                kind => return Err(unhandled(*clause, kind)),
            }
        }

        Ok(Stmt::If(If { test, body, orelse, span: span_of(node) }))
    }

    fn return_statement(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let value = match named_children(node).as_slice() {
            [] => None,
            [value] => Some(self.expression(*value)?),
            _ => return Err(unhandled(node, node.kind())),
        };
        Ok(Stmt::Return(Return { value, span: span_of(node) }))
    }

    fn expression_statement(&self, node: Node<'_>) -> Result<Stmt, ParseError> {
        let span = span_of(node);
        let inner = match named_children(node).as_slice() {
            [inner] => *inner,
            _ => {
                return Err(ParseError::new(
                    ErrorKind::UnsupportedShape,
                    "tuple expressions are not supported",
                    span,
                ));
            }
        };

        match inner.kind() {
            "assignment" => self.assignment(inner, span),
            "augmented_assignment" => Err(unhandled(inner, inner.kind())
                .with_help("write the operation out in full, e.g. `x = x + 1`")),
            _ => Ok(Stmt::Expr(ExprStmt { value: self.expression(inner)?, span })),
        }
    }

    fn assignment(&self, node: Node<'_>, span: Span) -> Result<Stmt, ParseError> {
        let Some(right) = node.child_by_field_name("right") else {
            return Err(ParseError::new(
                ErrorKind::UnsupportedShape,
                "declarations need an initial value",
                span_of(node),
            ));
        };
        if right.kind() == "assignment" {
            return Err(ParseError::new(
                ErrorKind::UnsupportedShape,
                "chained assignment is not supported",
                span_of(right),
            ));
        }

        let target = self.target(self.field(node, "left")?)?;
        let value = self.expression(right)?;

        Ok(match node.child_by_field_name("type") {
            Some(ty) => Stmt::AnnAssign(AnnAssign { target, annotation: self.annotation(ty), value, span }),
            None => Stmt::Assign(Assign { target, value, span }),
        })
    }

    fn target(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let span = span_of(node);
        match node.kind() {
            "identifier" => Ok(Expr::Name(Name {
                id: self.text(node).to_string(),
                ctx: ExprContext::Store,
                span,
            })),
            "attribute" => Ok(Expr::Attribute(Attribute {
                value: Box::new(self.expression(self.field(node, "object")?)?),
                attr: self.text(self.field(node, "attribute")?).to_string(),
                ctx: ExprContext::Store,
                span,
            })),
            kind => Err(ParseError::new(
                ErrorKind::UnsupportedShape,
                format!("cannot assign to `{}`", kind),
                span,
            )),
        }
    }

    fn expression(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let span = span_of(node);
        match node.kind() {
            "identifier" => Ok(Expr::Name(Name {
                id: self.text(node).to_string(),
                ctx: ExprContext::Load,
                span,
            })),
            "attribute" => Ok(Expr::Attribute(Attribute {
                value: Box::new(self.expression(self.field(node, "object")?)?),
                attr: self.text(self.field(node, "attribute")?).to_string(),
                ctx: ExprContext::Load,
                span,
            })),
            "call" => self.call(node),
            "binary_operator" => {
                let operator = self.field(node, "operator")?;
                let op = BinOperator::from_token(operator.kind())
                    .ok_or_else(|| unhandled(operator, operator.kind()))?;
                Ok(Expr::BinOp(BinOp {
                    left: Box::new(self.expression(self.field(node, "left")?)?),
                    op,
                    right: Box::new(self.expression(self.field(node, "right")?)?),
                    span,
                }))
            }
            "comparison_operator" => self.comparison(node),
            "integer" => Ok(Expr::Num(Num { value: self.integer(node)?, span })),
            "float" => Ok(Expr::Num(Num { value: self.float(node)?, span })),
            "true" => Ok(Expr::Constant(Constant { value: ConstantValue::True, span })),
            "false" => Ok(Expr::Constant(Constant { value: ConstantValue::False, span })),
            "none" => Ok(Expr::Constant(Constant { value: ConstantValue::None, span })),
            "parenthesized_expression" => match named_children(node).as_slice() {
                [inner] => self.expression(*inner),
                _ => Err(unhandled(node, node.kind())),
            },
            "unary_operator" => Err(unhandled(node, node.kind())
                .with_help("negative literals are not supported, write `0 - x` instead")),
            kind => Err(unhandled(node, kind)),
        }
    }

    fn call(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let func = self.expression(self.field(node, "function")?)?;
        let arguments = self.field(node, "arguments")?;
        if arguments.kind() != "argument_list" {
            return Err(unhandled(arguments, arguments.kind()));
        }

        let args = named_children(arguments)
            .into_iter()
            .map(|arg| match arg.kind() {
                "keyword_argument" | "list_splat" | "dictionary_splat" => Err(ParseError::new(
                    ErrorKind::UnsupportedShape,
                    "only positional arguments are supported",
                    span_of(arg),
                )),
                _ => self.expression(arg),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Expr::Call(Call { func: Box::new(func), args, span: span_of(node) }))
    }

    fn comparison(&self, node: Node<'_>) -> Result<Expr, ParseError> {
        let mut cursor = node.walk();
        let ops = node
            .children_by_field_name("operators", &mut cursor)
            .map(|op| CmpOperator::from_token(op.kind()).ok_or_else(|| unhandled(op, op.kind())))
            .collect::<Result<Vec<_>, _>>()?;

        let mut operands = named_children(node)
            .into_iter()
            .map(|operand| self.expression(operand))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();
        let left = operands.next().ok_or_else(|| unhandled(node, node.kind()))?;
        let comparators: Vec<_> = operands.collect();

        if comparators.len() != ops.len() {
            return Err(ParseError::new(ErrorKind::InvalidSyntax, "malformed comparison", span_of(node)));
        }

        Ok(Expr::Compare(Compare { left: Box::new(left), ops, comparators, span: span_of(node) }))
    }

    fn integer(&self, node: Node<'_>) -> Result<Number, ParseError> {
        let text = self.text(node);
        let digits = text.replace('_', "").to_ascii_lowercase();
        let parsed = if let Some(hex) = digits.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(oct) = digits.strip_prefix("0o") {
            i64::from_str_radix(oct, 8)
        } else if let Some(bin) = digits.strip_prefix("0b") {
            i64::from_str_radix(bin, 2)
        } else {
            digits.parse::<i64>()
        };

        parsed.map(Number::Int).map_err(|_| {
            ParseError::new(
                ErrorKind::InvalidLiteral,
                format!("integer literal `{}` is not a 64-bit integer", text),
                span_of(node),
            )
        })
    }

    fn float(&self, node: Node<'_>) -> Result<Number, ParseError> {
        let text = self.text(node);
        let invalid = || {
            ParseError::new(ErrorKind::InvalidLiteral, format!("unsupported float literal `{}`", text), span_of(node))
        };
        if text.ends_with(['j', 'J']) {
            return Err(invalid());
        }
        text.replace('_', "").parse::<f64>().map(Number::Float).map_err(|_| invalid())
    }
}

/// Named children without comments
fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn unhandled(node: Node<'_>, kind: &str) -> ParseError {
    ParseError::new(ErrorKind::UnhandledNodeKind, format!("unsupported syntax `{}`", kind), span_of(node))
}

fn unsupported_parameter(node: Node<'_>) -> ParseError {
    ParseError::new(
        ErrorKind::UnsupportedShape,
        format!("unsupported parameter `{}`", node.kind()),
        span_of(node),
    )
    .with_help("parameters must be plain names, optionally annotated")
}
