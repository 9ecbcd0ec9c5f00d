mod lower;

use lower::Lowering;

use crate::ast::{Module, Position, Span};
use crate::error::{ErrorKind, ParseError};

/// Parser trait - converts source code to a syntax tree
pub trait Parser {
    fn parse(&self, source: &str) -> Result<Module, ParseError>;
}

/// Python parser backed by tree-sitter
pub struct PythonParser {
    // Configuration only, no state
}

impl PythonParser {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for PythonParser {
    #[tracing::instrument(skip_all, fields(bytes = source.len()))]
    fn parse(&self, source: &str) -> Result<Module, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| {
                ParseError::new(ErrorKind::Grammar, format!("failed to load Python grammar: {}", e), Span::default())
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new(ErrorKind::Grammar, "tree-sitter produced no tree", Span::default()))?;
        let root = tree.root_node();

        if root.has_error() {
            return Err(syntax_error(root));
        }

        let module = Lowering::new(source).module(root)?;
        tracing::debug!(statements = module.body.len(), "parsed module");
        Ok(module)
    }
}

pub(crate) fn span_of(node: tree_sitter::Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start: Position { byte: node.start_byte(), line: start.row, col: start.column },
        end: Position { byte: node.end_byte(), line: end.row, col: end.column },
    }
}

/// Error for the first ERROR or MISSING node under `root`
fn syntax_error(root: tree_sitter::Node<'_>) -> ParseError {
    fn find_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
        if node.is_error() || node.is_missing() {
            return Some(node);
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        children.into_iter().filter(|child| child.has_error()).find_map(find_error)
    }

    match find_error(root) {
        Some(node) if node.is_missing() => ParseError::new(
            ErrorKind::InvalidSyntax,
            format!("missing `{}`", node.kind()),
            span_of(node),
        ),
        Some(node) => ParseError::new(ErrorKind::InvalidSyntax, "invalid syntax", span_of(node)),
        None => ParseError::new(ErrorKind::InvalidSyntax, "invalid syntax", span_of(root)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn parse(source: &str) -> Module {
        PythonParser::new().parse(source).unwrap()
    }

    fn parse_err(source: &str) -> ParseError {
        PythonParser::new().parse(source).unwrap_err()
    }

    const MAIN: &str = "\
class Main:
    def __init__(self: Main, name: int):
        self.name = name

    @staticmethod
    def main(self, args: List[str]) -> None:
        print(self.fibo(15))
";

    #[test]
    fn test_class_shape() {
        let module = parse(MAIN);
        assert_eq!(module.body.len(), 1);
        let Stmt::ClassDef(class) = &module.body[0] else { panic!("expected class") };
        assert_eq!(class.name, "Main");
        assert_eq!(class.body.len(), 2);
        assert_eq!(class.span.col_offset(), 0);
    }

    #[test]
    fn test_constructor_params() {
        let module = parse(MAIN);
        let Stmt::ClassDef(class) = &module.body[0] else { panic!("expected class") };
        let Stmt::FunctionDef(init) = &class.body[0] else { panic!("expected function") };

        assert_eq!(init.name, "__init__");
        assert_eq!(init.span.col_offset(), 4);
        assert_eq!(init.params.len(), 2);
        assert_eq!(init.params[0].name, "self");
        assert!(matches!(&init.params[0].annotation, Some(Annotation::Name { id, .. }) if id == "Main"));
        assert!(matches!(&init.params[1].annotation, Some(Annotation::Name { id, .. }) if id == "int"));
        assert!(init.returns.is_none());

        let Stmt::Assign(assign) = &init.body[0] else { panic!("expected assignment") };
        assert_eq!(assign.span.col_offset(), 8);
        assert!(matches!(&assign.target, Expr::Attribute(attr) if attr.attr == "name" && attr.ctx == ExprContext::Store));
    }

    #[test]
    fn test_decorated_method() {
        let module = parse(MAIN);
        let Stmt::ClassDef(class) = &module.body[0] else { panic!("expected class") };
        let Stmt::FunctionDef(main) = &class.body[1] else { panic!("expected function") };

        assert_eq!(main.name, "main");
        assert_eq!(main.span.col_offset(), 4);
        assert_eq!(main.decorators, vec![Expr::Name(Name {
            id: "staticmethod".to_string(),
            ctx: ExprContext::Load,
            span: main.decorators[0].span(),
        })]);
        assert!(matches!(main.returns, Some(Annotation::None { .. })));
        assert_eq!(main.params[1].annotation.as_ref().unwrap().to_string(), "List[str]");
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_err("class Main:\n    def broken(:\n");
        assert_eq!(err.kind, ErrorKind::InvalidSyntax);
        assert_eq!(err.span.start.line, 1);
    }

    #[test]
    fn test_imports_are_skipped() {
        let module = parse("from __future__ import annotations\nfrom typing import List\nimport os\n\nclass A:\n    pass\n");
        assert_eq!(module.body.len(), 1);
        let Stmt::ClassDef(class) = &module.body[0] else { panic!("expected class") };
        assert!(class.body.is_empty());
    }
}
