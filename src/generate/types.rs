//! Python type annotations to Java type names.

use crate::ast::{Annotation, Span};
use crate::error::GenerateError;

/// Source type name -> Java type name
const TYPE_TABLE: &[(&str, &str)] = &[
    ("int", "Integer"),
    ("str", "String"),
];

/// How a recognised generic annotation is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeRendering {
    /// `List[T]` -> `T[]`
    ArrayOf,
}

/// A generic annotation spelling the generator understands
struct GenericShape {
    base: &'static str,
    arity: usize,
    rendering: ShapeRendering,
}

const GENERIC_SHAPES: &[GenericShape] = &[
    GenericShape { base: "List", arity: 1, rendering: ShapeRendering::ArrayOf },
    GenericShape { base: "list", arity: 1, rendering: ShapeRendering::ArrayOf },
    GenericShape { base: "Sequence", arity: 1, rendering: ShapeRendering::ArrayOf },
];

/// Fixed lookup from Python type names to Java type names
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper {
    table: &'static [(&'static str, &'static str)],
}

impl TypeMapper {
    pub fn new() -> Self {
        Self { table: TYPE_TABLE }
    }

    /// Map a source type name, e.g. `int` -> `Integer`
    pub fn resolve(&self, name: &str) -> Result<&'static str, GenerateError> {
        self.table
            .iter()
            .find(|(source, _)| *source == name)
            .map(|(_, target)| *target)
            .ok_or_else(|| GenerateError::UnsupportedType {
                name: name.to_string(),
                span: Span::default(),
            })
    }

    /// Render a parameter or declaration annotation
    pub fn render(&self, annotation: &Annotation) -> Result<String, GenerateError> {
        match annotation {
            Annotation::Name { id, span } => {
                self.resolve(id).map(str::to_string).map_err(|e| e.at(*span))
            }
            Annotation::Generic { base, args, span } => {
                let shape = GENERIC_SHAPES
                    .iter()
                    .find(|shape| shape.base == base.as_str() && shape.arity == args.len())
                    .ok_or_else(|| unsupported_shape(annotation, *span))?;

                match shape.rendering {
                    ShapeRendering::ArrayOf => match &args[0] {
                        Annotation::Name { id, span } => {
                            let element = self.resolve(id).map_err(|e| e.at(*span))?;
                            Ok(format!("{}[]", element))
                        }
                        _ => Err(unsupported_shape(annotation, *span)),
                    },
                }
            }
            Annotation::None { span } | Annotation::Unsupported { span, .. } => {
                Err(unsupported_shape(annotation, *span))
            }
        }
    }

    /// Render a return annotation; `None` (or no annotation) is `void`
    pub fn render_return(&self, annotation: Option<&Annotation>) -> Result<String, GenerateError> {
        match annotation {
            None | Some(Annotation::None { .. }) => Ok("void".to_string()),
            Some(annotation) => self.render(annotation),
        }
    }
}

impl Default for TypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn unsupported_shape(annotation: &Annotation, span: Span) -> GenerateError {
    GenerateError::UnsupportedAnnotationShape { shape: annotation.to_string(), span }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_types() {
        let types = TypeMapper::new();
        assert_eq!(types.resolve("int").unwrap(), "Integer");
        assert_eq!(types.resolve("str").unwrap(), "String");
    }

    #[test]
    fn test_resolve_unknown_type() {
        let err = TypeMapper::new().resolve("float").unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedType { ref name, .. } if name == "float"));
    }

    #[test]
    fn test_render_sequence() {
        let types = TypeMapper::new();
        let list = Annotation::generic("List", vec![Annotation::name("str")]);
        assert_eq!(types.render(&list).unwrap(), "String[]");
        let builtin = Annotation::generic("list", vec![Annotation::name("int")]);
        assert_eq!(types.render(&builtin).unwrap(), "Integer[]");
    }

    #[test]
    fn test_render_unknown_generic() {
        let dict = Annotation::generic("Dict", vec![Annotation::name("str"), Annotation::name("int")]);
        let err = TypeMapper::new().render(&dict).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedAnnotationShape { ref shape, .. } if shape == "Dict[str, int]"));
    }

    #[test]
    fn test_render_nested_generic() {
        let nested = Annotation::generic("List", vec![Annotation::generic("List", vec![Annotation::name("int")])]);
        let err = TypeMapper::new().render(&nested).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedAnnotationShape { .. }));
    }

    #[test]
    fn test_render_sequence_of_unknown_type() {
        let list = Annotation::generic("List", vec![Annotation::name("float")]);
        let err = TypeMapper::new().render(&list).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedType { .. }));
    }

    #[test]
    fn test_render_return() {
        let types = TypeMapper::new();
        assert_eq!(types.render_return(None).unwrap(), "void");
        assert_eq!(types.render_return(Some(&Annotation::None { span: Span::default() })).unwrap(), "void");
        assert_eq!(types.render_return(Some(&Annotation::name("int"))).unwrap(), "Integer");
    }

    #[test]
    fn test_none_is_not_a_parameter_type() {
        let err = TypeMapper::new().render(&Annotation::None { span: Span::default() }).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedAnnotationShape { .. }));
    }
}
