use pyjava_transpiler::ast::*;
use pyjava_transpiler::{
    Destination, Emitter, GenerateError, GenerateOptions, Generator, IndentMode, JavaGenerator, generate,
    generate_to_path,
};
use std::io;

fn compile(source: &str) -> String {
    pyjava_transpiler::transpile(source).unwrap().code
}

/// Destination that records every call it receives
#[derive(Default)]
struct Recorder {
    chunks: Vec<String>,
    finalized: usize,
}

impl Destination for Recorder {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.chunks.push(text.to_string());
        Ok(())
    }

    fn finalize(&mut self) -> io::Result<()> {
        self.finalized += 1;
        Ok(())
    }
}

/// Destination whose writes always fail
struct Broken;

impl Destination for Broken {
    fn append(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

fn fibo_module() -> Module {
    let n = || Expr::name("n");
    let recurse = |k| {
        Expr::call(
            Expr::attribute(Expr::name("self"), "fibo"),
            vec![Expr::binop(n(), BinOperator::Sub, Expr::int(k))],
        )
    };

    let fibo = FunctionDef {
        name: "fibo".to_string(),
        params: vec![
            Param { name: "self".to_string(), annotation: None, span: Span::at(1, 13) },
            Param { name: "n".to_string(), annotation: Some(Annotation::name("int")), span: Span::at(1, 19) },
        ],
        returns: Some(Annotation::name("int")),
        decorators: vec![Expr::name("staticmethod")],
        body: vec![Stmt::If(If {
            test: Expr::compare(n(), CmpOperator::Lt, Expr::int(2)),
            body: vec![Stmt::Return(Return { value: Some(n()), span: Span::at(3, 12) })],
            orelse: vec![Stmt::Return(Return {
                value: Some(Expr::binop(recurse(1), BinOperator::Add, recurse(2))),
                span: Span::at(5, 12),
            })],
            span: Span::at(2, 8),
        })],
        span: Span::at(1, 4),
    };

    Module::new(vec![Stmt::ClassDef(ClassDef {
        name: "Main".to_string(),
        body: vec![Stmt::FunctionDef(fibo)],
        span: Span::at(0, 0),
    })])
}

const FIBO_JAVA: &str = "\
public class Main {
    public static Integer fibo(Integer n) {
        if ((n < 2)) {
            return n;
        } else {
            return (this.fibo((n - 1)) + this.fibo((n - 2)));
        }
    }
}
";

#[test]
fn test_hand_built_tree() {
    let result = generate(&fibo_module(), &GenerateOptions::default()).unwrap();
    assert_eq!(result.code, FIBO_JAVA);
}

#[test]
fn test_hand_built_tree_matches_parsed_source() {
    let source = "\
class Main:
    @staticmethod
    def fibo(self, n: int) -> int:
        if n < 2:
            return n
        else:
            return self.fibo(n - 1) + self.fibo(n - 2)
";
    assert_eq!(compile(source), FIBO_JAVA);
}

#[test]
fn test_destination_is_append_only_and_finalized_once() {
    let mut recorder = Recorder::default();
    let mut out = Emitter::new(&mut recorder);
    JavaGenerator::default().generate(&fibo_module(), &mut out).unwrap();
    out.finish().unwrap();

    assert_eq!(recorder.finalized, 1);
    assert_eq!(recorder.chunks.concat(), FIBO_JAVA);
}

#[test]
fn test_destination_not_finalized_on_error() {
    let module = Module::new(vec![Stmt::Return(Return {
        value: Some(Expr::binop(Expr::name("a"), BinOperator::FloorDiv, Expr::name("b"))),
        span: Span::at(0, 0),
    })]);

    let mut recorder = Recorder::default();
    let mut out = Emitter::new(&mut recorder);
    let err = JavaGenerator::default().generate(&module, &mut out).unwrap_err();

    assert!(matches!(err, GenerateError::UnhandledNodeKind { ref kind, .. } if kind == "FloorDiv"));
    assert_eq!(recorder.finalized, 0);
    // Partial output stays where it is
    assert_eq!(recorder.chunks.concat(), "return ");
}

#[test]
fn test_write_failure_is_io_error() {
    let mut broken = Broken;
    let mut out = Emitter::new(&mut broken);
    let err = JavaGenerator::default().generate(&fibo_module(), &mut out).unwrap_err();
    assert!(matches!(err, GenerateError::Io(_)));
    assert!(err.span().is_none());
}

#[test]
fn test_generate_to_path_is_idempotent() {
    let path = std::env::temp_dir().join(format!("pyjava-generator-{}.java", std::process::id()));

    let first = generate_to_path(&fibo_module(), &path, &GenerateOptions::default()).unwrap();
    let second = generate_to_path(&fibo_module(), &path, &GenerateOptions::default()).unwrap();
    let written = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(written, FIBO_JAVA);
    assert_eq!(first, second);
}

#[test]
fn test_indentation_follows_source_columns() {
    // Three-space indentation is reproduced verbatim
    let source = "class Odd:\n   def one(self) -> int:\n      return 1\n";
    assert_eq!(compile(source), "public class Odd {\n   public Integer one() {\n      return 1;\n   }\n}\n");
}

#[test]
fn test_structural_indentation_normalizes() {
    let source = "class Odd:\n   def one(self) -> int:\n      return 1\n";
    let options = GenerateOptions { indent: IndentMode::Structural { width: 2 } };
    let result = pyjava_transpiler::transpile_with(source, &options).unwrap();
    assert_eq!(result.code, "public class Odd {\n  public Integer one() {\n    return 1;\n  }\n}\n");
}

#[test]
fn test_elif_keeps_its_own_column() {
    // The nested `if` sits at the `elif` keyword's column, not one level deeper
    let source = "class G:\n    def f(self, n: int) -> int:\n        if n > 9:\n            return 1\n        elif n > 5:\n            return 2\n";
    let output = compile(source);
    assert!(output.contains("        } else {\n        if ((n > 5)) {\n            return 2;\n        }\n        }\n"));
}

#[test]
fn test_literals() {
    let source = "class L:\n    def f(self) -> int:\n        print(7, 2.5, 3.0, True, False)\n        return 0\n";
    let output = compile(source);
    assert!(output.contains("        print(7, 2.5, 3.0, true, false);\n"));
}

#[test]
fn test_power_rewrite() {
    let source = "class P:\n    def f(self, a: int, b: int) -> int:\n        return a ** b\n";
    assert!(compile(source).contains("return Math.pow(a, b);"));
}

#[test]
fn test_list_parameter_becomes_array() {
    let source = "class P:\n    def f(self, names: list[str], ids: Sequence[int]) -> None:\n        return\n";
    assert!(compile(source).contains("public void f(String[] names, Integer[] ids) {"));
}

#[test]
fn test_nested_list_is_unsupported() {
    let source = "class P:\n    def f(self, grid: List[List[int]]) -> None:\n        return\n";
    let err = pyjava_transpiler::transpile(source).unwrap_err();
    assert_eq!(err.to_string(), "unsupported annotation shape `List[List[int]]`");
}
