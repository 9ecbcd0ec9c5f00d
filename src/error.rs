use crate::ast::{ExprContext, Span};
use thiserror::Error;

/// Kind of parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidSyntax,
    UnhandledNodeKind,
    UnsupportedShape,
    InvalidLiteral,
    Grammar,
}

/// Error while turning Python source into a syntax tree
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Span,
    pub help: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            help: None,
        }
    }

    /// Add help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.message, Some(self.span), self.help.as_deref(), source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.message, Some(self.span), self.help.as_deref(), source, filename, true)
    }
}

/// Error while generating Java from a syntax tree. Generation stops at the first one.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("no Java rule for node kind `{kind}`")]
    UnhandledNodeKind { kind: String, span: Span },

    #[error("unsupported annotation shape `{shape}`")]
    UnsupportedAnnotationShape { shape: String, span: Span },

    #[error("unsupported type `{name}`")]
    UnsupportedType { name: String, span: Span },

    #[error("unsupported comparison `{operators}`")]
    UnsupportedComparison { operators: String, span: Span },

    #[error("`{what}` cannot be used in {context} position")]
    UnsupportedContext { what: String, context: ExprContext, span: Span },

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Source location of the offending node, if any
    pub fn span(&self) -> Option<Span> {
        match self {
            GenerateError::UnhandledNodeKind { span, .. }
            | GenerateError::UnsupportedAnnotationShape { span, .. }
            | GenerateError::UnsupportedType { span, .. }
            | GenerateError::UnsupportedComparison { span, .. }
            | GenerateError::UnsupportedContext { span, .. } => Some(*span),
            GenerateError::Io(_) => None,
        }
    }

    /// Re-anchor the error at `at`
    pub fn at(mut self, at: Span) -> Self {
        match &mut self {
            GenerateError::UnhandledNodeKind { span, .. }
            | GenerateError::UnsupportedAnnotationShape { span, .. }
            | GenerateError::UnsupportedType { span, .. }
            | GenerateError::UnsupportedComparison { span, .. }
            | GenerateError::UnsupportedContext { span, .. } => *span = at,
            GenerateError::Io(_) => {}
        }
        self
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            GenerateError::UnsupportedType { .. } => Some("supported types are 'int' and 'str'"),
            GenerateError::UnsupportedAnnotationShape { .. } => {
                Some("annotate with a simple type name or 'List[T]'")
            }
            GenerateError::UnsupportedComparison { .. } => {
                Some("only single '<' or '>' comparisons are supported")
            }
            _ => None,
        }
    }

    /// Render the error with source context
    pub fn render(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.to_string(), self.span(), self.help(), source, filename, false)
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        render_diagnostic(&self.to_string(), self.span(), self.help(), source, filename, true)
    }
}

/// Error during compilation (parsing or generation)
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

impl CompileError {
    /// Render the error with source context (no color)
    pub fn render(&self, source: &str, filename: &str) -> String {
        match self {
            CompileError::Parse(err) => err.render(source, filename),
            CompileError::Generate(err) => err.render(source, filename),
        }
    }

    /// Render the error with ANSI color codes
    pub fn render_color(&self, source: &str, filename: &str) -> String {
        match self {
            CompileError::Parse(err) => err.render_color(source, filename),
            CompileError::Generate(err) => err.render_color(source, filename),
        }
    }
}

fn render_diagnostic(
    message: &str,
    span: Option<Span>,
    help: Option<&str>,
    source: &str,
    filename: &str,
    color: bool,
) -> String {
    let red = if color { "\x1b[1;31m" } else { "" };
    let dim = if color { "\x1b[2m" } else { "" };
    let cyan = if color { "\x1b[1;38;5;73m" } else { "" };
    let reset = if color { "\x1b[0m" } else { "" };

    let mut output = String::new();
    output.push('\n');

    match span {
        Some(span) => {
            let location = format!("{}:{}:{}", filename, span.start.line + 1, span.start.col + 1);
            output.push_str(&format!(" {}file:{} {}\n", dim, reset, location));
        }
        None => output.push_str(&format!(" {}file:{} {}\n", dim, reset, filename)),
    }

    output.push_str(&format!("{}error:{} {}\n", red, reset, message));

    if let Some(span) = span {
        if let Some(source_line) = source.lines().nth(span.start.line) {
            let err_line = span.start.line + 1;
            let line_num_width = format!("{}", err_line).len().max(2);
            let highlighted = if color { highlight_syntax(source_line) } else { source_line.to_string() };
            output.push_str(&format!("{}{:>width$} |{}\n", dim, "", reset, width = line_num_width));
            output.push_str(&format!(
                "{}{:>width$} |{} {}\n",
                dim, err_line, reset, highlighted,
                width = line_num_width
            ));

            let underline_start = span.start.col;
            let underline_len = if span.end.line == span.start.line {
                span.end.col.saturating_sub(span.start.col).max(1)
            } else {
                source_line.len().saturating_sub(underline_start).max(1)
            };
            output.push_str(&format!(
                "{}{:>width$} |{} {}{}{}{}\n",
                dim, "", reset,
                " ".repeat(underline_start), red, "^".repeat(underline_len), reset,
                width = line_num_width
            ));
        }
    }

    if let Some(help) = help {
        output.push('\n');
        output.push_str(&format!(" {}help:{} {}\n", cyan, reset, help));
    }

    output.push('\n');
    output
}

/// Syntax highlighting for Python error context lines
fn highlight_syntax(line: &str) -> String {
    const STRING: &str = "\x1b[38;5;72m";
    const KEYWORD: &str = "\x1b[38;5;173m";
    const BUILTIN: &str = "\x1b[38;5;103m";
    const NUMBER: &str = "\x1b[38;5;73m";
    const DECORATOR: &str = "\x1b[38;5;180m";
    const RESET: &str = "\x1b[0m";

    const KEYWORDS: &[&str] = &[
        "if", "elif", "else", "for", "while", "with", "match", "case", "try", "except", "finally",
        "def", "class", "return", "yield", "import", "from", "pass", "break", "continue", "raise",
        "assert", "async", "await", "lambda", "None", "True", "False", "is", "in", "as", "or",
        "and", "not", "self",
    ];

    const BUILTINS: &[&str] = &[
        "print", "len", "range", "str", "int", "float", "bool", "list", "dict", "set", "tuple",
        "type", "isinstance", "sum", "min", "max", "abs", "round", "sorted", "staticmethod",
    ];

    let mut result = String::with_capacity(line.len() * 2);
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        // Comments run to end of line
        if chars[i] == '#' {
            result.push_str("\x1b[2m");
            result.extend(&chars[i..]);
            result.push_str(RESET);
            break;
        }

        if chars[i] == '@' {
            result.push_str(DECORATOR);
            result.push('@');
            i += 1;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_' || chars[i] == '.') {
                result.push(chars[i]);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        if chars[i] == '"' || chars[i] == '\'' {
            let quote = chars[i];
            result.push_str(STRING);
            result.push(quote);
            i += 1;
            while i < chars.len() && chars[i] != quote {
                if chars[i] == '\\' && i + 1 < chars.len() {
                    result.push(chars[i]);
                    i += 1;
                }
                result.push(chars[i]);
                i += 1;
            }
            if i < chars.len() {
                result.push(quote);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        if chars[i].is_alphabetic() || chars[i] == '_' {
            let word_start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            let word: String = chars[word_start..i].iter().collect();
            let is_call = i < chars.len() && chars[i] == '(';

            if KEYWORDS.contains(&word.as_str()) {
                result.push_str(KEYWORD);
                result.push_str(&word);
                result.push_str(RESET);
            } else if is_call && BUILTINS.contains(&word.as_str()) {
                result.push_str(BUILTIN);
                result.push_str(&word);
                result.push_str(RESET);
            } else {
                result.push_str(&word);
            }
            continue;
        }

        if chars[i].is_ascii_digit() {
            result.push_str(NUMBER);
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '.' || chars[i] == '_')
            {
                result.push(chars[i]);
                i += 1;
            }
            result.push_str(RESET);
            continue;
        }

        result.push(chars[i]);
        i += 1;
    }

    result
}
