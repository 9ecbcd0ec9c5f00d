use std::fmt;

/// Position in source code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    /// Byte offset in source
    pub byte: usize,
    /// Line number (0-indexed)
    pub line: usize,
    /// Column offset (0-indexed, in bytes like Python's `col_offset`)
    pub col: usize,
}

/// Span in source code (a range from start position to end position)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    /// Span starting at `col` on `line`, for hand-built trees
    pub fn at(line: usize, col: usize) -> Self {
        let position = Position { byte: 0, line, col };
        Self { start: position, end: position }
    }

    /// Column offset of the node, used as its indentation width
    pub fn col_offset(&self) -> usize {
        self.start.col
    }
}

/// Root of a parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
    pub span: Span,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body, span: Span::default() }
    }
}

/// Statement node
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    ClassDef(ClassDef),
    FunctionDef(FunctionDef),
    If(If),
    Assign(Assign),
    AnnAssign(AnnAssign),
    Return(Return),
    Expr(ExprStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::ClassDef(node) => node.span,
            Stmt::FunctionDef(node) => node.span,
            Stmt::If(node) => node.span,
            Stmt::Assign(node) => node.span,
            Stmt::AnnAssign(node) => node.span,
            Stmt::Return(node) => node.span,
            Stmt::Expr(node) => node.span,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::ClassDef(_) => "ClassDef",
            Stmt::FunctionDef(_) => "FunctionDef",
            Stmt::If(_) => "If",
            Stmt::Assign(_) => "Assign",
            Stmt::AnnAssign(_) => "AnnAssign",
            Stmt::Return(_) => "Return",
            Stmt::Expr(_) => "Expr",
        }
    }
}

/// `class Name: ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: String,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `def name(params) -> returns: ...`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` when the function has no return annotation
    pub returns: Option<Annotation>,
    pub decorators: Vec<Expr>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// Function parameter with an optional annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Annotation>,
    pub span: Span,
}

/// If/else. `elif` chains are nested `If` nodes in `orelse`.
#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub test: Expr,
    pub body: Vec<Stmt>,
    pub orelse: Vec<Stmt>,
    pub span: Span,
}

/// `target = value`
#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Expr,
    pub value: Expr,
    pub span: Span,
}

/// `target: annotation = value`
#[derive(Debug, Clone, PartialEq)]
pub struct AnnAssign {
    pub target: Expr,
    pub annotation: Annotation,
    pub value: Expr,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<Expr>,
    pub span: Span,
}

/// Expression evaluated for its side effects
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub value: Expr,
    pub span: Span,
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    BinOp(BinOp),
    Compare(Compare),
    Name(Name),
    Attribute(Attribute),
    Call(Call),
    Num(Num),
    Constant(Constant),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::BinOp(node) => node.span,
            Expr::Compare(node) => node.span,
            Expr::Name(node) => node.span,
            Expr::Attribute(node) => node.span,
            Expr::Call(node) => node.span,
            Expr::Num(node) => node.span,
            Expr::Constant(node) => node.span,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expr::BinOp(_) => "BinOp",
            Expr::Compare(_) => "Compare",
            Expr::Name(_) => "Name",
            Expr::Attribute(_) => "Attribute",
            Expr::Call(_) => "Call",
            Expr::Num(_) => "Num",
            Expr::Constant(_) => "Constant",
        }
    }

    /// Identifier in read position
    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name(Name { id: id.into(), ctx: ExprContext::Load, span: Span::default() })
    }

    /// Integer literal
    pub fn int(value: i64) -> Self {
        Expr::Num(Num { value: Number::Int(value), span: Span::default() })
    }

    /// `value.attr` in read position
    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute(Attribute {
            value: Box::new(value),
            attr: attr.into(),
            ctx: ExprContext::Load,
            span: Span::default(),
        })
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call(Call { func: Box::new(func), args, span: Span::default() })
    }

    pub fn binop(left: Expr, op: BinOperator, right: Expr) -> Self {
        Expr::BinOp(BinOp { left: Box::new(left), op, right: Box::new(right), span: Span::default() })
    }

    pub fn compare(left: Expr, op: CmpOperator, right: Expr) -> Self {
        Expr::Compare(Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
            span: Span::default(),
        })
    }

    pub fn constant(value: ConstantValue) -> Self {
        Expr::Constant(Constant { value, span: Span::default() })
    }
}

/// Whether an expression is read or written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExprContext {
    Load,
    Store,
}

impl fmt::Display for ExprContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprContext::Load => write!(f, "read"),
            ExprContext::Store => write!(f, "write"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: BinOperator,
    pub right: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    Pow,
    Div,
    FloorDiv,
    Mod,
    MatMult,
    BitOr,
    BitAnd,
    BitXor,
    LShift,
    RShift,
}

impl BinOperator {
    /// Operator for a Python token, e.g. `"**"` -> `Pow`
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => BinOperator::Add,
            "-" => BinOperator::Sub,
            "*" => BinOperator::Mult,
            "**" => BinOperator::Pow,
            "/" => BinOperator::Div,
            "//" => BinOperator::FloorDiv,
            "%" => BinOperator::Mod,
            "@" => BinOperator::MatMult,
            "|" => BinOperator::BitOr,
            "&" => BinOperator::BitAnd,
            "^" => BinOperator::BitXor,
            "<<" => BinOperator::LShift,
            ">>" => BinOperator::RShift,
            _ => return None,
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            BinOperator::Add => "Add",
            BinOperator::Sub => "Sub",
            BinOperator::Mult => "Mult",
            BinOperator::Pow => "Pow",
            BinOperator::Div => "Div",
            BinOperator::FloorDiv => "FloorDiv",
            BinOperator::Mod => "Mod",
            BinOperator::MatMult => "MatMult",
            BinOperator::BitOr => "BitOr",
            BinOperator::BitAnd => "BitAnd",
            BinOperator::BitXor => "BitXor",
            BinOperator::LShift => "LShift",
            BinOperator::RShift => "RShift",
        }
    }
}

/// `left op1 c1 op2 c2 ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Compare {
    pub left: Box<Expr>,
    pub ops: Vec<CmpOperator>,
    pub comparators: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOperator {
    Lt,
    Gt,
    LtE,
    GtE,
    Eq,
    NotEq,
    In,
    NotIn,
    Is,
    IsNot,
}

impl CmpOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "<" => CmpOperator::Lt,
            ">" => CmpOperator::Gt,
            "<=" => CmpOperator::LtE,
            ">=" => CmpOperator::GtE,
            "==" => CmpOperator::Eq,
            "!=" => CmpOperator::NotEq,
            "in" => CmpOperator::In,
            "not in" => CmpOperator::NotIn,
            "is" => CmpOperator::Is,
            "is not" => CmpOperator::IsNot,
            _ => return None,
        })
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOperator::Lt => "<",
            CmpOperator::Gt => ">",
            CmpOperator::LtE => "<=",
            CmpOperator::GtE => ">=",
            CmpOperator::Eq => "==",
            CmpOperator::NotEq => "!=",
            CmpOperator::In => "in",
            CmpOperator::NotIn => "not in",
            CmpOperator::Is => "is",
            CmpOperator::IsNot => "is not",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Name {
    pub id: String,
    pub ctx: ExprContext,
    pub span: Span,
}

/// `value.attr`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub value: Box<Expr>,
    pub attr: String,
    pub ctx: ExprContext,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub func: Box<Expr>,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Num {
    pub value: Number,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(value) => write!(f, "{}", value),
            // Debug keeps the trailing `.0` on whole floats
            Number::Float(value) => write!(f, "{:?}", value),
        }
    }
}

/// `True`, `False` or `None`
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub value: ConstantValue,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantValue {
    True,
    False,
    None,
}

/// Type annotation on a parameter, return or declaration
#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    /// `int`, `str`, `Main`
    Name { id: String, span: Span },
    /// `List[str]`
    Generic { base: String, args: Vec<Annotation>, span: Span },
    /// `None`
    None { span: Span },
    /// Any other annotation expression, kept as source text
    Unsupported { text: String, span: Span },
}

impl Annotation {
    pub fn name(id: impl Into<String>) -> Self {
        Annotation::Name { id: id.into(), span: Span::default() }
    }

    pub fn generic(base: impl Into<String>, args: Vec<Annotation>) -> Self {
        Annotation::Generic { base: base.into(), args, span: Span::default() }
    }

    pub fn span(&self) -> Span {
        match self {
            Annotation::Name { span, .. }
            | Annotation::Generic { span, .. }
            | Annotation::None { span }
            | Annotation::Unsupported { span, .. } => *span,
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Name { id, .. } => write!(f, "{}", id),
            Annotation::Generic { base, args, .. } => {
                write!(f, "{}[", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "]")
            }
            Annotation::None { .. } => write!(f, "None"),
            Annotation::Unsupported { text, .. } => write!(f, "{}", text),
        }
    }
}
