//! Syntax tree for Flow programs.
//!
//! Nodes are immutable once built. Children sit behind `Rc` so a rewrite
//! (reference substitution) can rebuild the path it changes and share every
//! untouched subtree with the original.

use std::rc::Rc;

use super::{BinaryOp, Name, Span, UnaryOp};

/// A whole program: statements in source order.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub stmts: Vec<Stmt>,
}

/// A `{ … }` statement sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Rc<Self> {
        Rc::new(Block { stmts, span })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `let name = value;`
    Let { name: Name, value: Rc<Expr> },
    /// `return value;`
    Return(Rc<Expr>),
    /// An expression evaluated for its value.
    Expr(Rc<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Rc<Self> {
        Rc::new(Expr { kind, span })
    }

    /// Identifier node.
    #[inline]
    pub fn ident(name: Name, span: Span) -> Rc<Self> {
        Expr::new(ExprKind::Ident(name), span)
    }

    /// The identifier this node names, if it is a bare identifier.
    #[inline]
    pub fn as_ident(&self) -> Option<Name> {
        match self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }
}

/// One piece of a string literal.
#[derive(Clone, Debug, PartialEq)]
pub enum StrPart {
    /// Literal text, escapes already decoded.
    Text(String),
    /// A `${…}` segment.
    Expr(Rc<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Ident(Name),
    Int(i64),
    Bool(bool),
    /// `"text ${expr} text"`
    Str(Vec<StrPart>),
    /// `[a, b, c]`
    Array(Vec<Rc<Expr>>),
    /// `left[index]`
    Index { left: Rc<Expr>, index: Rc<Expr> },
    /// `left[lower:upper]`, either bound optional.
    Slice {
        left: Rc<Expr>,
        lower: Option<Rc<Expr>>,
        upper: Option<Rc<Expr>>,
    },
    /// `-x`, `!x`
    Prefix { op: UnaryOp, operand: Rc<Expr> },
    /// `left op right`; `=` is assignment.
    Infix {
        op: BinaryOp,
        left: Rc<Expr>,
        right: Rc<Expr>,
    },
    /// `cond ? then : otherwise`
    Ternary {
        cond: Rc<Expr>,
        then: Rc<Expr>,
        otherwise: Rc<Expr>,
    },
    /// `if (cond) { … } else { … }`
    If {
        cond: Rc<Expr>,
        then: Rc<Block>,
        otherwise: Option<Rc<Block>>,
    },
    /// `(a, b) => { … }`
    Function { params: Vec<Name>, body: Rc<Block> },
    /// `callee(args…)`
    Call { callee: Rc<Expr>, args: Vec<Rc<Expr>> },
    /// `source ~> handler`
    Subscribe { source: Name, handler: Name },
}
