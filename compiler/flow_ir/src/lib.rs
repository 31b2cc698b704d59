//! Flow intermediate representation.
//!
//! Shared vocabulary for every stage of the toolchain:
//!
//! - [`Name`] and [`StringInterner`]: interned identifiers
//! - [`Span`]: byte ranges into the source
//! - [`Token`], [`TokenKind`], [`TokenList`]: lexer output
//! - [`Program`], [`Stmt`], [`Expr`]: the immutable syntax tree
//! - [`AstPrinter`]: source-like rendering of the tree

mod ast;
mod interner;
mod name;
mod ops;
mod printer;
mod span;
mod token;

pub use ast::{Block, Expr, ExprKind, Program, Stmt, StmtKind, StrPart};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use ops::{BinaryOp, UnaryOp};
pub use printer::AstPrinter;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
