//! Visual-language grammar: value types for the parsed operation tree and the
//! recursive-descent parser that produces it.
//!
//! The visual language is a compact, function-call-style notation for
//! arithmetic word problems, e.g.
//! `addition(container1[entity_type: apple, entity_quantity: 9], ...)`.
//! Parsing is a pure transform from source text to an [`OperationNode`] tree;
//! no I/O, no shared state.

mod ast;
mod parser;

pub use ast::{Entity, Node, OperationKind, OperationNode, UnitConversion};
pub use parser::{ParseError, parse};
