//! Diagram pipeline: operand/operator extraction and the deterministic
//! layout engine that turns a parsed visual-language tree into a flat list
//! of positioned elements.
//!
//! Data flows one way: source string → tree ([`vlang::parse`]) →
//! operand/operator sequences ([`extract`]) → positioned elements
//! ([`layout`]). Every stage is a pure function; the icon repository is an
//! injected capability and its misses never fail a layout.

mod elements;
mod extract;
mod layout;

pub use elements::{Element, ElementBody};
pub use extract::{ExtractError, Extraction, MULTIPLIER_TYPE, extract};
pub use layout::{LayoutMode, LayoutParams, layout};

use icons::IconRepository;
use thiserror::Error;
use vlang::ParseError;

/// Failure of the whole compile pipeline. Parse and extraction errors
/// propagate to the caller unchanged; there is no silent fallback here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Compile a visual-language source string into a positioned element list.
pub fn compile(
    source: &str,
    repo: &dyn IconRepository,
    params: &LayoutParams,
) -> Result<Vec<Element>, DiagramError> {
    let tree = vlang::parse(source)?;
    let extraction = extract(&tree)?;
    Ok(layout(
        &extraction.operators,
        &extraction.operands,
        repo,
        params,
    ))
}
