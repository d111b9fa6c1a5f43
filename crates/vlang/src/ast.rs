//! Value types for the parsed visual-language tree.

use std::fmt;

/// Arithmetic operation kinds recognized by the visual language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    /// Division with a remainder ("how many are left over").
    Surplus,
    /// Unit conversion, e.g. meters expressed in centimeters.
    UnitTrans,
    Area,
    /// Two-sided comparison. Parsed, but rejected before layout.
    Comparison,
}

impl OperationKind {
    /// Map a source keyword to its operation kind.
    pub fn from_keyword(word: &str) -> Option<Self> {
        Some(match word {
            "addition" => Self::Addition,
            "subtraction" => Self::Subtraction,
            "multiplication" => Self::Multiplication,
            "division" => Self::Division,
            "surplus" => Self::Surplus,
            "unittrans" => Self::UnitTrans,
            "area" => Self::Area,
            "comparison" => Self::Comparison,
            _ => return None,
        })
    }

    /// The source keyword for this operation kind.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Addition => "addition",
            Self::Subtraction => "subtraction",
            Self::Multiplication => "multiplication",
            Self::Division => "division",
            Self::Surplus => "surplus",
            Self::UnitTrans => "unittrans",
            Self::Area => "area",
            Self::Comparison => "comparison",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.keyword())
    }
}

/// Unit-conversion metadata merged onto an entity by extraction.
///
/// `label` is the unit's semantic type (e.g. "centimeter") and `value` the
/// number of units per one main entity.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitConversion {
    pub label: String,
    pub value: f64,
}

/// A leaf operand: one countable thing, optionally held by a container.
///
/// Entities are immutable value objects; the layout engine keeps its own
/// per-operand records instead of annotating them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    /// Free-text name, e.g. "Lucy" for an entity of type "girl".
    pub name: String,
    /// Semantic key used for icon lookup. Effectively required.
    pub entity_type: String,
    /// Non-negative count; fractional for division/remainder/unit problems.
    pub quantity: f64,
    pub container_name: String,
    /// Physical holder type, e.g. "bag"; also carries "row"/"column" layout hints.
    pub container_type: String,
    pub attr_name: String,
    pub attr_type: String,
    /// Present only after unit-conversion merging.
    pub unit: Option<UnitConversion>,
}

/// One child slot of an operation node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Entity(Entity),
    Operation(OperationNode),
}

/// An interior node of the parsed tree.
///
/// The tree is strictly acyclic and top-down owned. `result` holds the
/// reserved `result_container` segment when the source declared one; only the
/// top-level node's result is meaningful to extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationNode {
    pub kind: OperationKind,
    pub children: Vec<Node>,
    pub result: Option<Entity>,
}
