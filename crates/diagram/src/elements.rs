//! Flat, serializable output primitives produced by the layout engine.
//!
//! The element list is the sole output of a layout pass: an ordered sequence
//! of positioned rectangles with kind-specific payloads, stable enough for a
//! downstream renderer to draw without back-references into the parsed tree.

use serde::Serialize;

/// A single positioned, sized visual primitive.
///
/// Geometry is integer pixels on the canvas. `id` is deterministic per input
/// (`box_0`, `item_box_0_3`, `operator_1`, ...); elements have no identity
/// beyond that and their position in the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    pub label: String,
    #[serde(flatten)]
    pub body: ElementBody,
}

/// Kind-specific payload of an element. Serializes with a lowercase `kind`
/// tag (`box` / `icon` / `text`) for the downstream renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ElementBody {
    /// A labeled container rectangle holding icon items.
    Box {
        entity_type: String,
        quantity: f64,
        cols: u32,
        rows: u32,
    },
    /// A drawable glyph: an item, an operator, the equals sign, or the query
    /// mark. `svg` is `None` when icon resolution missed; the element is
    /// still valid, label-only output.
    Icon {
        #[serde(skip_serializing_if = "Option::is_none")]
        svg: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        parent_box: Option<String>,
        /// Numeric count shown beside oversized icons in `large` layouts.
        #[serde(skip_serializing_if = "Option::is_none")]
        count: Option<f64>,
    },
    /// Literal text, used for multiplier counts.
    Text { text: String },
}

impl Element {
    /// True when `other`'s rectangle lies fully inside this one.
    pub fn contains(&self, other: &Element) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }

    /// True when the two rectangles share any area.
    pub fn intersects(&self, other: &Element) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }
}
