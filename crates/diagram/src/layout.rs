//! Deterministic left-to-right layout of extracted operands and operators.
//!
//! A layout pass is a pure function: mode assignment per operand, a shared
//! grid for normal operands, box sizing, cursor-based horizontal placement,
//! then materialization into the flat element list. No hidden state, no
//! randomness; identical input yields an identical list.

use crate::elements::{Element, ElementBody};
use crate::extract::MULTIPLIER_TYPE;
use icons::IconRepository;
use log::warn;
use vlang::{Entity, OperationKind};

/// Approximate glyph advance for multiplier text, in pixels.
const TEXT_CHAR_WIDTH: i32 = 30;
/// Line height for multiplier text.
const TEXT_HEIGHT: i32 = 50;
/// Vertical drop from the operator center line to the multiplier text top.
const MULTIPLIER_TEXT_DROP: i32 = 34;

/// Tunable geometry constants for a layout pass.
///
/// Defaults reproduce the reference dataset dimensions: 40px unit, 30px
/// items on a 40px pitch, 40px box padding, 30px operator glyphs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Base unit in pixels; item size and paddings derive from it by default.
    pub unit_size: i32,
    /// Item side as a fraction of `unit_size`.
    pub item_scale: f64,
    /// Gap between adjacent items inside a box.
    pub item_padding: i32,
    /// Inner padding of a container box (split evenly around the item grid).
    pub box_padding: i32,
    /// Side of operator and equals glyphs.
    pub operator_size: i32,
    /// Side of the trailing query-mark glyph.
    pub query_size: i32,
    /// Quantities above this render as one oversized icon plus a count.
    pub max_items: u32,
    /// Canvas margin reserved around the diagram.
    pub margin: i32,
    /// Gap between an operand box and the following operator glyph.
    pub operator_gap: i32,
    /// Gap between an operator glyph and the next operand box.
    pub operand_gap: i32,
    /// Gap before the equals glyph.
    pub equals_gap: i32,
    /// Gap between the equals glyph and the query mark.
    pub query_gap: i32,
    /// Left edge of the first operand box.
    pub origin_x: i32,
    /// Top edge of the operand boxes.
    pub origin_y: i32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        let unit_size = 40;
        Self {
            unit_size,
            item_scale: 0.75,
            item_padding: unit_size / 4,
            box_padding: unit_size,
            operator_size: 30,
            query_size: 60,
            max_items: 10,
            margin: 50,
            operator_gap: 20,
            operand_gap: 20,
            equals_gap: 20,
            query_gap: 20,
            origin_x: 50,
            origin_y: 100,
        }
    }
}

impl LayoutParams {
    /// Side of one icon item in pixels.
    pub fn item_size(&self) -> i32 {
        (f64::from(self.unit_size) * self.item_scale) as i32
    }

    /// Grid cell pitch: item side plus inter-item padding.
    fn pitch(&self) -> i32 {
        self.item_size() + self.item_padding
    }
}

/// Rendering strategy chosen per operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// "Number of equal groups" pseudo operand; rendered as text.
    Multiplier,
    /// Too many (or fractional) items; one oversized icon plus a count.
    Large,
    /// Items in a single horizontal line.
    Row,
    /// Items in a single vertical line.
    Column,
    /// Items on the shared row-major grid.
    Normal,
}

/// Per-operand layout record. Entities stay immutable; all layout state
/// lives here, scoped to a single pass.
#[derive(Debug, Clone, Copy)]
struct OperandPlan {
    mode: LayoutMode,
    cols: u32,
    rows: u32,
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

/// Lay out extracted operands and operators into the flat element list.
///
/// Pure and idempotent. An empty operand sequence yields an empty list;
/// icon-resolution misses degrade to label-only elements.
pub fn layout(
    operators: &[OperationKind],
    operands: &[Entity],
    repo: &dyn IconRepository,
    params: &LayoutParams,
) -> Vec<Element> {
    if operands.is_empty() {
        return Vec::new();
    }

    let mut plans = plan_operands(operands, params);

    // Horizontal placement: operands left to right, one operator glyph in
    // each gap, all glyphs centered on the first operand's box height.
    let center_y = params.origin_y + plans[0].h / 2 - params.operator_size / 2;
    let mut operator_origins = Vec::with_capacity(operators.len());
    let mut cursor = params.origin_x;
    for (idx, plan) in plans.iter_mut().enumerate() {
        plan.x = cursor;
        plan.y = params.origin_y;
        let right = plan.x + plan.w;
        if idx < operators.len() {
            let operator_x = right + params.operator_gap;
            operator_origins.push((operator_x, center_y));
            cursor = operator_x + params.operator_size + params.operand_gap;
        } else {
            cursor = right + params.operand_gap;
        }
    }
    if operator_origins.len() < operators.len() {
        warn!(
            "{} operator(s) have no operand gap to occupy; dropping them",
            operators.len() - operator_origins.len()
        );
    }
    let equals_x = cursor + params.equals_gap;
    let query_x = equals_x + params.operator_size + params.query_gap;
    let query_y = center_y - (params.query_size - params.operator_size) / 2;

    let mut elements = Vec::new();
    materialize_operands(operands, &plans, repo, params, &mut elements);
    materialize_multipliers(operands, &plans, center_y, &mut elements);

    for (idx, (kind, (x, y))) in operators.iter().zip(&operator_origins).enumerate() {
        let glyph = operator_glyph(*kind);
        let svg = resolve_svg(repo, glyph).or_else(|| resolve_svg(repo, "addition"));
        elements.push(Element {
            id: format!("operator_{idx}"),
            x: *x,
            y: *y,
            w: params.operator_size,
            h: params.operator_size,
            label: glyph.to_string(),
            body: ElementBody::Icon {
                svg,
                parent_box: None,
                count: None,
            },
        });
    }

    elements.push(Element {
        id: "equals".to_string(),
        x: equals_x,
        y: center_y,
        w: params.operator_size,
        h: params.operator_size,
        label: "equals".to_string(),
        body: ElementBody::Icon {
            svg: resolve_svg(repo, "equals"),
            parent_box: None,
            count: None,
        },
    });
    elements.push(Element {
        id: "question".to_string(),
        x: query_x,
        y: query_y,
        w: params.query_size,
        h: params.query_size,
        label: "question".to_string(),
        body: ElementBody::Icon {
            svg: resolve_svg(repo, "question"),
            parent_box: None,
            count: None,
        },
    });

    elements
}

/// Steps 1-3: mode assignment, shared grid, box pixel sizes.
fn plan_operands(operands: &[Entity], params: &LayoutParams) -> Vec<OperandPlan> {
    let modes: Vec<LayoutMode> = operands
        .iter()
        .map(|entity| assign_mode(entity, params))
        .collect();
    let (grid_cols, grid_rows) = shared_normal_grid(operands, &modes);

    let pitch = params.pitch();
    let normal_w = grid_cols as i32 * pitch + params.box_padding;
    let normal_h = grid_rows as i32 * pitch + params.box_padding;
    let large_side = params.item_size() * 4 + params.box_padding;

    // When any operand renders as a multiplier or oversized icon, multiplier
    // boxes stretch to the larger reference height so mixed layouts stay
    // visually consistent.
    let any_multiplier = modes.contains(&LayoutMode::Multiplier);
    let any_oversized = operands
        .iter()
        .any(|entity| entity.quantity > f64::from(params.max_items));
    let reference_h = if any_multiplier || any_oversized {
        normal_h.max(large_side)
    } else {
        normal_h
    };

    operands
        .iter()
        .zip(modes)
        .map(|(entity, mode)| {
            let own = entity.quantity.max(1.0) as u32;
            let (cols, rows) = match mode {
                LayoutMode::Normal => (grid_cols, grid_rows),
                LayoutMode::Row => (own, 1),
                LayoutMode::Column => (1, own),
                LayoutMode::Large | LayoutMode::Multiplier => (1, 1),
            };
            let (w, h) = match mode {
                LayoutMode::Normal => (normal_w, normal_h),
                LayoutMode::Large => (large_side, large_side),
                LayoutMode::Row => (cols as i32 * pitch + params.box_padding, pitch + params.box_padding),
                LayoutMode::Column => (pitch + params.box_padding, rows as i32 * pitch + params.box_padding),
                LayoutMode::Multiplier => (params.unit_size * 2, reference_h),
            };
            OperandPlan {
                mode,
                cols,
                rows,
                x: 0,
                y: 0,
                w,
                h,
            }
        })
        .collect()
}

fn assign_mode(entity: &Entity, params: &LayoutParams) -> LayoutMode {
    if entity.entity_type == MULTIPLIER_TYPE {
        return LayoutMode::Multiplier;
    }
    if entity.quantity > f64::from(params.max_items) || entity.quantity.fract() != 0.0 {
        return LayoutMode::Large;
    }
    for hint in [&entity.container_type, &entity.attr_type] {
        match hint.as_str() {
            "row" => return LayoutMode::Row,
            "column" => return LayoutMode::Column,
            _ => {}
        }
    }
    LayoutMode::Normal
}

/// Every normal operand shares one near-square grid sized to the largest
/// normal quantity, so all normal boxes render at the same cell grid and are
/// visually comparable.
fn shared_normal_grid(operands: &[Entity], modes: &[LayoutMode]) -> (u32, u32) {
    let largest = operands
        .iter()
        .zip(modes)
        .filter(|(_, mode)| **mode == LayoutMode::Normal)
        .map(|(entity, _)| entity.quantity)
        .fold(f64::NAN, f64::max);
    // No normal operands, or all zero-quantity: fall back to a single cell.
    if largest.is_nan() || largest <= 0.0 {
        return (1, 1);
    }
    let cols = largest.sqrt().ceil().max(1.0) as u32;
    let rows = (largest / f64::from(cols)).ceil().max(1.0) as u32;
    (cols, rows)
}

/// Step 5a: one box per non-multiplier operand, then its item icons.
fn materialize_operands(
    operands: &[Entity],
    plans: &[OperandPlan],
    repo: &dyn IconRepository,
    params: &LayoutParams,
    elements: &mut Vec<Element>,
) {
    let pitch = params.pitch();
    let mut box_counter = 0usize;
    for (entity, plan) in operands.iter().zip(plans) {
        if plan.mode == LayoutMode::Multiplier {
            continue;
        }
        let box_id = format!("box_{box_counter}");
        box_counter += 1;

        let label = if entity.container_name.is_empty() {
            entity.container_type.clone()
        } else {
            entity.container_name.clone()
        };
        elements.push(Element {
            id: box_id.clone(),
            x: plan.x,
            y: plan.y,
            w: plan.w,
            h: plan.h,
            label,
            body: ElementBody::Box {
                entity_type: entity.entity_type.clone(),
                quantity: entity.quantity,
                cols: plan.cols,
                rows: plan.rows,
            },
        });

        let svg = resolve_svg(repo, &entity.entity_type);
        if plan.mode == LayoutMode::Large {
            let side = params.item_size() * 4;
            elements.push(Element {
                id: format!("large_item_{box_id}"),
                x: plan.x + (plan.w - side) / 2,
                y: plan.y + params.item_padding,
                w: side,
                h: side,
                label: entity.entity_type.clone(),
                body: ElementBody::Icon {
                    svg,
                    parent_box: Some(box_id.clone()),
                    count: Some(entity.quantity),
                },
            });
        } else {
            // One icon per whole unit, row-major on the planned grid.
            let count = entity.quantity.trunc() as u32;
            for item_idx in 0..count {
                let col = item_idx % plan.cols;
                let row = item_idx / plan.cols;
                elements.push(Element {
                    id: format!("item_{box_id}_{item_idx}"),
                    x: plan.x + params.box_padding / 2 + col as i32 * pitch,
                    y: plan.y + params.box_padding / 2 + row as i32 * pitch,
                    w: params.item_size(),
                    h: params.item_size(),
                    label: entity.entity_type.clone(),
                    body: ElementBody::Icon {
                        svg: svg.clone(),
                        parent_box: Some(box_id.clone()),
                        count: None,
                    },
                });
            }
        }
    }
}

/// Step 5b: multiplier operands render as a bare count, centered under the
/// operand slot on the operator center line.
fn materialize_multipliers(
    operands: &[Entity],
    plans: &[OperandPlan],
    center_y: i32,
    elements: &mut Vec<Element>,
) {
    let mut multiplier_counter = 0usize;
    for (entity, plan) in operands.iter().zip(plans) {
        if plan.mode != LayoutMode::Multiplier {
            continue;
        }
        let text = format_quantity(entity.quantity);
        elements.push(Element {
            id: format!("multiplier_{multiplier_counter}"),
            x: plan.x + plan.w / 2,
            y: center_y + MULTIPLIER_TEXT_DROP,
            w: text.len() as i32 * TEXT_CHAR_WIDTH,
            h: TEXT_HEIGHT,
            label: "multiplier".to_string(),
            body: ElementBody::Text { text },
        });
        multiplier_counter += 1;
    }
}

/// Glyph name for an operator. Surplus shares the division glyph and area
/// the multiplication glyph; everything else uses its own keyword.
const fn operator_glyph(kind: OperationKind) -> &'static str {
    match kind {
        OperationKind::Surplus => "division",
        OperationKind::Area => "multiplication",
        other => other.keyword(),
    }
}

/// Resolve an icon to its SVG text; a miss degrades to a label-only element.
fn resolve_svg(repo: &dyn IconRepository, semantic_type: &str) -> Option<String> {
    if semantic_type.is_empty() {
        return None;
    }
    match repo.resolve(semantic_type) {
        Some(handle) => Some(handle.content),
        None => {
            warn!("no icon for `{semantic_type}`; emitting label-only element");
            None
        }
    }
}

/// Render a count as an integer when whole, decimal otherwise.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        (quantity as i64).to_string()
    } else {
        quantity.to_string()
    }
}
