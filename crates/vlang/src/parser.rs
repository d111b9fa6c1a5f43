//! Recursive-descent parser for the visual language.
//!
//! The grammar is `operation(segment, segment, ...)` where each segment is
//! either a nested `operation(...)` or an entity
//! `name[key: value, key: value, ...]`. Segment splitting happens only at
//! commas that sit at zero `()`/`[]` nesting depth, with both balances
//! tracked independently.

use crate::ast::{Entity, Node, OperationKind, OperationNode};
use log::trace;
use thiserror::Error;

/// Reserved entity head naming the right-hand-side total of the equation.
const RESULT_CONTAINER: &str = "result_container";

/// Grammar mismatch at any recursion depth, carrying the offending substring.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expression does not match the visual-language grammar: `{span}`")]
    Malformed { span: String },
}

impl ParseError {
    fn malformed(span: &str) -> Self {
        Self::Malformed {
            span: span.to_string(),
        }
    }
}

/// Parse a visual-language source string into an operation tree.
///
/// Whitespace runs are collapsed before matching, so the notation may be
/// pretty-printed across lines. The top-level identifier must be a recognized
/// operation keyword; nested segments recurse on the same shape.
pub fn parse(source: &str) -> Result<OperationNode, ParseError> {
    let collapsed = collapse_whitespace(source);
    let (head, body) =
        match_call(&collapsed).ok_or_else(|| ParseError::malformed(&collapsed))?;
    let kind =
        OperationKind::from_keyword(head).ok_or_else(|| ParseError::malformed(&collapsed))?;
    parse_operation(kind, body)
}

fn parse_operation(kind: OperationKind, body: &str) -> Result<OperationNode, ParseError> {
    let mut children = Vec::new();
    let mut result = None;
    for segment in split_segments(body) {
        parse_segment(segment, &mut children, &mut result)?;
    }
    Ok(OperationNode {
        kind,
        children,
        result,
    })
}

fn parse_segment(
    segment: &str,
    children: &mut Vec<Node>,
    result: &mut Option<Entity>,
) -> Result<(), ParseError> {
    // Nested operation: a recognized keyword head followed by parentheses.
    if let Some((head, inner)) = match_call(segment) {
        if let Some(kind) = OperationKind::from_keyword(head) {
            children.push(Node::Operation(parse_operation(kind, inner)?));
            return Ok(());
        }
    }

    let (head, entity) = parse_entity(segment)?;
    // An operation keyword without parentheses is a grammar mismatch, not an
    // entity that happens to share the name.
    if OperationKind::from_keyword(head).is_some() {
        return Err(ParseError::malformed(segment));
    }
    if head == RESULT_CONTAINER {
        *result = Some(entity);
    } else {
        children.push(Node::Entity(entity));
    }
    Ok(())
}

/// Match the `<identifier>(<body>)` shape: body spans from the first `(` to
/// the last `)`; trailing text after the last `)` is ignored.
fn match_call(input: &str) -> Option<(&str, &str)> {
    let open = input.find('(')?;
    let head = input[..open].trim_end();
    if !is_identifier(head) {
        return None;
    }
    let close = input.rfind(')')?;
    if close < open {
        return None;
    }
    Some((head, &input[open + 1..close]))
}

/// Parse `<identifier>[<key: value, ...>]`; the bracket body ends at the
/// first `]` and trailing text is ignored. Returns the head token alongside
/// the populated entity.
fn parse_entity(segment: &str) -> Result<(&str, Entity), ParseError> {
    let open = segment
        .find('[')
        .ok_or_else(|| ParseError::malformed(segment))?;
    let head = &segment[..open];
    if !is_identifier(head) {
        return Err(ParseError::malformed(segment));
    }
    let close = segment[open..]
        .find(']')
        .map(|offset| open + offset)
        .ok_or_else(|| ParseError::malformed(segment))?;

    let mut entity = Entity::default();
    for part in segment[open + 1..close].split(',') {
        // Parts without a colon (including empty ones) are skipped.
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "entity_name" => entity.name = value.to_string(),
            "entity_type" => entity.entity_type = value.to_string(),
            "entity_quantity" => entity.quantity = parse_quantity(value),
            "container_name" => entity.container_name = value.to_string(),
            "container_type" => entity.container_type = value.to_string(),
            "attr_name" => entity.attr_name = value.to_string(),
            "attr_type" => entity.attr_type = value.to_string(),
            other => trace!("ignoring unrecognized entity key `{other}`"),
        }
    }
    Ok((head, entity))
}

/// Quantities are non-negative; unparseable or negative values default to 0.
fn parse_quantity(value: &str) -> f64 {
    value
        .parse::<f64>()
        .ok()
        .filter(|quantity| *quantity >= 0.0)
        .unwrap_or(0.0)
}

/// Split on commas at zero combined nesting depth, skipping empty buffers.
fn split_segments(body: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut paren = 0i32;
    let mut bracket = 0i32;
    let mut start = 0usize;
    for (idx, ch) in body.char_indices() {
        match ch {
            '(' => paren += 1,
            ')' => paren -= 1,
            '[' => bracket += 1,
            ']' => bracket -= 1,
            ',' if paren == 0 && bracket == 0 => {
                let segment = body[start..idx].trim();
                if !segment.is_empty() {
                    segments.push(segment);
                }
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = body[start..].trim();
    if !tail.is_empty() {
        segments.push(tail);
    }
    segments
}

fn is_identifier(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|ch| ch.is_alphanumeric() || ch == '_')
}

fn collapse_whitespace(source: &str) -> String {
    source.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_only_at_zero_depth() {
        let body = "a[x:1,y:2],addition(b[x:3],c[y:4]),d[z:5]";
        let segments = split_segments(body);
        assert_eq!(
            segments,
            vec!["a[x:1,y:2]", "addition(b[x:3],c[y:4])", "d[z:5]"]
        );
    }

    #[test]
    fn skips_empty_segments() {
        assert_eq!(split_segments(",a[x:1],,b[y:2],"), vec!["a[x:1]", "b[y:2]"]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn call_body_runs_to_last_paren() {
        let (head, body) = match_call("addition(a(b),c) trailing").expect("call shape");
        assert_eq!(head, "addition");
        assert_eq!(body, "a(b),c");
        assert!(match_call("no parens here").is_none());
        assert!(match_call(")(").is_none());
    }

    #[test]
    fn quantity_defaults_to_zero() {
        assert_eq!(parse_quantity("7"), 7.0);
        assert_eq!(parse_quantity("2.5"), 2.5);
        assert_eq!(parse_quantity("many"), 0.0);
        assert_eq!(parse_quantity("-3"), 0.0);
        assert_eq!(parse_quantity(""), 0.0);
    }

    #[test]
    fn entity_bracket_body_ends_at_first_bracket() {
        let (head, entity) =
            parse_entity("container1[entity_type: apple, entity_quantity: 4] extra")
                .expect("entity shape");
        assert_eq!(head, "container1");
        assert_eq!(entity.entity_type, "apple");
        assert_eq!(entity.quantity, 4.0);
    }
}
