//! Schema integrity checker
//!
//! Structural validation run at authoring time, before a form schema is
//! saved. Returns actionable error messages; an empty list means valid.
//! Checks run in order: non-empty field list, field_id uniqueness, option
//! presence, conditional-reference existence and self-reference, then cycle
//! detection over the conditional-evidence dependency graph.

use crate::field::FieldType;
use crate::schema::FormSchema;
use std::collections::{HashMap, HashSet};

/// Validate a form schema's structure. Empty result means the schema is
/// safe to save.
pub fn generate_validation_errors(schema: &FormSchema) -> Vec<String> {
    let mut errors = Vec::new();

    if schema.fields.is_empty() {
        errors.push("Form schema must have at least one field".to_string());
        return errors;
    }

    check_duplicate_ids(schema, &mut errors);
    check_options_present(schema, &mut errors);
    check_conditional_references(schema, &mut errors);
    check_cycles(schema, &mut errors);

    errors
}

fn check_duplicate_ids(schema: &FormSchema, errors: &mut Vec<String>) {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for field in &schema.fields {
        if !seen.insert(field.field_id.as_str()) && !duplicates.contains(&field.field_id) {
            duplicates.push(field.field_id.clone());
        }
    }
    if !duplicates.is_empty() {
        errors.push(format!(
            "Duplicate field_ids found: {}",
            duplicates.join(", ")
        ));
    }
}

fn check_options_present(schema: &FormSchema, errors: &mut Vec<String>) {
    for field in &schema.fields {
        if field.field_type.has_options() && field.options.is_empty() {
            let kind = match field.field_type {
                FieldType::Checkbox => "Checkbox",
                FieldType::Radio => "Radio button",
                _ => "Select",
            };
            errors.push(format!(
                "{} field '{}' must have at least one option",
                kind, field.field_id
            ));
        }
    }
}

fn check_conditional_references(schema: &FormSchema, errors: &mut Vec<String>) {
    let known: HashSet<&str> = schema.fields.iter().map(|f| f.field_id.as_str()).collect();
    for field in &schema.fields {
        let Some(req) = &field.conditional_mov_requirement else {
            continue;
        };
        if req.field_id == field.field_id {
            errors.push(format!(
                "Field '{}' references itself in conditional MOV logic",
                field.field_id
            ));
        } else if !known.contains(req.field_id.as_str()) {
            errors.push(format!(
                "Field '{}' has invalid conditional MOV logic: referenced field '{}' does not exist",
                field.field_id, req.field_id
            ));
        }
    }
}

/// Cycle detection over the conditional-evidence dependency graph, with the
/// full cycle path reconstructed for the error message. Self-loops are
/// excluded here; they are already reported as self-reference errors.
fn check_cycles(schema: &FormSchema, errors: &mut Vec<String>) {
    let mut dependencies: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for field in &schema.fields {
        order.push(field.field_id.as_str());
        let deps = dependencies.entry(field.field_id.as_str()).or_default();
        if let Some(req) = &field.conditional_mov_requirement {
            if req.field_id != field.field_id {
                deps.push(req.field_id.as_str());
            }
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    for start in order {
        if visited.contains(start) {
            continue;
        }
        let mut stack: Vec<&str> = Vec::new();
        if let Some(cycle) = find_cycle_path(start, &dependencies, &mut visited, &mut stack) {
            errors.push(format!(
                "Circular reference detected in field dependencies: {}",
                cycle.join(" -> ")
            ));
        }
    }
}

fn find_cycle_path<'a>(
    node: &'a str,
    dependencies: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
) -> Option<Vec<&'a str>> {
    visited.insert(node);
    stack.push(node);

    for &neighbor in dependencies.get(node).map(Vec::as_slice).unwrap_or(&[]) {
        if !visited.contains(neighbor) {
            if let Some(cycle) = find_cycle_path(neighbor, dependencies, visited, stack) {
                return Some(cycle);
            }
        } else if let Some(pos) = stack.iter().position(|&n| n == neighbor) {
            let mut cycle: Vec<&str> = stack[pos..].to_vec();
            cycle.push(neighbor);
            return Some(cycle);
        }
    }

    stack.pop();
    None
}
