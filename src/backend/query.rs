//! GraphQL documents sent to the backend.

use crate::entity::EntityKind;

/// Query listing id and labels of every entity of `kind`.
pub fn list_query(kind: EntityKind) -> String {
    format!(
        "query {{\n  {} {{\n    id\n    label {{\n      text\n      lang\n    }}\n  }}\n}}",
        kind.collection()
    )
}

/// Mutation acting on `entity_id`, selecting `success`.
pub fn mutation_document(kind: EntityKind, entity_id: &str) -> String {
    format!(
        "mutation {{\n  {}({}: {}) {{\n    success\n  }}\n}}",
        kind.mutation(),
        kind.id_argument(),
        string_literal(entity_id)
    )
}

/// Quotes `value` as a GraphQL string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0C}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
