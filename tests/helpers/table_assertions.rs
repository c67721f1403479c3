//! Assertions over compiled definition tables.

use recfield::semantic::{FieldDefinition, FieldDefinitionTable};

/// Get a field definition or panic with the known identifiers.
pub fn field<'a>(table: &'a FieldDefinitionTable, json_id: &str) -> &'a FieldDefinition {
    table.definition(json_id).unwrap_or_else(|| {
        let known: Vec<_> = table.keys().map(|k| k.as_str()).collect();
        panic!("Field '{json_id}' not found, known: {known:?}")
    })
}

/// Source tags of every sub-rule for one master format, in order.
pub fn format_tags<'a>(definition: &'a FieldDefinition, master_format: &str) -> Vec<&'a str> {
    definition
        .rules
        .for_format(master_format)
        .iter()
        .flat_map(|rule| rule.source_tags.iter().map(|t| t.as_str()))
        .collect()
}

/// Checker function names in order.
pub fn checker_names(definition: &FieldDefinition) -> Vec<&str> {
    definition
        .checker
        .iter()
        .map(|checker| checker.function.as_str())
        .collect()
}
