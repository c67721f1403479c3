//! Resolved field definitions and the tables that hold them.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use super::errors::{FieldParserError, SourceLocation};
use crate::base::constants::{ALL_MARKER, FIRST_MARKER};
use crate::parser::RuleDecorators;

/// The three kinds of field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum FieldKind {
    /// Extracted from source records, one rule list per master format
    Creator,
    /// Computed from other fields
    Derived,
    /// Computed independently of the source record
    Calculated,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Derived => "derived",
            Self::Calculated => "calculated",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extraction or computation rule
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SubRule {
    /// Legacy tags the rule reads; empty for derived and calculated fields
    pub source_tags: Vec<SmolStr>,
    /// Raw expression text
    pub value: String,
    pub decorators: RuleDecorators,
}

/// Rules of a field, shaped by its kind
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(rename_all = "lowercase"))]
pub enum FieldRules {
    Creator(IndexMap<SmolStr, Vec<SubRule>>),
    Derived(SubRule),
    Calculated(SubRule),
}

impl FieldRules {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Creator(_) => FieldKind::Creator,
            Self::Derived(_) => FieldKind::Derived,
            Self::Calculated(_) => FieldKind::Calculated,
        }
    }

    /// Per-format rules of a creator field
    pub fn creator(&self) -> Option<&IndexMap<SmolStr, Vec<SubRule>>> {
        match self {
            Self::Creator(rules) => Some(rules),
            _ => None,
        }
    }

    /// Rules for one master format of a creator field
    pub fn for_format(&self, master_format: &str) -> &[SubRule] {
        self.creator()
            .and_then(|rules| rules.get(master_format))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The single rule of a derived or calculated field
    pub fn expression(&self) -> Option<&SubRule> {
        match self {
            Self::Derived(rule) | Self::Calculated(rule) => Some(rule),
            Self::Creator(_) => None,
        }
    }
}

/// A checker attached to a field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CheckerCall {
    /// Master formats the checker applies to; `["all"]` by default
    pub master_formats: Vec<SmolStr>,
    pub function: SmolStr,
    /// Raw argument text without the parentheses
    pub arguments: String,
}

impl CheckerCall {
    pub fn new(
        master_formats: impl IntoIterator<Item = impl Into<SmolStr>>,
        function: impl Into<SmolStr>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            master_formats: master_formats.into_iter().map(Into::into).collect(),
            function: function.into(),
            arguments: arguments.into(),
        }
    }
}

/// A fully resolved field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FieldDefinition {
    pub json_id: SmolStr,
    pub rules: FieldRules,
    pub checker: Vec<CheckerCall>,
    pub documentation: String,
    /// Documentation of nested subfields, by dotted path
    pub subfield_docs: IndexMap<SmolStr, String>,
    /// Producer expressions by producer code
    pub producer: IndexMap<SmolStr, Vec<String>>,
    pub aliases: Vec<SmolStr>,
    pub persistent_identifier: Option<i64>,
    /// Pending parents; always `None` once compilation has finished
    pub inherit_from: Option<Vec<SmolStr>>,
    /// Set once an override rule has touched the field
    pub overwrite: bool,
    pub hidden: bool,
    /// Where the field was created
    pub location: SourceLocation,
}

impl FieldDefinition {
    pub fn new(json_id: impl Into<SmolStr>, rules: FieldRules, location: SourceLocation) -> Self {
        Self {
            json_id: json_id.into(),
            rules,
            checker: Vec::new(),
            documentation: String::new(),
            subfield_docs: IndexMap::new(),
            producer: IndexMap::new(),
            aliases: Vec::new(),
            persistent_identifier: None,
            inherit_from: None,
            overwrite: false,
            hidden: false,
            location,
        }
    }

    pub fn kind(&self) -> FieldKind {
        self.rules.kind()
    }
}

/// An entry of the field table: a field, or the marked variants of a field
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(untagged))]
pub enum FieldEntry {
    Definition(Box<FieldDefinition>),
    /// `authors` → `["authors[0]", "authors[n]"]`
    Group(Vec<SmolStr>),
}

impl FieldEntry {
    pub fn as_definition(&self) -> Option<&FieldDefinition> {
        match self {
            Self::Definition(def) => Some(def),
            Self::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&[SmolStr]> {
        match self {
            Self::Group(ids) => Some(ids),
            Self::Definition(_) => None,
        }
    }
}

/// Strip a trailing `[0]` / `[n]` marker
pub fn bare_name(json_id: &str) -> Option<&str> {
    json_id
        .strip_suffix(FIRST_MARKER)
        .or_else(|| json_id.strip_suffix(ALL_MARKER))
}

/// Every field of one compilation run, keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct FieldDefinitionTable {
    entries: IndexMap<SmolStr, FieldEntry>,
    #[cfg_attr(feature = "serde", serde(skip))]
    aliases: FxHashMap<SmolStr, SmolStr>,
}

impl FieldDefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Field or group registered under exactly this key
    pub fn contains(&self, json_id: &str) -> bool {
        self.entries.contains_key(json_id)
    }

    pub fn get(&self, json_id: &str) -> Option<&FieldEntry> {
        self.entries.get(json_id)
    }

    pub fn definition(&self, json_id: &str) -> Option<&FieldDefinition> {
        self.get(json_id).and_then(FieldEntry::as_definition)
    }

    pub(crate) fn definition_mut(&mut self, json_id: &str) -> Option<&mut FieldDefinition> {
        match self.entries.get_mut(json_id) {
            Some(FieldEntry::Definition(def)) => Some(def),
            _ => None,
        }
    }

    /// Marked variants registered under a bare name
    pub fn group(&self, bare: &str) -> Option<&[SmolStr]> {
        self.get(bare).and_then(FieldEntry::as_group)
    }

    /// Field by identifier or alias
    pub fn resolve(&self, name: &str) -> Option<&FieldDefinition> {
        self.definition(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|json_id| self.definition(json_id))
        })
    }

    /// Identifier a name or alias stands for
    pub fn canonical_id(&self, name: &str) -> Option<&SmolStr> {
        match self.entries.get_key_value(name) {
            Some((key, _)) => Some(key),
            None => self.aliases.get(name),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SmolStr, &FieldEntry)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &SmolStr> {
        self.entries.keys()
    }

    /// Fields only, groups skipped
    pub fn definitions(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.entries.values().filter_map(FieldEntry::as_definition)
    }

    /// Register a new field; marked identifiers also join the group of their
    /// bare name.
    pub(crate) fn insert(&mut self, definition: FieldDefinition) -> Result<(), FieldParserError> {
        let json_id = definition.json_id.clone();
        match self.entries.get(&json_id) {
            Some(FieldEntry::Definition(previous)) => {
                return Err(FieldParserError::DuplicateField {
                    json_id,
                    location: definition.location,
                    previous: previous.location.clone(),
                });
            }
            Some(FieldEntry::Group(_)) => {
                return Err(FieldParserError::MarkerConflict {
                    json_id,
                    location: definition.location,
                });
            }
            None => {}
        }
        if let Some(bare) = bare_name(&json_id) {
            match self.entries.entry(SmolStr::new(bare)).or_insert_with(|| FieldEntry::Group(Vec::new())) {
                FieldEntry::Group(ids) => ids.push(json_id.clone()),
                FieldEntry::Definition(_) => {
                    return Err(FieldParserError::MarkerConflict {
                        json_id: SmolStr::new(bare),
                        location: definition.location,
                    });
                }
            }
        }
        self.entries
            .insert(json_id, FieldEntry::Definition(Box::new(definition)));
        Ok(())
    }

    /// Build the alias lookup; every alias must name exactly one field.
    pub(crate) fn index_aliases(&mut self) -> Result<(), FieldParserError> {
        let mut aliases: FxHashMap<SmolStr, SmolStr> = FxHashMap::default();
        for def in self.definitions() {
            for alias in &def.aliases {
                if *alias == def.json_id {
                    continue;
                }
                let existing = if self.entries.contains_key(alias) {
                    Some(alias.clone())
                } else {
                    aliases.get(alias).filter(|owner| **owner != def.json_id).cloned()
                };
                if let Some(existing) = existing {
                    return Err(FieldParserError::AliasConflict {
                        alias: alias.clone(),
                        json_id: def.json_id.clone(),
                        existing,
                    });
                }
                aliases.insert(alias.clone(), def.json_id.clone());
            }
        }
        self.aliases = aliases;
        Ok(())
    }
}

/// Legacy tags of each master format and the fields they map to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct LegacyFieldMatchings {
    formats: IndexMap<SmolStr, IndexMap<SmolStr, Vec<SmolStr>>>,
}

impl LegacyFieldMatchings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `target` to the fields reached through `tag`
    pub fn insert(&mut self, master_format: &str, tag: &str, target: impl Into<SmolStr>) {
        self.formats
            .entry(SmolStr::new(master_format))
            .or_default()
            .entry(SmolStr::new(tag))
            .or_default()
            .push(target.into());
    }

    /// Fields a legacy tag maps to; empty when unknown
    pub fn get(&self, master_format: &str, tag: &str) -> &[SmolStr] {
        self.formats
            .get(master_format)
            .and_then(|tags| tags.get(tag))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn format(&self, master_format: &str) -> Option<&IndexMap<SmolStr, Vec<SmolStr>>> {
        self.formats.get(master_format)
    }

    pub fn formats(&self) -> impl Iterator<Item = &SmolStr> {
        self.formats.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Position;

    fn creator(json_id: &str) -> FieldDefinition {
        FieldDefinition::new(
            json_id,
            FieldRules::Creator(IndexMap::new()),
            SourceLocation::new("f.cfg", Position::new(1, 1)),
        )
    }

    #[test]
    fn test_marked_variants_are_grouped() {
        let mut table = FieldDefinitionTable::new();
        table.insert(creator("authors[0]")).unwrap();
        table.insert(creator("authors[n]")).unwrap();
        assert_eq!(
            table.group("authors"),
            Some(&[SmolStr::new("authors[0]"), SmolStr::new("authors[n]")][..])
        );
        assert!(table.definition("authors[0]").is_some());
        assert!(table.definition("authors").is_none());
        assert!(table.contains("authors"));
    }

    #[test]
    fn test_duplicate_insert() {
        let mut table = FieldDefinitionTable::new();
        table.insert(creator("title")).unwrap();
        let err = table.insert(creator("title")).unwrap_err();
        assert!(matches!(err, FieldParserError::DuplicateField { .. }));
    }

    #[test]
    fn test_bare_name_clashes_with_group() {
        let mut table = FieldDefinitionTable::new();
        table.insert(creator("authors[0]")).unwrap();
        let err = table.insert(creator("authors")).unwrap_err();
        assert!(matches!(err, FieldParserError::MarkerConflict { .. }));

        let mut table = FieldDefinitionTable::new();
        table.insert(creator("authors")).unwrap();
        let err = table.insert(creator("authors[n]")).unwrap_err();
        assert!(matches!(err, FieldParserError::MarkerConflict { .. }));
    }

    #[test]
    fn test_alias_resolution_and_conflicts() {
        let mut table = FieldDefinitionTable::new();
        let mut title = creator("title");
        title.aliases = vec!["title_alt".into()];
        table.insert(title).unwrap();
        table.insert(creator("abstract")).unwrap();
        table.index_aliases().unwrap();
        assert_eq!(table.resolve("title_alt").unwrap().json_id, "title");
        assert_eq!(table.canonical_id("title_alt").unwrap(), "title");

        let mut other = creator("subtitle");
        other.aliases = vec!["title_alt".into()];
        table.insert(other).unwrap();
        let err = table.index_aliases().unwrap_err();
        assert!(matches!(err, FieldParserError::AliasConflict { ref existing, .. } if existing == "title"));
    }

    #[test]
    fn test_alias_equal_to_field_id() {
        let mut table = FieldDefinitionTable::new();
        let mut title = creator("title");
        title.aliases = vec!["abstract".into()];
        table.insert(title).unwrap();
        table.insert(creator("abstract")).unwrap();
        assert!(table.index_aliases().is_err());
    }

    #[test]
    fn test_legacy_matchings_append() {
        let mut legacy = LegacyFieldMatchings::new();
        legacy.insert("marc", "100__a", "authors[0].full_name");
        legacy.insert("marc", "100__a", "first_author");
        assert_eq!(legacy.get("marc", "100__a").len(), 2);
        assert!(legacy.get("marc", "245__a").is_empty());
        assert!(legacy.get("xml", "100__a").is_empty());
    }

    #[test]
    fn test_bare_name() {
        assert_eq!(bare_name("authors[0]"), Some("authors"));
        assert_eq!(bare_name("authors[n]"), Some("authors"));
        assert_eq!(bare_name("authors"), None);
    }
}
