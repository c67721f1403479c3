//! Compiler for field definition files.
//!
//! A run goes through these passes, each finishing before the next starts:
//!
//! 1. include closure: the given files plus everything they include
//! 2. classification: plain rules become definitions, override and extend
//!    rules are queued
//! 3. inheritance: queued `inherit_from` lists are merged parents first
//! 4. override, then extend, in file order
//! 5. alias indexing

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::{debug, info, trace};

use super::errors::{FieldParserError, SourceLocation};
use super::field_definition::{
    CheckerCall, FieldDefinition, FieldDefinitionTable, FieldKind, FieldRules,
    LegacyFieldMatchings, SubRule,
};
use super::inheritance::resolution_order;
use super::source::SourceLoader;
use crate::parser::{
    Checker, CreatorLine, ExprBody, FieldFile, FieldRule, Include, LegacyPayload, RuleBody,
    RuleMode, parse_field_file,
};

/// A parsed field file together with the path it was read from
type ParsedFile = (PathBuf, FieldFile);

/// Compiles field definition files into a [`FieldDefinitionTable`] and the
/// matching [`LegacyFieldMatchings`].
///
/// ```ignore
/// let loader = FsLoader;
/// let (fields, legacy) = FieldParser::new(&master_formats, &loader)
///     .with_base_dir("config/fields")
///     .compile(&["config/fields/atlantis.cfg"])?;
/// ```
pub struct FieldParser<'a> {
    master_formats: &'a IndexSet<SmolStr>,
    loader: &'a dyn SourceLoader,
    base_dir: Option<PathBuf>,
}

impl<'a> FieldParser<'a> {
    pub fn new(master_formats: &'a IndexSet<SmolStr>, loader: &'a dyn SourceLoader) -> Self {
        Self {
            master_formats,
            loader,
            base_dir: None,
        }
    }

    /// Directory searched for `include(...)` targets that are not found next
    /// to the including file
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// Compile `files` and everything they include.
    pub fn compile<I, P>(
        &self,
        files: I,
    ) -> Result<(FieldDefinitionTable, LegacyFieldMatchings), FieldParserError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let parsed = self.load_closure(files)?;

        let mut compiler = Compiler::default();
        let mut overrides = Vec::new();
        let mut extends = Vec::new();
        for (path, file) in &parsed {
            for rule in &file.rules {
                match rule.mode {
                    RuleMode::Override => overrides.push((path.as_path(), rule)),
                    RuleMode::Extend => extends.push((path.as_path(), rule)),
                    RuleMode::Create => compiler.create(path, rule)?,
                }
            }
        }
        debug!(
            fields = compiler.table.len(),
            pending = compiler.pending.len(),
            overrides = overrides.len(),
            extends = extends.len(),
            "classified field rules"
        );

        compiler.resolve_inheritance()?;
        for (path, rule) in overrides {
            compiler.apply_override(path, rule)?;
        }
        for (path, rule) in extends {
            compiler.apply_extend(path, rule)?;
        }

        let Compiler {
            mut table, legacy, ..
        } = compiler;
        table.index_aliases()?;
        info!(
            files = parsed.len(),
            fields = table.len(),
            legacy_formats = legacy.formats().count(),
            "compiled field definitions"
        );
        Ok((table, legacy))
    }

    /// Parse the given files, then their includes wave by wave. Files of one
    /// wave are parsed in parallel; the result keeps discovery order.
    fn load_closure<I, P>(&self, files: I) -> Result<Vec<ParsedFile>, FieldParserError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut seen_paths: FxHashSet<PathBuf> = FxHashSet::default();
        let mut seen_names: FxHashSet<OsString> = FxHashSet::default();
        let mut wave: Vec<PathBuf> = Vec::new();
        for file in files {
            let path = file.as_ref().to_path_buf();
            if seen_paths.insert(path.clone()) {
                if let Some(name) = path.file_name() {
                    seen_names.insert(name.to_os_string());
                }
                wave.push(path);
            }
        }

        let mut parsed = Vec::new();
        while !wave.is_empty() {
            let results: Vec<Result<ParsedFile, FieldParserError>> =
                wave.par_iter().map(|path| self.parse_file(path)).collect();

            let mut next = Vec::new();
            for result in results {
                let (path, file) = result?;
                for include in &file.includes {
                    let target = self.resolve_include(&path, include)?;
                    let name = target.file_name().map(|n| n.to_os_string());
                    let fresh = match name {
                        Some(name) => seen_names.insert(name),
                        None => seen_paths.insert(target.clone()),
                    };
                    if fresh {
                        debug!(from = %path.display(), include = %target.display(), "include discovered");
                        seen_paths.insert(target.clone());
                        next.push(target);
                    }
                }
                parsed.push((path, file));
            }
            wave = next;
        }
        Ok(parsed)
    }

    fn parse_file(&self, path: &Path) -> Result<ParsedFile, FieldParserError> {
        let source = self
            .loader
            .read(path)
            .map_err(|source| FieldParserError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file = parse_field_file(&source, self.master_formats)
            .map_err(|err| err.with_file(path))?;
        debug!(
            path = %path.display(),
            rules = file.rules.len(),
            includes = file.includes.len(),
            "parsed field file"
        );
        Ok((path.to_path_buf(), file))
    }

    /// Absolute paths are taken as is; relative ones are looked up next to
    /// the including file, then under the base directory, then as given.
    fn resolve_include(&self, from: &Path, include: &Include) -> Result<PathBuf, FieldParserError> {
        let target = Path::new(&include.path);
        let mut candidates = Vec::with_capacity(3);
        if target.is_absolute() {
            candidates.push(target.to_path_buf());
        } else {
            if let Some(dir) = from.parent() {
                candidates.push(dir.join(target));
            }
            if let Some(base) = &self.base_dir {
                candidates.push(base.join(target));
            }
            candidates.push(target.to_path_buf());
        }
        candidates
            .into_iter()
            .find(|candidate| self.loader.exists(candidate))
            .ok_or_else(|| FieldParserError::MissingInclude {
                include: include.path.clone(),
                location: SourceLocation::new(from, include.position),
            })
    }
}

/// Working state of one compilation run
#[derive(Default)]
struct Compiler {
    table: FieldDefinitionTable,
    legacy: LegacyFieldMatchings,
    /// Fields created with an `inherit_from` list, in discovery order
    pending: Vec<SmolStr>,
}

impl Compiler {
    fn create(&mut self, path: &Path, rule: &FieldRule) -> Result<(), FieldParserError> {
        let location = SourceLocation::new(path, rule.position);
        let inherit_from = rule.inherit_from.clone().filter(|parents| !parents.is_empty());
        let rules = match &rule.body {
            Some(body) => build_rules(body),
            None if inherit_from.is_some() => FieldRules::Creator(IndexMap::new()),
            None => {
                return Err(FieldParserError::MissingFieldType {
                    json_id: rule.json_id.clone(),
                    location,
                });
            }
        };

        let mut definition = FieldDefinition::new(rule.json_id.clone(), rules, location);
        definition.aliases = rule.aliases.clone();
        if definition.kind() != FieldKind::Creator
            && let Some(alias) = underscore_alias(&rule.json_id)
            && !definition.aliases.iter().any(|a| a == alias)
        {
            definition.aliases.push(SmolStr::new(alias));
        }
        definition.persistent_identifier = rule.persistent_identifier;
        definition.hidden = rule.hidden;
        definition.inherit_from = inherit_from;
        attach(&mut definition, rule);

        if definition.inherit_from.is_some() {
            self.pending.push(rule.json_id.clone());
        }
        trace!(json_id = %rule.json_id, kind = %definition.kind(), "created field");
        self.table.insert(definition)?;
        if let Some(body) = &rule.body {
            extract_legacy(&mut self.legacy, &rule.json_id, body);
        }
        Ok(())
    }

    /// Merge the queued `inherit_from` lists, parents before children. Roots
    /// are visited last-discovered first.
    fn resolve_inheritance(&mut self) -> Result<(), FieldParserError> {
        for json_id in &self.pending {
            if let Some(definition) = self.table.definition(json_id) {
                let parents = definition.inherit_from.as_deref().unwrap_or_default();
                check_parents(&self.table, definition, parents)?;
            }
        }

        let table = &self.table;
        let order = resolution_order(self.pending.iter().rev().cloned(), |json_id| {
            table
                .definition(json_id)
                .and_then(|definition| definition.inherit_from.clone())
                .unwrap_or_default()
        })
        .map_err(|cycle| FieldParserError::CyclicInheritance { cycle })?;

        let mut merged = 0usize;
        for json_id in order {
            let parents = self
                .table
                .definition_mut(&json_id)
                .and_then(|definition| definition.inherit_from.take());
            if let Some(parents) = parents {
                merge_parents(&mut self.table, &json_id, &parents, ParentMerge::Append)?;
                merged += 1;
            }
        }
        debug!(merged, "resolved field inheritance");
        Ok(())
    }

    fn apply_override(&mut self, path: &Path, rule: &FieldRule) -> Result<(), FieldParserError> {
        let location = SourceLocation::new(path, rule.position);
        let Some(definition) = self.table.definition_mut(&rule.json_id) else {
            return Err(FieldParserError::UndefinedTarget {
                json_id: rule.json_id.clone(),
                action: "override",
                location,
            });
        };

        definition.overwrite = true;
        if let Some(body) = &rule.body {
            match (&mut definition.rules, build_rules(body)) {
                (FieldRules::Creator(existing), FieldRules::Creator(replacement)) => {
                    existing.extend(replacement);
                }
                (rules, replacement) => *rules = replacement,
            }
        }
        if !rule.aliases.is_empty() {
            definition.aliases = rule.aliases.clone();
        }
        if rule.persistent_identifier.is_some() {
            definition.persistent_identifier = rule.persistent_identifier;
        }
        if let Some(parents) = rule.inherit_from.as_ref().filter(|p| !p.is_empty()) {
            definition.inherit_from = Some(parents.clone());
        }
        definition.hidden |= rule.hidden;
        attach(definition, rule);
        let parents = definition.inherit_from.take();
        debug!(json_id = %rule.json_id, %location, "applied override");

        if let Some(body) = &rule.body {
            extract_legacy(&mut self.legacy, &rule.json_id, body);
        }
        if let Some(parents) = parents {
            if let Some(definition) = self.table.definition(&rule.json_id) {
                check_parents(&self.table, definition, &parents)?;
            }
            merge_parents(&mut self.table, &rule.json_id, &parents, ParentMerge::Missing)?;
        }
        Ok(())
    }

    /// Extend only attaches checkers, producers and documentation.
    fn apply_extend(&mut self, path: &Path, rule: &FieldRule) -> Result<(), FieldParserError> {
        let location = SourceLocation::new(path, rule.position);
        let Some(definition) = self.table.definition_mut(&rule.json_id) else {
            return Err(FieldParserError::UndefinedTarget {
                json_id: rule.json_id.clone(),
                action: "extend",
                location,
            });
        };
        if let Some(body) = &rule.body {
            debug!(json_id = %rule.json_id, section = body.keyword(), "extend leaves rules untouched");
        }
        definition.hidden |= rule.hidden;
        attach(definition, rule);
        debug!(json_id = %rule.json_id, %location, "applied extend");
        Ok(())
    }
}

fn check_parents(
    table: &FieldDefinitionTable,
    definition: &FieldDefinition,
    parents: &[SmolStr],
) -> Result<(), FieldParserError> {
    for parent in parents {
        if *parent == definition.json_id {
            return Err(FieldParserError::SelfInheritance {
                json_id: definition.json_id.clone(),
                location: definition.location.clone(),
            });
        }
        if table.definition(parent).is_none() {
            return Err(FieldParserError::UnresolvedInheritance {
                json_id: definition.json_id.clone(),
                parent: parent.clone(),
                location: definition.location.clone(),
            });
        }
    }
    Ok(())
}

/// How parent rules and checkers join the child's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParentMerge {
    /// Append everything the parent has
    Append,
    /// Append only what the child does not already hold
    Missing,
}

impl ParentMerge {
    fn join<T: PartialEq>(self, target: &mut Vec<T>, items: Vec<T>) {
        for item in items {
            if self == Self::Append || !target.contains(&item) {
                target.push(item);
            }
        }
    }
}

/// Append each parent's per-format rules and checkers to the child's.
fn merge_parents(
    table: &mut FieldDefinitionTable,
    json_id: &SmolStr,
    parents: &[SmolStr],
    mode: ParentMerge,
) -> Result<(), FieldParserError> {
    for parent_id in parents {
        let Some(child) = table.definition(json_id) else {
            return Ok(());
        };
        let location = child.location.clone();
        let child_kind = child.kind();
        let Some(parent) = table.definition(parent_id) else {
            return Err(FieldParserError::UnresolvedInheritance {
                json_id: json_id.clone(),
                parent: parent_id.clone(),
                location,
            });
        };
        let (FieldKind::Creator, FieldRules::Creator(parent_rules)) = (child_kind, &parent.rules)
        else {
            return Err(FieldParserError::IncompatibleInheritance {
                json_id: json_id.clone(),
                kind: child_kind.as_str(),
                parent: parent_id.clone(),
                parent_kind: parent.kind().as_str(),
                location,
            });
        };
        let parent_rules = parent_rules.clone();
        let parent_checker = parent.checker.clone();

        if let Some(child) = table.definition_mut(json_id) {
            if let FieldRules::Creator(rules) = &mut child.rules {
                for (format, sub_rules) in parent_rules {
                    mode.join(rules.entry(format).or_default(), sub_rules);
                }
            }
            mode.join(&mut child.checker, parent_checker);
        }
        trace!(json_id = %json_id, parent = %parent_id, "merged parent field");
    }
    Ok(())
}

/// Attach checkers, producers and documentation. Once a field has been
/// overridden, new checkers and producers replace the old ones.
fn attach(definition: &mut FieldDefinition, rule: &FieldRule) {
    if !rule.checkers.is_empty() {
        if definition.overwrite {
            definition.checker.clear();
        }
        definition.checker.extend(rule.checkers.iter().map(checker_call));
    }
    if let Some(documentation) = &rule.documentation {
        definition.documentation = documentation.text.clone();
        definition.subfield_docs = documentation.subfields.clone();
    }
    if !rule.producers.is_empty() {
        if definition.overwrite {
            definition.producer.clear();
        }
        for (code, expression) in &rule.producers {
            definition
                .producer
                .entry(code.clone())
                .or_default()
                .push(expression.clone());
        }
    }
}

fn checker_call(checker: &Checker) -> CheckerCall {
    CheckerCall {
        master_formats: checker.master_formats.clone(),
        function: checker.function.clone(),
        arguments: checker.arguments.clone(),
    }
}

fn build_rules(body: &RuleBody) -> FieldRules {
    match body {
        RuleBody::Creator(lines) => {
            let mut rules: IndexMap<SmolStr, Vec<SubRule>> = IndexMap::new();
            for line in lines {
                rules
                    .entry(line.master_format.clone())
                    .or_default()
                    .push(creator_sub_rule(line));
            }
            FieldRules::Creator(rules)
        }
        RuleBody::Derived(expr) => FieldRules::Derived(expr_sub_rule(expr)),
        RuleBody::Calculated(expr) => FieldRules::Calculated(expr_sub_rule(expr)),
    }
}

fn creator_sub_rule(line: &CreatorLine) -> SubRule {
    let source_tags: IndexSet<&str> = line.source_tags.split_whitespace().collect();
    SubRule {
        source_tags: source_tags.into_iter().map(SmolStr::new).collect(),
        value: line.value.clone(),
        decorators: line.decorators.clone(),
    }
}

fn expr_sub_rule(expr: &ExprBody) -> SubRule {
    SubRule {
        source_tags: Vec::new(),
        value: expr.value.clone(),
        decorators: expr.decorators.clone(),
    }
}

/// `_name` is also reachable as `name`
fn underscore_alias(json_id: &str) -> Option<&str> {
    let rest = json_id.strip_prefix('_')?;
    rest.chars()
        .next()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|_| rest)
}

fn extract_legacy(legacy: &mut LegacyFieldMatchings, json_id: &str, body: &RuleBody) {
    match body {
        RuleBody::Creator(lines) => {
            for line in lines {
                for payload in &line.legacy {
                    let format = payload.master_format.as_ref().unwrap_or(&line.master_format);
                    register_legacy(legacy, format, json_id, payload);
                }
            }
        }
        RuleBody::Derived(expr) | RuleBody::Calculated(expr) => {
            for payload in &expr.legacy {
                if let Some(format) = &payload.master_format {
                    register_legacy(legacy, format, json_id, payload);
                }
            }
        }
    }
}

fn register_legacy(
    legacy: &mut LegacyFieldMatchings,
    master_format: &str,
    json_id: &str,
    payload: &LegacyPayload,
) {
    for entry in &payload.entries {
        let target = match entry.subfield.as_deref() {
            Some(subfield) if !subfield.is_empty() => SmolStr::new(format!("{json_id}.{subfield}")),
            _ => SmolStr::new(json_id),
        };
        for tag in entry.tags.iter() {
            legacy.insert(master_format, tag, target.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ErrorCode;
    use crate::semantic::MemoryLoader;

    fn formats() -> IndexSet<SmolStr> {
        ["MARC", "marc", "json"].into_iter().map(SmolStr::new).collect()
    }

    fn compile(
        files: &[(&str, &str)],
    ) -> Result<(FieldDefinitionTable, LegacyFieldMatchings), FieldParserError> {
        let mut loader = MemoryLoader::new();
        for (path, source) in files {
            loader.insert(*path, *source);
        }
        let formats = formats();
        let paths: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
        FieldParser::new(&formats, &loader).compile(paths)
    }

    fn tags(sub_rules: &[SubRule]) -> Vec<&str> {
        sub_rules
            .iter()
            .flat_map(|rule| rule.source_tags.iter().map(SmolStr::as_str))
            .collect()
    }

    #[test]
    fn test_source_tags_are_an_ordered_set() {
        let (table, _) = compile(&[(
            "a.cfg",
            "x:\n    creator:\n        marc, \"100__a 700__a 100__a\", value\n",
        )])
        .unwrap();
        let x = table.definition("x").unwrap();
        assert_eq!(tags(x.rules.for_format("marc")), vec!["100__a", "700__a"]);
    }

    #[test]
    fn test_inheritance_only_rule_builds_creator() {
        let (table, _) = compile(&[(
            "a.cfg",
            "base:\n    creator:\n        marc, \"001\", value\ncopy:\n    @inherit_from(('base',))\n",
        )])
        .unwrap();
        let copy = table.definition("copy").unwrap();
        assert_eq!(copy.kind(), FieldKind::Creator);
        assert_eq!(tags(copy.rules.for_format("marc")), vec!["001"]);
        assert_eq!(copy.inherit_from, None);
    }

    #[test]
    fn test_rule_without_body_or_parents() {
        let err = compile(&[("a.cfg", "x:\n    documentation:\n        'doc'\n")]).unwrap_err();
        assert!(matches!(err, FieldParserError::MissingFieldType { ref json_id, .. } if json_id == "x"));
    }

    #[test]
    fn test_underscore_alias_only_for_computed_fields() {
        let (table, _) = compile(&[(
            "a.cfg",
            "_first:\n    derived:\n        1\n_second:\n    creator:\n        marc, \"001\", value\n",
        )])
        .unwrap();
        assert_eq!(table.resolve("first").unwrap().json_id, "_first");
        assert!(table.resolve("second").is_none());
    }

    #[test]
    fn test_legacy_subfield_targets() {
        let (_, legacy) = compile(&[(
            "a.cfg",
            r#"
authors[0]:
    creator:
        @legacy((("100", "100__"), ""), ("100__a", "first author", "full_name"))
        marc, "100__", value
"#,
        )])
        .unwrap();
        assert_eq!(legacy.get("marc", "100"), &[SmolStr::new("authors[0]")]);
        assert_eq!(legacy.get("marc", "100__"), &[SmolStr::new("authors[0]")]);
        assert_eq!(
            legacy.get("marc", "100__a"),
            &[SmolStr::new("authors[0].full_name")]
        );
    }

    #[test]
    fn test_syntax_error_carries_file() {
        let err = compile(&[(
            "bad.cfg",
            "title:\n    creator:\n        MRC, \"245__a\", value\n",
        )])
        .unwrap_err();
        let FieldParserError::Syntax(syntax) = err else {
            panic!("expected a syntax error, got {err:?}");
        };
        assert_eq!(syntax.file.as_deref(), Some(Path::new("bad.cfg")));
        assert_eq!(syntax.code, ErrorCode::E0305);
        assert_eq!(syntax.line(), 3);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let loader = MemoryLoader::new();
        let formats = formats();
        let err = FieldParser::new(&formats, &loader)
            .compile(["nowhere.cfg"])
            .unwrap_err();
        assert!(matches!(err, FieldParserError::Io { .. }));
    }

    #[test]
    fn test_include_resolved_through_base_dir() {
        let loader = MemoryLoader::new()
            .with_file("main/a.cfg", "include('common.cfg')\n")
            .with_file("shared/common.cfg", "x:\n    derived:\n        1\n");
        let formats = formats();
        let (table, _) = FieldParser::new(&formats, &loader)
            .with_base_dir("shared")
            .compile(["main/a.cfg"])
            .unwrap();
        assert!(table.contains("x"));
    }

    #[test]
    fn test_override_of_override_keeps_latest_producers() {
        let (table, _) = compile(&[(
            "a.cfg",
            r#"
x:
    creator:
        marc, "001", value
    producer:
        json_for_marc, {"001": ""}
override x:
    producer:
        json_for_dc, {"dc:identifier": ""}
override x:
    producer:
        json_for_dc, {"dc:identifier": "id"}
"#,
        )])
        .unwrap();
        let x = table.definition("x").unwrap();
        assert_eq!(x.producer.len(), 1);
        assert_eq!(x.producer["json_for_dc"], vec!["{\"dc:identifier\": \"id\"}".to_string()]);
    }

    #[test]
    fn test_derived_override_replaces_creator_rules() {
        let (table, _) = compile(&[(
            "a.cfg",
            "x:\n    creator:\n        marc, \"001\", value\noverride x:\n    derived:\n        compute()\n",
        )])
        .unwrap();
        let x = table.definition("x").unwrap();
        assert_eq!(x.kind(), FieldKind::Derived);
        assert_eq!(x.rules.expression().unwrap().value, "compute()");
    }

    #[test]
    fn test_override_inherit_from_is_resolved() {
        let (table, _) = compile(&[(
            "a.cfg",
            r#"
a:
    creator:
        marc, "001", value
b:
    creator:
        json, "id", value
override b:
    @inherit_from(('a',))
"#,
        )])
        .unwrap();
        let b = table.definition("b").unwrap();
        assert_eq!(tags(b.rules.for_format("marc")), vec!["001"]);
        assert_eq!(tags(b.rules.for_format("json")), vec!["id"]);
        assert!(b.inherit_from.is_none());
    }

    #[test]
    fn test_inheriting_from_derived_field() {
        let err = compile(&[(
            "a.cfg",
            "a:\n    derived:\n        1\nb:\n    @inherit_from(('a',))\n",
        )])
        .unwrap_err();
        assert!(matches!(
            err,
            FieldParserError::IncompatibleInheritance { parent_kind: "derived", .. }
        ));
    }

    #[test]
    fn test_cyclic_inheritance() {
        let err = compile(&[(
            "a.cfg",
            "a:\n    @inherit_from(('b',))\nb:\n    @inherit_from(('a',))\n",
        )])
        .unwrap_err();
        let FieldParserError::CyclicInheritance { cycle } = err else {
            panic!("expected a cycle, got {err:?}");
        };
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 3);
    }

    #[test]
    fn test_hidden_flag_survives_extend() {
        let (table, _) = compile(&[(
            "a.cfg",
            "x:\n    derived:\n        1\n@hidden\nextend x:\n    documentation:\n        'doc'\n",
        )])
        .unwrap();
        let x = table.definition("x").unwrap();
        assert!(x.hidden);
        assert_eq!(x.documentation, "doc");
    }
}
