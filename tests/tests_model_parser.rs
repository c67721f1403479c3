//! Model compiler tests
//!
//! `ModelParser` against on-disk model files and a compiled field table.

mod helpers;

use std::path::PathBuf;

use helpers::definition_fixtures::{DefinitionDir, fields_from_sources};
use recfield::semantic::{FieldDefinitionTable, ModelParserError};
use rstest::{fixture, rstest};
use smol_str::SmolStr;

const FIELDS: &str = r#"
title:
    creator:
        marc, "245__a", value
abstract:
    creator:
        marc, "520__a", value
authors[0]:
    creator:
        marc, "100__", value
authors[n]:
    creator:
        marc, "700__", value
recid:
    calculated:
        get_recid()
"#;

#[fixture]
fn fields() -> FieldDefinitionTable {
    fields_from_sources(&[("fields.cfg", FIELDS)]).0
}

fn write_models(dir: &DefinitionDir, models: &[(&str, &str)]) -> Vec<PathBuf> {
    models
        .iter()
        .map(|(name, source)| dir.write(&format!("models/{name}"), source))
        .collect()
}

fn keys(fields: &indexmap::IndexMap<SmolStr, SmolStr>) -> Vec<&str> {
    fields.keys().map(SmolStr::as_str).collect()
}

#[rstest]
fn test_plain_model(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = write_models(
        &dir,
        &[(
            "article.cfg",
            "fields:\n    title\n    authors\n    authors[0]\ndocumentation:\n    \"\"\"Journal article\"\"\"\n",
        )],
    );
    let models = dir.compile_models(&files, &fields).unwrap();
    let article = models.get("article").unwrap();
    assert_eq!(keys(&article.fields), vec!["title", "authors", "authors[0]"]);
    assert_eq!(article.fields["authors"], "authors");
    assert_eq!(article.documentation, "Journal article");
    assert!(article.super_models.is_empty());
    assert!(article.checker.is_empty());
}

#[rstest]
#[case(&["base.cfg", "article.cfg"])]
#[case(&["article.cfg", "base.cfg"])]
fn test_child_fields_win_over_parents(fields: FieldDefinitionTable, #[case] order: &[&str]) {
    let dir = DefinitionDir::new();
    let sources = [
        ("base.cfg", "fields:\n    recid\n    title\n"),
        (
            "article.cfg",
            "fields:\n    @inherit_from(('base',))\n    title = main_title\n    abstract\n",
        ),
    ];
    let ordered: Vec<(&str, &str)> = order
        .iter()
        .filter_map(|name| sources.iter().find(|(n, _)| n == name).copied())
        .collect();
    let files = write_models(&dir, &ordered);

    let models = dir.compile_models(&files, &fields).unwrap();
    let article = models.get("article").unwrap();
    assert_eq!(keys(&article.fields), vec!["recid", "title", "abstract"]);
    assert_eq!(article.fields["title"], "title");
    assert_eq!(article.super_models, vec![SmolStr::new("base")]);
    // Parents are untouched
    assert_eq!(keys(&models.get("base").unwrap().fields), vec!["recid", "title"]);
}

#[rstest]
fn test_later_parent_wins(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = write_models(
        &dir,
        &[
            ("first.cfg", "fields:\n    title\n"),
            ("second.cfg", "fields:\n    abstract\n    title\n"),
            ("both.cfg", "fields:\n    @inherit_from(('first', 'second'))\n    recid\n"),
        ],
    );
    let models = dir.compile_models(&files, &fields).unwrap();
    let both = models.get("both").unwrap();
    assert_eq!(keys(&both.fields), vec!["title", "abstract", "recid"]);
}

#[rstest]
fn test_unknown_field_without_parents(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = write_models(&dir, &[("article.cfg", "fields:\n    title\n    subtitle\n")]);
    let err = dir.compile_models(&files, &fields).unwrap_err();
    match err {
        ModelParserError::UnknownField {
            model,
            json_id,
            location,
        } => {
            assert_eq!(model, "article");
            assert_eq!(json_id, "subtitle");
            assert_eq!(location.position.line, 3);
        }
        other => panic!("Expected an unknown field error, got {other}"),
    }
}

#[rstest]
fn test_duplicate_model_name(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = vec![
        dir.write("models/a/article.cfg", "fields:\n    title\n"),
        dir.write("models/b/article.cfg", "fields:\n    abstract\n"),
    ];
    let err = dir.compile_models(&files, &fields).unwrap_err();
    assert!(
        matches!(err, ModelParserError::DuplicateModel { ref name, .. } if name == "article"),
        "Expected a duplicate model error, got {err}"
    );
}

#[rstest]
#[case("documentation:\n    'No fields'\n")]
#[case("fields:\ndocumentation:\n    'No fields yet'\n")]
#[case("fields:\n")]
fn test_missing_fields_section(fields: FieldDefinitionTable, #[case] source: &str) {
    let dir = DefinitionDir::new();
    let files = write_models(&dir, &[("empty.cfg", source)]);
    let err = dir.compile_models(&files, &fields).unwrap_err();
    assert!(matches!(err, ModelParserError::MissingFields { ref name, .. } if name == "empty"));
}

#[rstest]
fn test_undefined_parent_found_after_parsing(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = write_models(
        &dir,
        &[("article.cfg", "fields:\n    @inherit_from(('ghost',))\n    title\n")],
    );
    let err = dir.compile_models(&files, &fields).unwrap_err();
    assert!(matches!(
        err,
        ModelParserError::UnknownModel { ref model, ref parent } if model == "article" && parent == "ghost"
    ));
}

#[rstest]
fn test_model_syntax_error_names_file(fields: FieldDefinitionTable) {
    let dir = DefinitionDir::new();
    let files = write_models(&dir, &[("article.cfg", "fields:\n    title\n      abstract\n")]);
    let err = dir.compile_models(&files, &fields).unwrap_err();
    let ModelParserError::Syntax(syntax) = err else {
        panic!("Expected a syntax error, got {err}");
    };
    assert_eq!(syntax.line(), 3);
    assert!(syntax.to_string().contains("article.cfg:3:"));
}
