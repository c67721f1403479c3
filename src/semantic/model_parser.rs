//! Compiler for model definition files.
//!
//! One file describes one model, named after the file. Fields are checked
//! against an already compiled [`FieldDefinitionTable`]; `@inherit_from`
//! parents are resolved after every file has been read, so models may refer
//! to models defined in later files.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rayon::prelude::*;
use smol_str::SmolStr;
use tracing::{debug, info};

use super::errors::{ModelParserError, SourceLocation};
use super::field_definition::FieldDefinitionTable;
use super::inheritance::resolution_order;
use super::model_definition::{ModelCheckerCall, ModelDefinition, ModelDefinitionTable};
use super::source::SourceLoader;
use crate::parser::{ModelFieldItem, ModelFile, parse_model_file};

/// Model name of a definition file: its file name up to the first `.`
pub fn model_name(path: &Path) -> SmolStr {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    let name = file_name.split('.').next().unwrap_or_default();
    SmolStr::new(name)
}

pub struct ModelParser<'a> {
    loader: &'a dyn SourceLoader,
}

impl<'a> ModelParser<'a> {
    pub fn new(loader: &'a dyn SourceLoader) -> Self {
        Self { loader }
    }

    /// Compile the model files against the given field table.
    pub fn compile<I, P>(
        &self,
        files: I,
        fields: &FieldDefinitionTable,
    ) -> Result<ModelDefinitionTable, ModelParserError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let paths: Vec<PathBuf> = files.into_iter().map(|p| p.as_ref().to_path_buf()).collect();
        let parsed: Vec<Result<(PathBuf, ModelFile), ModelParserError>> = paths
            .par_iter()
            .map(|path| self.parse_file(path))
            .collect();

        let mut table = ModelDefinitionTable::new();
        for result in parsed {
            let (path, file) = result?;
            let model = build_model(path, file, fields, &table)?;
            table.insert(model);
        }

        resolve_inheritance(&mut table)?;
        info!(models = table.len(), "compiled model definitions");
        Ok(table)
    }

    fn parse_file(&self, path: &Path) -> Result<(PathBuf, ModelFile), ModelParserError> {
        let source = self
            .loader
            .read(path)
            .map_err(|source| ModelParserError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let file = parse_model_file(&source).map_err(|err| err.with_file(path))?;
        debug!(path = %path.display(), "parsed model file");
        Ok((path.to_path_buf(), file))
    }
}

fn build_model(
    path: PathBuf,
    file: ModelFile,
    fields: &FieldDefinitionTable,
    table: &ModelDefinitionTable,
) -> Result<ModelDefinition, ModelParserError> {
    let name = model_name(&path);
    if let Some(previous) = table.get(&name) {
        return Err(ModelParserError::DuplicateModel {
            name,
            file: path,
            previous: previous.file.clone(),
        });
    }
    let Some(items) = file.fields.filter(|items| !items.is_empty()) else {
        return Err(ModelParserError::MissingFields { name, file: path });
    };

    let mut model = ModelDefinition::new(name, path);
    for item in items {
        match item {
            ModelFieldItem::InheritFrom(parents) => model.super_models.extend(parents),
            // The right-hand side of `json_id = alias` is not kept
            ModelFieldItem::Field {
                json_id, position, ..
            } => {
                if !fields.contains(&json_id) {
                    return Err(ModelParserError::UnknownField {
                        model: model.name,
                        json_id,
                        location: SourceLocation::new(model.file, position),
                    });
                }
                model.fields.insert(json_id.clone(), json_id);
            }
        }
    }
    model.documentation = file.documentation.unwrap_or_default();
    model.checker = file
        .checkers
        .into_iter()
        .map(|checker| ModelCheckerCall {
            function: checker.function,
            arguments: checker.arguments,
        })
        .collect();
    debug!(
        model = %model.name,
        fields = model.fields.len(),
        parents = model.super_models.len(),
        "built model"
    );
    Ok(model)
}

/// Pull every parent's fields into its children. Later parents win over
/// earlier ones and the model's own fields win over all parents.
fn resolve_inheritance(table: &mut ModelDefinitionTable) -> Result<(), ModelParserError> {
    for model in table.iter() {
        if let Some(parent) = model.super_models.iter().find(|p| !table.contains(p)) {
            return Err(ModelParserError::UnknownModel {
                model: model.name.clone(),
                parent: parent.clone(),
            });
        }
    }

    let names: Vec<SmolStr> = table.names().cloned().collect();
    let order = resolution_order(names, |name| {
        table
            .get(name)
            .map(|model| model.super_models.clone())
            .unwrap_or_default()
    })
    .map_err(|cycle| ModelParserError::CyclicInheritance { cycle })?;

    for name in order {
        let Some(model) = table.get(&name) else {
            continue;
        };
        if model.super_models.is_empty() {
            continue;
        }
        let mut fields: IndexMap<SmolStr, SmolStr> = IndexMap::new();
        for parent in &model.super_models {
            if let Some(parent) = table.get(parent) {
                fields.extend(parent.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        fields.extend(model.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        if let Some(model) = table.get_mut(&name) {
            model.fields = fields;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::MemoryLoader;
    use crate::semantic::field_definition::{FieldDefinition, FieldRules};

    fn fields(ids: &[&str]) -> FieldDefinitionTable {
        let mut table = FieldDefinitionTable::new();
        for id in ids {
            table
                .insert(FieldDefinition::new(
                    *id,
                    FieldRules::Creator(IndexMap::new()),
                    SourceLocation::default(),
                ))
                .unwrap();
        }
        table
    }

    fn compile(files: &[(&str, &str)], known: &[&str]) -> Result<ModelDefinitionTable, ModelParserError> {
        let mut loader = MemoryLoader::new();
        for (path, source) in files {
            loader.insert(*path, *source);
        }
        let paths: Vec<&str> = files.iter().map(|(path, _)| *path).collect();
        ModelParser::new(&loader).compile(paths, &fields(known))
    }

    #[test]
    fn test_model_name_is_file_stem_before_first_dot() {
        assert_eq!(model_name(Path::new("models/article.cfg")), "article");
        assert_eq!(model_name(Path::new("models/picture.v2.cfg")), "picture");
    }

    #[test]
    fn test_alias_form_stores_field_id() {
        let table = compile(&[("a.cfg", "fields:\n    title = main_title\n")], &["title"]).unwrap();
        assert_eq!(table.get("a").unwrap().fields["title"], "title");
    }

    #[test]
    fn test_multi_level_inheritance() {
        let table = compile(
            &[
                ("c.cfg", "fields:\n    @inherit_from(('b',))\n    z\n"),
                ("b.cfg", "fields:\n    @inherit_from(['a'])\n    y\n"),
                ("a.cfg", "fields:\n    x\n"),
            ],
            &["x", "y", "z"],
        )
        .unwrap();
        let c = table.get("c").unwrap();
        let keys: Vec<_> = c.fields.keys().map(SmolStr::as_str).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
        assert_eq!(c.super_models, vec![SmolStr::new("b")]);
    }

    #[test]
    fn test_unknown_parent_model() {
        let err = compile(&[("a.cfg", "fields:\n    @inherit_from(('ghost',))\n    x\n")], &["x"])
            .unwrap_err();
        assert!(matches!(err, ModelParserError::UnknownModel { ref parent, .. } if parent == "ghost"));
    }

    #[test]
    fn test_cyclic_models() {
        let err = compile(
            &[
                ("a.cfg", "fields:\n    @inherit_from(('b',))\n"),
                ("b.cfg", "fields:\n    @inherit_from(('a',))\n"),
            ],
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, ModelParserError::CyclicInheritance { .. }));
    }

    #[test]
    fn test_documentation_and_checkers() {
        let table = compile(
            &[(
                "a.cfg",
                "fields:\n    x\ndocumentation:\n    'Article'\nchecker:\n    checks.has('x')\n",
            )],
            &["x"],
        )
        .unwrap();
        let a = table.get("a").unwrap();
        assert_eq!(a.documentation, "Article");
        assert_eq!(
            a.checker,
            vec![ModelCheckerCall {
                function: "has".into(),
                arguments: "'x'".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_field_location() {
        let err = compile(&[("a.cfg", "fields:\n    x\n    nope\n")], &["x"]).unwrap_err();
        let ModelParserError::UnknownField { location, .. } = err else {
            panic!("expected an unknown field error, got {err:?}");
        };
        assert_eq!(location.to_string(), "a.cfg:3:5");
    }
}
