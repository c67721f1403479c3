//! The compiled tables of one run and the lookups built on them.

use indexmap::IndexMap;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::base::constants::DEFAULT_MODEL;
use crate::config::DefinitionConfig;
use crate::semantic::{
    FieldDefinition, FieldDefinitionTable, FieldParser, FieldParserError, LegacyFieldMatchings,
    ModelDefinitionTable, ModelParser, ModelParserError, SourceLoader,
};

/// Failure of a full compilation run
#[derive(Debug, Error)]
pub enum DefinitionError {
    #[error(transparent)]
    Field(#[from] FieldParserError),
    #[error(transparent)]
    Model(#[from] ModelParserError),
}

/// Union of several models
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedModel {
    /// Field identifier → identifier used for it in the merged models
    pub fields: IndexMap<SmolStr, SmolStr>,
    pub super_models: Vec<SmolStr>,
}

/// Field, legacy and model tables of one compilation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Definitions {
    pub fields: FieldDefinitionTable,
    pub legacy: LegacyFieldMatchings,
    pub models: ModelDefinitionTable,
}

impl Definitions {
    /// Compile fields first, then models against them.
    pub fn compile(config: &DefinitionConfig, loader: &dyn SourceLoader) -> Result<Self, DefinitionError> {
        let mut field_parser = FieldParser::new(&config.master_formats, loader);
        if let Some(base_dir) = &config.base_dir {
            field_parser = field_parser.with_base_dir(base_dir);
        }
        let (fields, legacy) = field_parser.compile(&config.field_files)?;
        let models = ModelParser::new(loader).compile(&config.model_files, &fields)?;
        Ok(Self {
            fields,
            legacy,
            models,
        })
    }

    /// For each legacy tag, the fields it maps to in `master_format`.
    ///
    /// Unknown tags and formats map to an empty list.
    pub fn guess_legacy_field_names<'t>(
        &self,
        tags: impl IntoIterator<Item = &'t str>,
        master_format: &str,
    ) -> IndexMap<&'t str, Vec<SmolStr>> {
        tags.into_iter()
            .map(|tag| (tag, self.legacy.get(master_format, tag).to_vec()))
            .collect()
    }

    /// Merge `models` left to right; later models win on shared keys.
    ///
    /// [`DEFAULT_MODEL`] and unknown names contribute every field mapped to
    /// itself.
    pub fn resolve_models<S: AsRef<str>>(&self, models: &[S]) -> ResolvedModel {
        let mut resolved = ResolvedModel::default();
        for name in models {
            let name = name.as_ref();
            match self.models.get(name).filter(|_| name != DEFAULT_MODEL) {
                Some(model) => {
                    resolved
                        .fields
                        .extend(model.fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                    resolved.super_models.extend(model.super_models.iter().cloned());
                }
                None => {
                    if name != DEFAULT_MODEL {
                        debug!(model = name, "unknown model, using every field");
                    }
                    resolved
                        .fields
                        .extend(self.fields.keys().map(|id| (id.clone(), id.clone())));
                }
            }
        }
        resolved
    }

    /// Definition of the field a model refers to as `field_name`.
    ///
    /// The name is matched against the merged model's values first, then
    /// looked up as an identifier or alias.
    pub fn field_definition_model_based<S: AsRef<str>>(
        &self,
        field_name: &str,
        models: &[S],
    ) -> Option<&FieldDefinition> {
        let resolved = self.resolve_models(models);
        let json_id = resolved
            .fields
            .iter()
            .find(|(_, name)| *name == field_name)
            .map(|(json_id, _)| json_id.as_str())
            .unwrap_or(field_name);
        self.fields.resolve(json_id)
    }

    /// Producer expressions of a field for one producer code.
    ///
    /// `None` when the field is unknown; an empty slice when it has no rules
    /// for `code`.
    pub fn producer_rules<S: AsRef<str>>(
        &self,
        field_name: &str,
        code: &str,
        models: &[S],
    ) -> Option<&[String]> {
        let definition = self.field_definition_model_based(field_name, models)?;
        Some(
            definition
                .producer
                .get(code)
                .map(Vec::as_slice)
                .unwrap_or_default(),
        )
    }

    /// The tables as pretty-printed JSON
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
