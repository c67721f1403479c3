//! Resolved model definitions.

use std::path::PathBuf;

use indexmap::IndexMap;
use smol_str::SmolStr;

/// A model checker call
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelCheckerCall {
    pub function: SmolStr,
    pub arguments: String,
}

/// One model: a named set of fields
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ModelDefinition {
    pub name: SmolStr,
    /// Field identifier → identifier used for it in this model. After
    /// inheritance this includes the parents' fields.
    pub fields: IndexMap<SmolStr, SmolStr>,
    /// Parent models, in declaration order
    #[cfg_attr(feature = "serde", serde(rename = "super"))]
    pub super_models: Vec<SmolStr>,
    pub documentation: String,
    pub checker: Vec<ModelCheckerCall>,
    /// File the model was read from
    pub file: PathBuf,
}

impl ModelDefinition {
    pub fn new(name: impl Into<SmolStr>, file: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            super_models: Vec::new(),
            documentation: String::new(),
            checker: Vec::new(),
            file: file.into(),
        }
    }
}

/// Every model of one compilation run, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize), serde(transparent))]
pub struct ModelDefinitionTable {
    models: IndexMap<SmolStr, ModelDefinition>,
}

impl ModelDefinitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.models.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ModelDefinition> {
        self.models.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    pub(crate) fn insert(&mut self, model: ModelDefinition) {
        self.models.insert(model.name.clone(), model);
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.models.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDefinition> {
        self.models.values()
    }
}
