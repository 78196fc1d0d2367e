use std::collections::BTreeMap;

use crate::types::OperationDefinition;

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OperationsMap {
    #[serde(default, rename = "basePath")]
    pub base_path: String,

    #[serde(default)]
    pub operations: BTreeMap<String, OperationDefinition>,
}

impl OperationsMap {
    pub fn get(&self, key: &str) -> Option<&OperationDefinition> {
        self.operations.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
