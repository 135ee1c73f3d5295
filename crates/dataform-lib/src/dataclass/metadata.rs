//! The field list persisted on each transformed class.

use dataform_core::ClassInfo;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::FieldDescriptor;
use crate::{Error, Result};

/// Record stored in `ClassInfo::metadata` under the configured key.
///
/// Descendants merge their own fields on top of this instead of walking the
/// ancestor's body again.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Fields in final constructor order, keyed by name.
    pub attributes: IndexMap<String, FieldDescriptor>,
    pub frozen: bool,
}

impl ClassMetadata {
    pub fn new(fields: &[FieldDescriptor], frozen: bool) -> Self {
        Self {
            attributes: fields
                .iter()
                .map(|field| (field.name.clone(), field.clone()))
                .collect(),
            frozen,
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.attributes.values()
    }

    /// Read the record from `info`, if it has one.
    pub fn read(info: &ClassInfo, key: &str) -> Result<Option<Self>> {
        let Some(value) = info.metadata.get(key) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|source| Error::Metadata {
                class: info.fullname.clone(),
                key: key.to_owned(),
                source,
            })
    }

    /// Store the record on `info`, replacing any previous one.
    pub fn write(&self, info: &mut ClassInfo, key: &str) -> Result<()> {
        let value = serde_json::to_value(self).map_err(|source| Error::Metadata {
            class: info.fullname.clone(),
            key: key.to_owned(),
            source,
        })?;
        info.metadata.insert(key.to_owned(), value);
        Ok(())
    }
}
