use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opaque block type identifier: a namespace plus a name.
///
/// The textual form is `namespace/name`, where the name is the segment after
/// the last `/` (so `org/konstructs/dirt` has namespace `org/konstructs` and
/// name `dirt`). The engine never interprets ids beyond equality and
/// ordering; the only id it knows by heart is [`BlockTypeId::VACUUM`], the
/// content of every unset world cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BlockTypeId {
    namespace: Cow<'static, str>,
    name: Cow<'static, str>,
}

impl BlockTypeId {
    /// Empty space.
    pub const VACUUM: BlockTypeId = BlockTypeId::from_static("org/konstructs", "vacuum");

    /// Build an id from static strings, usable in `const` items.
    pub const fn from_static(namespace: &'static str, name: &'static str) -> Self {
        Self {
            namespace: Cow::Borrowed(namespace),
            name: Cow::Borrowed(name),
        }
    }

    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, BlockIdError> {
        let namespace = namespace.into();
        let name = name.into();
        if namespace.is_empty() {
            return Err(BlockIdError::EmptyNamespace(format!("{namespace}/{name}")));
        }
        if name.is_empty() || name.contains('/') {
            return Err(BlockIdError::InvalidName(format!("{namespace}/{name}")));
        }
        Ok(Self {
            namespace: Cow::Owned(namespace),
            name: Cow::Owned(name),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for BlockTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}

impl FromStr for BlockTypeId {
    type Err = BlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.rsplit_once('/') {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Err(BlockIdError::MissingNamespace(s.to_string())),
        }
    }
}

impl TryFrom<String> for BlockTypeId {
    type Error = BlockIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BlockTypeId> for String {
    fn from(id: BlockTypeId) -> Self {
        id.to_string()
    }
}

/// Malformed textual block id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockIdError {
    #[error("block id `{0}` has no namespace (expected `namespace/name`)")]
    MissingNamespace(String),
    #[error("block id `{0}` has an empty namespace")]
    EmptyNamespace(String),
    #[error("block id `{0}` has an empty or invalid name")]
    InvalidName(String),
}
