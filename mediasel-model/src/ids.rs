use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ModelError;

/// Stable identifier of a media source (e.g. `"mikan"`, `"dmhy"`).
///
/// Cheap to clone; ordering and equality follow the underlying string so the
/// id can serve directly as a lexical tie-breaker.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MediaSourceId(Arc<str>);

impl MediaSourceId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Validating constructor for ids that arrive from user input or
    /// configuration files.
    pub fn try_new(id: &str) -> Result<Self, ModelError> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidSourceId(id.to_string()));
        }
        if trimmed.len() != id.len() {
            return Err(ModelError::InvalidSourceId(id.to_string()));
        }
        Ok(Self::new(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MediaSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MediaSourceId").field(&&*self.0).finish()
    }
}

impl fmt::Display for MediaSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MediaSourceId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_new(s)
    }
}

impl From<&str> for MediaSourceId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MediaSourceId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for MediaSourceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MediaSourceId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for MediaSourceId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for MediaSourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::try_new(&raw).map_err(serde::de::Error::custom)
    }
}
