//! Typed lookup queries against the metadata store.

use crate::hash::{MD5_HEX_LEN, Md5Checksum};
use std::fmt;

/// A validated file lookup.
///
/// Exactly one filter is carried. Construction validates the filter, so a
/// `FileQuery` that exists is always safe to send to a store.
#[derive(Clone, PartialEq, Eq)]
pub enum FileQuery {
    /// Exact match on the file name.
    ByName(String),
    /// Exact match on the MD5 checksum.
    ByChecksum(Md5Checksum),
}

impl FileQuery {
    /// Look up by exact file name. Empty names are rejected.
    pub fn by_name(name: impl Into<String>) -> crate::Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(crate::Error::InvalidQuery(
                "name filter must not be empty".to_string(),
            ));
        }
        Ok(Self::ByName(name))
    }

    /// Look up by checksum given in hex.
    pub fn by_checksum(md5_hex: &str) -> crate::Result<Self> {
        if md5_hex.len() != MD5_HEX_LEN {
            return Err(crate::Error::InvalidQuery(format!(
                "md5 filter must be {MD5_HEX_LEN} hex chars, got {}",
                md5_hex.len()
            )));
        }
        let checksum = Md5Checksum::from_hex(md5_hex)
            .map_err(|e| crate::Error::InvalidQuery(e.to_string()))?;
        Ok(Self::ByChecksum(checksum))
    }

    /// Build a query from loose filter fields, as received from a CLI or API.
    ///
    /// Exactly one of `name` and `md5` must be present.
    pub fn from_filter(name: Option<&str>, md5: Option<&str>) -> crate::Result<Self> {
        match (name, md5) {
            (Some(name), None) => Self::by_name(name),
            (None, Some(md5)) => Self::by_checksum(md5),
            (None, None) => Err(crate::Error::InvalidQuery(
                "query requires a name or md5 filter".to_string(),
            )),
            (Some(_), Some(_)) => Err(crate::Error::InvalidQuery(
                "query accepts only one of name or md5".to_string(),
            )),
        }
    }
}

impl fmt::Debug for FileQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "ByName({name:?})"),
            Self::ByChecksum(md5) => write!(f, "ByChecksum({md5})"),
        }
    }
}

impl fmt::Display for FileQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "filename={name}"),
            Self::ByChecksum(md5) => write!(f, "md5={md5}"),
        }
    }
}
