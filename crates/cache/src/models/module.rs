use crate::error::{ErrorKind, Result};
use crate::ids::{ErratumId, PkgId};
use std::str::FromStr;

/// A module name paired with one of its stream labels.
///
/// The same pair may name several numeric stream ids (one per module
/// version/context), so lookups by pair are always multi-valued.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleStream {
    pub module: String,
    pub stream: String,
}

impl ModuleStream {
    pub fn new(module: impl Into<String>, stream: impl Into<String>) -> Self {
        Self { module: module.into(), stream: stream.into() }
    }
}

/// Parses the `module:stream` notation used by OVAL module tests. Only the
/// first `:` separates; anything after it belongs to the stream.
impl FromStr for ModuleStream {
    type Err = crate::error::Error;
    fn from_str(value: &str) -> Result<Self> {
        match value.split_once(':') {
            Some((module, stream)) => Ok(Self::new(module, stream)),
            None => exn::bail!(ErrorKind::MalformedModuleStream(value.to_string())),
        }
    }
}

/// Composite key of `errata_modulepkg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PkgErratum {
    pub pkg_id: PkgId,
    pub erratum_id: ErratumId,
}
