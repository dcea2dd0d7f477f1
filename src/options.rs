use std::fmt;
use std::str::FromStr;

use crate::errors::MemoryMapError;

/// Expected access pattern, passed to the OS as a paging hint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AccessPattern {
    #[default]
    Normal,
    Sequential,
    Random,
}

impl AccessPattern {
    pub fn name(&self) -> &'static str {
        match self {
            AccessPattern::Normal => "normal",
            AccessPattern::Sequential => "sequential",
            AccessPattern::Random => "random",
        }
    }
}

impl FromStr for AccessPattern {
    type Err = MemoryMapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(AccessPattern::Normal),
            "sequential" => Ok(AccessPattern::Sequential),
            "random" => Ok(AccessPattern::Random),
            other => Err(MemoryMapError::InvalidOption(format!(
                "unknown access pattern {:?}, expected \"normal\", \"sequential\" or \"random\"",
                other
            ))),
        }
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options applied when a file is mapped.
#[derive(Clone, Debug, Default)]
pub struct MapOptions {
    pub access: AccessPattern,
    /// Prefault the whole mapping up front (Linux only, ignored elsewhere).
    pub populate: bool,
}

impl MapOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access(mut self, access: AccessPattern) -> Self {
        self.access = access;
        self
    }

    pub fn populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }
}
