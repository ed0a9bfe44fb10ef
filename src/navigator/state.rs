/// Navigation state definitions
use std::fmt;

/// Where the navigator currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavState {
    /// At a folder listing; forward moves are allowed
    AtFolder,

    /// At a table descriptor; only back, reset and direct paths leave it
    AtTable,
}

impl NavState {
    /// Returns true if no forward move is defined from this state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::AtTable)
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtFolder => write!(f, "folder"),
            Self::AtTable => write!(f, "table"),
        }
    }
}

/// A forward move: a child index or a literal child id
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Index(usize),
    Id(String),
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{}", index),
            Self::Id(id) => write!(f, "{}", id),
        }
    }
}

impl From<usize> for Selection {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for Selection {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for Selection {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}
