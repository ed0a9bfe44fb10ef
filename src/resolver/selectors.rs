use std::collections::BTreeMap;

/// Caller-supplied values per variable for one fetch
///
/// Keys match either a variable's code or its text; values are machine
/// codes or human labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorSet {
    entries: BTreeMap<String, Vec<String>>,
}

impl SelectorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SelectorSet::insert`]
    pub fn with<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, values);
        self
    }

    /// Selects a single value
    pub fn with_one(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value: String = value.into();
        self.with(name, [value])
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for SelectorSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (name, values) in iter {
            set.insert(name, values);
        }
        set
    }
}

/// Selections remembered for the whole session
///
/// Consulted after the per-fetch selectors, first by variable text and then
/// by variable code, so a name shared across tables only has to be set once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDefaults {
    entries: BTreeMap<String, Vec<String>>,
}

impl SessionDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<I, S>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Removes a default, returning the values it held
    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.entries.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
