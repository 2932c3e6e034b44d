//! Cartesian (clusterbomb) expansion over named value sequences

/// Named value sequences with a fixed key order.
///
/// The order is the insertion order; position `n` always maps to the same
/// key for the lifetime of the set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueSets {
    names: Vec<String>,
    values: Vec<Vec<String>>,
}

impl ValueSets {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named sequence. Re-inserting a name replaces its values in place.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();
        match self.names.iter().position(|n| *n == name) {
            Some(index) => self.values[index] = values,
            None => {
                self.names.push(name);
                self.values.push(values);
            }
        }
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether there are no variables
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Name at position `n`
    pub fn key_at(&self, n: usize) -> Option<&str> {
        self.names.get(n).map(String::as_str)
    }

    /// Values at position `n`
    pub fn values_at(&self, n: usize) -> Option<&[String]> {
        self.values.get(n).map(Vec::as_slice)
    }

    /// Values for a name
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|index| self.values[index].as_slice())
    }

    /// Number of tuples the full product yields
    pub fn total(&self) -> u64 {
        if self.values.is_empty() {
            return 0;
        }
        self.values
            .iter()
            .fold(1u64, |acc, v| acc.saturating_mul(v.len() as u64))
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for ValueSets {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        let mut sets = ValueSets::new();
        for (name, values) in iter {
            sets.insert(name, values);
        }
        sets
    }
}

/// Visit every tuple of the cross product of `sets`.
///
/// Tuples are `(name, value)` pairs in key order; the last key varies
/// fastest. `visit` returning `false` stops the walk and `expand` returns
/// `false`. An empty set or any empty sequence visits nothing and returns
/// `true`.
///
/// Working state is one index per variable, so memory and stack stay
/// proportional to the variable count rather than the output size.
pub fn expand<F>(sets: &ValueSets, mut visit: F) -> bool
where
    F: FnMut(&[(&str, &str)]) -> bool,
{
    if sets.is_empty() || sets.values.iter().any(Vec::is_empty) {
        return true;
    }

    let width = sets.len();
    let mut indices = vec![0usize; width];
    let mut tuple: Vec<(&str, &str)> = sets
        .names
        .iter()
        .zip(&sets.values)
        .map(|(name, values)| (name.as_str(), values[0].as_str()))
        .collect();

    loop {
        if !visit(&tuple) {
            return false;
        }

        // Odometer step: bump the rightmost position, carrying leftwards.
        let mut position = width;
        loop {
            if position == 0 {
                return true;
            }
            position -= 1;

            let values = &sets.values[position];
            indices[position] += 1;
            if indices[position] < values.len() {
                tuple[position].1 = values[indices[position]].as_str();
                break;
            }
            indices[position] = 0;
            tuple[position].1 = values[0].as_str();
        }
    }
}
