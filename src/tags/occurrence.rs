//! Occurrence records and the per-file deduplicating set

use std::collections::BTreeMap;

use serde::Serialize;

/// Dedup key of an occurrence within one file
///
/// Field order drives iteration order: by line, then symbol, references
/// before definitions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct OccurrenceKey {
    line: usize,
    symbol: String,
    is_definition: bool,
}

/// One appearance of a symbol at a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Occurrence<'a> {
    #[serde(rename = "type", serialize_with = "serialize_kind")]
    pub is_definition: bool,
    pub symbol: &'a str,
    pub line: usize,
    pub path: &'a str,
    pub image: &'a str,
}

impl Occurrence<'_> {
    /// `D` for definitions, `R` for references
    pub fn kind_tag(&self) -> char {
        if self.is_definition {
            'D'
        } else {
            'R'
        }
    }
}

fn serialize_kind<S: serde::Serializer>(is_definition: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(if *is_definition { "D" } else { "R" })
}

/// Occurrences found in a single file
///
/// Keyed by `(is_definition, symbol, line)`. Inserting an existing key
/// replaces its image: the last write wins, images never accumulate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceSet {
    path: String,
    entries: BTreeMap<OccurrenceKey, String>,
}

impl OccurrenceSet {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn insert(
        &mut self,
        is_definition: bool,
        symbol: impl Into<String>,
        line: usize,
        image: impl Into<String>,
    ) {
        let key = OccurrenceKey {
            line,
            symbol: symbol.into(),
            is_definition,
        };
        self.entries.insert(key, image.into());
    }

    /// Fold another file's occurrences into this one, later entries winning
    pub fn merge(&mut self, other: OccurrenceSet) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, is_definition: bool, symbol: &str, line: usize) -> bool {
        self.get(is_definition, symbol, line).is_some()
    }

    /// Image recorded for a key, if present
    pub fn get(&self, is_definition: bool, symbol: &str, line: usize) -> Option<&str> {
        let key = OccurrenceKey {
            line,
            symbol: symbol.to_string(),
            is_definition,
        };
        self.entries.get(&key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = Occurrence<'_>> {
        self.entries.iter().map(|(key, image)| Occurrence {
            is_definition: key.is_definition,
            symbol: &key.symbol,
            line: key.line,
            path: &self.path,
            image,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_same_key_last_write_wins() {
        let mut set = OccurrenceSet::new("a.c");
        set.insert(false, "foo", 3, "first");
        set.insert(false, "foo", 3, "second");

        assert_eq!(set.len(), 1);
        assert_eq!(set.get(false, "foo", 3), Some("second"));
    }

    #[test]
    fn test_definition_and_reference_are_distinct_keys() {
        let mut set = OccurrenceSet::new("a.c");
        set.insert(true, "foo", 3, "int foo;");
        set.insert(false, "foo", 3, "int foo;");
        set.insert(false, "foo", 4, "foo = 1;");

        assert_eq!(set.len(), 3);
        assert!(set.contains(true, "foo", 3));
        assert!(!set.contains(true, "foo", 4));
    }

    #[test]
    fn test_iteration_ordered_by_line_then_symbol() {
        let mut set = OccurrenceSet::new("m.py");
        set.insert(true, "zeta", 2, "");
        set.insert(false, "beta", 1, "");
        set.insert(false, "alpha", 2, "");

        let order: Vec<(usize, &str)> = set.iter().map(|o| (o.line, o.symbol)).collect();
        assert_eq!(order, vec![(1, "beta"), (2, "alpha"), (2, "zeta")]);
        assert!(set.iter().all(|o| o.path == "m.py"));
    }

    #[test]
    fn test_merge_keeps_both_kinds() {
        let mut defs = OccurrenceSet::new("x.c");
        defs.insert(true, "x", 1, "int x;");
        let mut refs = OccurrenceSet::new("x.c");
        refs.insert(false, "x", 1, "int x;");
        refs.insert(false, "x", 2, "int y = x;");

        defs.merge(refs);
        let tags: Vec<char> = defs.iter().map(|o| o.kind_tag()).collect();
        assert_eq!(tags, vec!['R', 'D', 'R']);
    }

    #[test]
    fn test_occurrence_serializes_kind_as_letter() {
        let mut set = OccurrenceSet::new("x.c");
        set.insert(true, "x", 1, "int x;");
        let occurrence = set.iter().next().unwrap();
        let value = serde_json::to_value(occurrence).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "type": "D",
                "symbol": "x",
                "line": 1,
                "path": "x.c",
                "image": "int x;"
            })
        );
    }
}
