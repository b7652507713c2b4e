//! Response assembly: turning grouped pipeline output into nested mappings.
//!
//! JSON objects produced here keep the order the pipeline chose. Group keys
//! are either sorted (`GroupOrder::Sorted`) or kept in first-seen order
//! (`GroupOrder::FirstSeen`); within a group, rows keep pipeline order.
//! Nullable figures are plain `Option`s and serialize as explicit `null`.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// A mapping that serializes its entries in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<K, V> {
    entries: Vec<(K, V)>,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: PartialEq, V> OrderedMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces; a replaced key keeps its original position.
    pub fn insert(&mut self, key: K, value: V) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Serialize, V: Serialize> Serialize for OrderedMap<K, V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Order of group keys in assembled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOrder {
    /// Ascending by key.
    Sorted,
    /// Order in which keys first appear in the input.
    FirstSeen,
}

/// Groups rows by key, preserving row order inside each group.
pub fn group_by<T, K, F>(
    rows: impl IntoIterator<Item = T>,
    key: F,
    order: GroupOrder,
) -> OrderedMap<K, Vec<T>>
where
    K: Ord + Hash + Clone,
    F: Fn(&T) -> K,
{
    match order {
        GroupOrder::Sorted => {
            let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
            for row in rows {
                groups.entry(key(&row)).or_default().push(row);
            }
            OrderedMap {
                entries: groups.into_iter().collect(),
            }
        }
        GroupOrder::FirstSeen => {
            let mut positions: HashMap<K, usize> = HashMap::new();
            let mut entries: Vec<(K, Vec<T>)> = Vec::new();
            for row in rows {
                let k = key(&row);
                let slot = *positions.entry(k.clone()).or_insert_with(|| {
                    entries.push((k, Vec::new()));
                    entries.len() - 1
                });
                entries[slot].1.push(row);
            }
            OrderedMap { entries }
        }
    }
}

/// Groups rows by key and maps each row to its output record.
pub fn group_records<T, K, R, F, G>(
    rows: impl IntoIterator<Item = T>,
    key: F,
    order: GroupOrder,
    record: G,
) -> OrderedMap<K, Vec<R>>
where
    K: Ord + Hash + Clone,
    F: Fn(&T) -> K,
    G: Fn(T) -> R,
{
    let grouped = group_by(rows, key, order);
    OrderedMap {
        entries: grouped
            .entries
            .into_iter()
            .map(|(k, rows)| (k, rows.into_iter().map(&record).collect()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_in_insertion_order() {
        let map: OrderedMap<&str, u64> = [("Sweden", 3), ("Denmark", 5), ("Other", 1)]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"Sweden":3,"Denmark":5,"Other":1}"#
        );
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.get(&"a"), Some(&3));
    }

    #[test]
    fn test_null_is_explicit() {
        let map: OrderedMap<&str, Option<i64>> =
            [("Oslo", None), ("Bergen", Some(512))].into_iter().collect();
        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"Oslo":null,"Bergen":512}"#
        );
    }

    #[test]
    fn test_group_by_sorted_keeps_row_order() {
        let rows = vec![("SE", 1), ("DK", 2), ("SE", 3)];
        let grouped = group_by(rows, |r| r.0, GroupOrder::Sorted);
        let keys: Vec<_> = grouped.keys().copied().collect();
        assert_eq!(keys, ["DK", "SE"]);
        assert_eq!(grouped.get(&"SE").unwrap(), &vec![("SE", 1), ("SE", 3)]);
    }

    #[test]
    fn test_group_by_first_seen() {
        let rows = vec![("SE", 1), ("DK", 2), ("SE", 3)];
        let grouped = group_records(rows, |r| r.0, GroupOrder::FirstSeen, |r| r.1);
        assert_eq!(
            serde_json::to_string(&grouped).unwrap(),
            r#"{"SE":[1,3],"DK":[2]}"#
        );
    }
}
