use crate::objects::Object;
use indexmap::IndexMap;

/// PDF dictionary. Keys keep their insertion order so output is deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dictionary {
    entries: IndexMap<String, Object>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Dictionary with `/Type` already set.
    pub fn typed(type_name: &str) -> Self {
        let mut dict = Self::new();
        dict.set("Type", Object::name(type_name));
        dict
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Object>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn set_name(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.entries.insert(key.into(), Object::Name(name.into()));
    }

    pub fn get(&self, key: &str) -> Option<&Object> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Object> {
        self.entries.get_mut(key)
    }

    /// Removes `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Object> {
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Object> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Object)> {
        self.entries.iter()
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(|obj| {
            if let Object::Dictionary(dict) = obj {
                Some(dict)
            } else {
                None
            }
        })
    }
}

impl FromIterator<(String, Object)> for Dictionary {
    fn from_iter<T: IntoIterator<Item = (String, Object)>>(iter: T) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dictionary() {
        let dict = Dictionary::new();
        assert!(dict.is_empty());
        assert_eq!(dict.len(), 0);
    }

    #[test]
    fn test_set_and_get() {
        let mut dict = Dictionary::new();
        dict.set("Title", "Test");
        dict.set("Count", 42);
        dict.set("Open", true);

        assert_eq!(dict.get("Title"), Some(&Object::String(b"Test".to_vec())));
        assert_eq!(dict.get("Count"), Some(&Object::Integer(42)));
        assert_eq!(dict.get("Open"), Some(&Object::Boolean(true)));
        assert_eq!(dict.get("Missing"), None);
    }

    #[test]
    fn test_typed_sets_type_first() {
        let mut dict = Dictionary::typed("Page");
        dict.set("Parent", Object::Null);
        assert_eq!(dict.keys().next().map(String::as_str), Some("Type"));
        assert_eq!(dict.get("Type").and_then(Object::as_name), Some("Page"));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut dict = Dictionary::new();
        for key in ["Zeta", "Alpha", "Mid", "Beta"] {
            dict.set(key, 1);
        }
        let keys: Vec<&str> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid", "Beta"]);

        dict.remove("Alpha");
        let keys: Vec<&str> = dict.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Zeta", "Mid", "Beta"]);
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut dict = Dictionary::new();
        dict.set("A", 1);
        dict.set("B", 2);
        dict.set("A", 3);
        let entries: Vec<_> = dict.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        assert_eq!(
            entries,
            vec![
                ("A".to_string(), Object::Integer(3)),
                ("B".to_string(), Object::Integer(2))
            ]
        );
    }

    #[test]
    fn test_get_mut() {
        let mut dict = Dictionary::new();
        dict.set("Counter", 1);

        if let Some(Object::Integer(val)) = dict.get_mut("Counter") {
            *val = 2;
        }

        assert_eq!(dict.get("Counter"), Some(&Object::Integer(2)));
    }

    #[test]
    fn test_get_dict() {
        let mut inner = Dictionary::new();
        inner.set_name("S", "D");
        let mut dict = Dictionary::new();
        dict.set("Label", inner.clone());
        dict.set("Other", 5);

        assert_eq!(dict.get_dict("Label"), Some(&inner));
        assert_eq!(dict.get_dict("Other"), None);
    }

    #[test]
    fn test_from_iterator() {
        let dict: Dictionary = vec![
            ("Width".to_string(), Object::Integer(10)),
            ("Height".to_string(), Object::Integer(20)),
        ]
        .into_iter()
        .collect();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("Height"), Some(&Object::Integer(20)));
    }
}
