//! Field tree types.
//!
//! A [`FieldTree`] is the typed, nested representation of one step's
//! answers. Its shape is fixed by the step's slot schema; the normalizer
//! guarantees every slot is present.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// A single selection from a fixed, ordered set of option keys.
///
/// Persisted as a boolean map (`{"person": true, "entity": false}`). At most
/// one option is ever selected; the type cannot represent anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    options: Vec<String>,
    selected: Option<usize>,
}

impl ChoiceSet {
    /// Create an empty choice set over the given options.
    pub fn new(options: &[&str]) -> Self {
        Self {
            options: options.iter().map(|o| o.to_string()).collect(),
            selected: None,
        }
    }

    /// Build from a boolean map.
    ///
    /// Keys outside the option set are ignored. Zero or several `true` flags
    /// collapse to no selection.
    pub fn from_flags<'a, I>(options: &[&str], flags: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let mut set = Self::new(options);
        let mut chosen: Option<usize> = None;
        let mut count = 0usize;
        for (key, flag) in flags {
            if !flag {
                continue;
            }
            if let Some(idx) = set.position(key) {
                if chosen != Some(idx) {
                    count += 1;
                    chosen = Some(idx);
                }
            }
        }
        if count == 1 {
            set.selected = chosen;
        }
        set
    }

    /// Option keys in declaration order.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.options.iter().map(String::as_str)
    }

    /// The selected key, if any.
    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|idx| self.options[idx].as_str())
    }

    /// Whether `key` is the current selection.
    pub fn is(&self, key: &str) -> bool {
        self.selected() == Some(key)
    }

    /// Select `key`. Returns false (and leaves the set untouched) for unknown keys.
    pub fn select(&mut self, key: &str) -> bool {
        match self.position(key) {
            Some(idx) => {
                self.selected = Some(idx);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.options.iter().position(|o| o == key)
    }

    /// Boolean-map form, every option present.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (idx, key) in self.options.iter().enumerate() {
            map.insert(key.clone(), Value::Bool(self.selected == Some(idx)));
        }
        Value::Object(map)
    }
}

/// One label/value pair in a dynamic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub label: Option<String>,
    pub value: Option<u64>,
}

/// The value held by one slot of the field tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Mutually exclusive option set
    Choice(ChoiceSet),
    /// Nullable trimmed string (also used for country codes)
    Text(Option<String>),
    /// Nullable non-negative whole number
    Integer(Option<u64>),
    /// Nullable `YYYY-MM-DD` string
    Date(Option<String>),
    /// Ordered, de-duplicated 2-letter country codes
    Codes(Vec<String>),
    /// Dynamic list of label/value pairs
    Entries(Vec<Entry>),
    /// Fixed named group of child slots
    Group(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// Reset to the empty value of the same shape.
    ///
    /// The empty value of every slot kind is also its default, so clearing
    /// never needs the schema.
    pub fn clear(&mut self) {
        match self {
            FieldValue::Choice(set) => set.clear(),
            FieldValue::Text(v) | FieldValue::Date(v) => *v = None,
            FieldValue::Integer(v) => *v = None,
            FieldValue::Codes(v) => v.clear(),
            FieldValue::Entries(v) => v.clear(),
            FieldValue::Group(children) => children.values_mut().for_each(FieldValue::clear),
        }
    }

    /// True when the value equals its default.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Choice(set) => set.is_empty(),
            FieldValue::Text(v) | FieldValue::Date(v) => v.is_none(),
            FieldValue::Integer(v) => v.is_none(),
            FieldValue::Codes(v) => v.is_empty(),
            FieldValue::Entries(v) => v.is_empty(),
            FieldValue::Group(children) => children.values().all(FieldValue::is_empty),
        }
    }

    pub fn as_choice(&self) -> Option<&ChoiceSet> {
        match self {
            FieldValue::Choice(set) => Some(set),
            _ => None,
        }
    }

    /// Text or date content.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(v) | FieldValue::Date(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<u64> {
        match self {
            FieldValue::Integer(v) => *v,
            _ => None,
        }
    }

    pub fn as_codes(&self) -> &[String] {
        match self {
            FieldValue::Codes(v) => v,
            _ => &[],
        }
    }

    pub fn as_entries(&self) -> &[Entry] {
        match self {
            FieldValue::Entries(v) => v,
            _ => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&FieldValue> {
        match self {
            FieldValue::Group(children) => children.get(name),
            _ => None,
        }
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        match self {
            FieldValue::Group(children) => children.get_mut(name),
            _ => None,
        }
    }

    /// Follow a dotted path from this value.
    pub fn at(&self, path: &str) -> Option<&FieldValue> {
        path.split('.').try_fold(self, |cur, seg| cur.child(seg))
    }

    pub fn at_mut(&mut self, path: &str) -> Option<&mut FieldValue> {
        path.split('.').try_fold(self, |cur, seg| cur.child_mut(seg))
    }

    /// JSON form, as persisted.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Choice(set) => set.to_json(),
            FieldValue::Text(v) | FieldValue::Date(v) => {
                v.as_ref().map_or(Value::Null, |s| Value::String(s.clone()))
            }
            FieldValue::Integer(v) => v.map_or(Value::Null, Value::from),
            FieldValue::Codes(v) => {
                Value::Array(v.iter().map(|c| Value::String(c.clone())).collect())
            }
            FieldValue::Entries(v) => Value::Array(
                v.iter()
                    .map(|e| serde_json::to_value(e).unwrap_or(Value::Null))
                    .collect(),
            ),
            FieldValue::Group(children) => Value::Object(
                children
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// The complete answer tree for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTree {
    root: FieldValue,
}

impl FieldTree {
    /// Wrap a root group. Anything other than a group becomes an empty tree.
    pub fn from_root(root: FieldValue) -> Self {
        match root {
            FieldValue::Group(_) => Self { root },
            _ => Self {
                root: FieldValue::Group(BTreeMap::new()),
            },
        }
    }

    pub fn root(&self) -> &FieldValue {
        &self.root
    }

    pub fn get(&self, path: &str) -> Option<&FieldValue> {
        self.root.at(path)
    }

    pub fn get_mut(&mut self, path: &str) -> Option<&mut FieldValue> {
        self.root.at_mut(path)
    }

    /// Replace the value at an existing slot. Returns false when the path
    /// does not address a slot.
    pub fn set(&mut self, path: &str, value: FieldValue) -> bool {
        match self.get_mut(path) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Reset the slot at `path` to its default. Returns true when anything changed.
    pub fn clear(&mut self, path: &str) -> bool {
        match self.get_mut(path) {
            Some(slot) if !slot.is_empty() => {
                slot.clear();
                true
            }
            _ => false,
        }
    }

    pub fn choice(&self, path: &str) -> Option<&ChoiceSet> {
        self.get(path).and_then(FieldValue::as_choice)
    }

    /// Whether the choice set at `path` has `option` selected.
    pub fn is_selected(&self, path: &str, option: &str) -> bool {
        self.choice(path).is_some_and(|set| set.is(option))
    }

    pub fn text(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(FieldValue::as_str)
    }

    pub fn integer(&self, path: &str) -> Option<u64> {
        self.get(path).and_then(FieldValue::as_integer)
    }

    pub fn codes(&self, path: &str) -> &[String] {
        self.get(path).map_or(&[], FieldValue::as_codes)
    }

    pub fn to_json(&self) -> Value {
        self.root.to_json()
    }
}

impl Serialize for FieldTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const KIND: &[&str] = &["person", "entity"];

    #[test]
    fn test_choice_from_flags_single() {
        let set = ChoiceSet::from_flags(KIND, [("person", true), ("entity", false)]);
        assert_eq!(set.selected(), Some("person"));
        assert_eq!(set.to_json(), json!({"person": true, "entity": false}));
    }

    #[test]
    fn test_choice_from_flags_collapses() {
        let none = ChoiceSet::from_flags(KIND, [("person", false), ("entity", false)]);
        assert!(none.is_empty());

        let many = ChoiceSet::from_flags(KIND, [("person", true), ("entity", true)]);
        assert!(many.is_empty());

        let unknown = ChoiceSet::from_flags(KIND, [("trust", true)]);
        assert!(unknown.is_empty());
        assert_eq!(unknown.options().collect::<Vec<_>>(), vec!["person", "entity"]);
    }

    #[test]
    fn test_choice_select_unknown() {
        let mut set = ChoiceSet::new(KIND);
        assert!(!set.select("trust"));
        assert!(set.select("entity"));
        assert!(set.is("entity"));
    }

    #[test]
    fn test_tree_paths() {
        let mut holder = BTreeMap::new();
        holder.insert("kind".to_string(), FieldValue::Choice(ChoiceSet::new(KIND)));
        holder.insert("email".to_string(), FieldValue::Text(Some("a@b.co".into())));
        let mut root = BTreeMap::new();
        root.insert("holder".to_string(), FieldValue::Group(holder));
        let mut tree = FieldTree::from_root(FieldValue::Group(root));

        assert_eq!(tree.text("holder.email"), Some("a@b.co"));
        assert!(tree.get("holder.missing").is_none());
        assert!(tree.get("holder.email.deeper").is_none());

        assert!(tree.clear("holder.email"));
        assert!(!tree.clear("holder.email"));
        assert_eq!(tree.text("holder.email"), None);

        assert!(!tree.set("holder.nope", FieldValue::Text(None)));
        assert_eq!(
            tree.to_json(),
            json!({"holder": {"kind": {"person": false, "entity": false}, "email": null}})
        );
    }

    #[test]
    fn test_group_clear_is_recursive() {
        let mut block = BTreeMap::new();
        block.insert("line1".to_string(), FieldValue::Text(Some("1 Main St".into())));
        block.insert("codes".to_string(), FieldValue::Codes(vec!["US".into()]));
        let mut value = FieldValue::Group(block);
        assert!(!value.is_empty());
        value.clear();
        assert!(value.is_empty());
    }
}
