//! Data-field extraction
//!
//! Copies the configured `data-*` fields off an element into a plain record.
//! Names are given in dataset (camelCase) form, so `itemId` reads the
//! `data-item-id` attribute.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::dom::Dom;

/// Ordered field name → value record; missing fields are `None`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRecord {
    fields: Vec<(String, Option<String>)>,
}

impl DataRecord {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }
}

impl FromIterator<(String, Option<String>)> for DataRecord {
    fn from_iter<I: IntoIterator<Item = (String, Option<String>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// Serialized as a map so the JS side sees a plain object in field order
impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// `itemId` → `data-item-id`
pub fn data_attribute_name(name: &str) -> String {
    let mut attribute = String::with_capacity(name.len() + 8);
    attribute.push_str("data-");
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            attribute.push('-');
            attribute.push(c.to_ascii_lowercase());
        } else {
            attribute.push(c);
        }
    }
    attribute
}

/// Read `names` off `node`, in order
pub fn extract<D: Dom>(dom: &D, node: &D::Node, names: &[String]) -> DataRecord {
    names
        .iter()
        .map(|name| (name.clone(), dom.attribute(node, &data_attribute_name(name))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDom;

    #[test]
    fn test_data_attribute_name() {
        assert_eq!(data_attribute_name("id"), "data-id");
        assert_eq!(data_attribute_name("itemId"), "data-item-id");
        assert_eq!(data_attribute_name("sortOrderKey"), "data-sort-order-key");
    }

    #[test]
    fn test_extract_keeps_order_and_missing_fields() {
        let dom = MemoryDom::new();
        let li = dom.append_element(dom.body_node(), "li");
        dom.set_attribute(&li, "data-item-id", "42").unwrap();
        dom.set_attribute(&li, "data-label", "Milk").unwrap();

        let names = vec!["label".to_string(), "missing".to_string(), "itemId".to_string()];
        let record = extract(&dom, &li, &names);

        let fields: Vec<_> = record.iter().collect();
        assert_eq!(
            fields,
            vec![("label", Some("Milk")), ("missing", None), ("itemId", Some("42"))]
        );
        assert_eq!(record.get("itemId"), Some("42"));
        assert_eq!(record.get("missing"), None);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let record: DataRecord = vec![
            ("b".to_string(), Some("2".to_string())),
            ("a".to_string(), None),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"b":"2","a":null}"#);
    }
}
