use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Summary statistics computed once when a dataset is ingested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub total_count: usize,
    pub avg_flowrate: f64,
    pub avg_pressure: f64,
    pub avg_temperature: f64,
    pub type_distribution: TypeDistribution,
}

/// Count of records for one equipment type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCount {
    pub equipment_type: String,
    pub count: usize,
}

/// Equipment type frequencies in first-seen order.
///
/// Serialized as a JSON object whose keys keep that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDistribution {
    entries: Vec<TypeCount>,
}

impl TypeDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more record of `equipment_type`.
    pub fn increment(&mut self, equipment_type: &str) {
        self.add(equipment_type, 1);
    }

    fn add(&mut self, equipment_type: &str, count: usize) {
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.equipment_type == equipment_type)
        {
            Some(entry) => entry.count += count,
            None => self.entries.push(TypeCount {
                equipment_type: equipment_type.to_string(),
                count,
            }),
        }
    }

    pub fn get(&self, equipment_type: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.equipment_type == equipment_type)
            .map(|entry| entry.count)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeCount> {
        self.entries.iter()
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.equipment_type.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn as_slice(&self) -> &[TypeCount] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a TypeDistribution {
    type Item = &'a TypeCount;
    type IntoIter = std::slice::Iter<'a, TypeCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, usize)> for TypeDistribution {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        let mut distribution = Self::new();
        for (equipment_type, count) in iter {
            distribution.add(&equipment_type, count);
        }
        distribution
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.equipment_type, &entry.count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TypeDistribution {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(DistributionVisitor)
    }
}

struct DistributionVisitor;

impl<'de> Visitor<'de> for DistributionVisitor {
    type Value = TypeDistribution;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of equipment type to record count")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut distribution = TypeDistribution::new();
        while let Some((equipment_type, count)) = access.next_entry::<String, usize>()? {
            distribution.add(&equipment_type, count);
        }
        Ok(distribution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_first_seen_order() {
        let mut distribution = TypeDistribution::new();
        for kind in ["Valve", "Pump", "Valve", "Exchanger", "Pump", "Valve"] {
            distribution.increment(kind);
        }
        let order: Vec<&str> = distribution.types().collect();
        assert_eq!(order, vec!["Valve", "Pump", "Exchanger"]);
        assert_eq!(distribution.get("Valve"), Some(3));
        assert_eq!(distribution.get("Pump"), Some(2));
        assert_eq!(distribution.get("Reactor"), None);
        assert_eq!(distribution.total(), 6);
    }

    #[test]
    fn type_names_are_case_sensitive() {
        let mut distribution = TypeDistribution::new();
        distribution.increment("pump");
        distribution.increment("Pump");
        assert_eq!(distribution.len(), 2);
    }
}
