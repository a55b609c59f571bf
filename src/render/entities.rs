//! Entity aggregation across enriched chunks.

use crate::config::EntityConfig;
use crate::enrichment::Entity;
use std::collections::BTreeMap;

/// One row of the entities table.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub entity_type: String,
    pub text: String,
    pub max_score: f64,
    pub count: usize,
}

/// Entities merged by `(type, text)`, ordered by the `"type-text"` key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityTable {
    rows: BTreeMap<String, EntitySummary>,
}

impl EntityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges entities from chunks given in id order.
    pub fn from_chunks<'a, I>(chunks: I, config: &EntityConfig) -> Self
    where
        I: IntoIterator<Item = &'a [Entity]>,
    {
        let mut table = Self::new();
        for entities in chunks {
            for entity in entities {
                table.add(entity, config);
            }
        }
        table
    }

    /// Adds one entity unless its type is ignored or its score is too low.
    pub fn add(&mut self, entity: &Entity, config: &EntityConfig) {
        if config.ignored_types.iter().any(|t| *t == entity.entity_type)
            || entity.score <= config.min_score
        {
            return;
        }

        let key = format!("{}-{}", entity.entity_type, entity.text);
        self.rows
            .entry(key)
            .and_modify(|row| {
                row.count += 1;
                if row.max_score < entity.score {
                    row.max_score = entity.score;
                }
            })
            .or_insert_with(|| EntitySummary {
                entity_type: entity.entity_type.clone(),
                text: entity.text.clone(),
                max_score: entity.score,
                count: 1,
            });
    }

    pub fn rows(&self) -> impl Iterator<Item = &EntitySummary> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_by_type_and_text() {
        let config = EntityConfig::default();
        let first = vec![
            Entity::new("PERSON", "Ada", 0.81),
            Entity::new("LOCATION", "Oslo", 0.7),
        ];
        let second = vec![
            Entity::new("PERSON", "Ada", 0.97),
            Entity::new("ORGANIZATION", "Ada", 0.9),
        ];
        let table = EntityTable::from_chunks([first.as_slice(), second.as_slice()], &config);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].entity_type, "LOCATION");
        assert_eq!(rows[1].entity_type, "ORGANIZATION");
        assert_eq!(rows[2].text, "Ada");
        assert_eq!(rows[2].count, 2);
        assert_eq!(rows[2].max_score, 0.97);
    }

    #[test]
    fn drops_ignored_types_and_low_scores() {
        let config = EntityConfig::default();
        let mut table = EntityTable::new();
        table.add(&Entity::new("QUANTITY", "three", 0.99), &config);
        table.add(&Entity::new("PERSON", "Bo", 0.5), &config);
        assert!(table.is_empty());

        table.add(&Entity::new("PERSON", "Bo", 0.51), &config);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn ignored_types_are_configurable() {
        let config = EntityConfig {
            ignored_types: vec!["DATE".to_string()],
            ..EntityConfig::default()
        };
        let mut table = EntityTable::new();
        table.add(&Entity::new("DATE", "today", 0.9), &config);
        table.add(&Entity::new("QUANTITY", "two", 0.9), &config);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].entity_type, "QUANTITY");
    }
}
