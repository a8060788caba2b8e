use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt::Display;

/// Tier indices at or above this are ignored when decoding a similarity table
const MAX_TIERS: usize = 64;

/// Opaque recipe identifier as assigned by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecipeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecipeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One entry of a precomputed similarity list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimilarRecipe {
    pub id: RecipeId,
    #[serde(default)]
    pub score: f64,
}

/// Precomputed ranked lists of similar recipes, indexed by tier
///
/// Written by the offline similarity job, usually as an array of arrays but
/// older rows store an object keyed by tier number. Tiers that have not been
/// computed yet may be missing or `null`; both read as empty. Entries that do
/// not decode are dropped with a warning so one bad row never fails a scan.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SimilarityTable(pub Vec<Option<Vec<SimilarRecipe>>>);

impl<'de> Deserialize<'de> for SimilarityTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(Self::from_json(raw))
    }
}

impl SimilarityTable {
    fn from_json(raw: Value) -> Self {
        let tiers: Vec<(usize, Value)> = match raw {
            Value::Null => Vec::new(),
            Value::Array(tiers) => tiers.into_iter().enumerate().collect(),
            Value::Object(tiers) => tiers
                .into_iter()
                .filter_map(|(key, entries)| match key.parse::<usize>() {
                    Ok(tier) => Some((tier, entries)),
                    Err(_) => {
                        tracing::warn!(key = %key, "Ignoring non-numeric similarity tier");
                        None
                    }
                })
                .collect(),
            other => {
                tracing::warn!(value = %other, "Ignoring malformed similarity table");
                Vec::new()
            }
        };

        let mut table: Vec<Option<Vec<SimilarRecipe>>> = Vec::new();
        for (tier, entries) in tiers {
            if tier >= MAX_TIERS {
                tracing::warn!(tier, "Ignoring out-of-range similarity tier");
                continue;
            }
            if table.len() <= tier {
                table.resize(tier + 1, None);
            }
            table[tier] = decode_tier(tier, entries);
        }

        Self(table)
    }

    /// Returns the ranked entries for a tier, or an empty slice when absent
    pub fn tier(&self, tier: usize) -> &[SimilarRecipe] {
        self.0
            .get(tier)
            .and_then(|entries| entries.as_deref())
            .unwrap_or(&[])
    }

    /// Builds a table with `entries` placed at `tier` and earlier tiers left empty
    pub fn with_tier(tier: usize, entries: Vec<SimilarRecipe>) -> Self {
        let mut tiers = vec![None; tier];
        tiers.push(Some(entries));
        Self(tiers)
    }
}

fn decode_tier(tier: usize, entries: Value) -> Option<Vec<SimilarRecipe>> {
    match entries {
        Value::Null => None,
        Value::Array(entries) => Some(
            entries
                .into_iter()
                .filter_map(|entry| match serde_json::from_value::<SimilarRecipe>(entry) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!(tier, error = %e, "Skipping malformed similarity entry");
                        None
                    }
                })
                .collect(),
        ),
        other => {
            tracing::warn!(tier, value = %other, "Ignoring malformed similarity tier");
            None
        }
    }
}

/// A recipe record from the catalog
///
/// The catalog scan only projects `id`, `title`, `image` and `similarities`;
/// `ingredients` and `instructions` are filled in by the full-record lookup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    #[serde(alias = "_id")]
    pub id: RecipeId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub similarities: Option<SimilarityTable>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Recipe {
    pub fn new(id: impl Into<String>, title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: RecipeId::new(id),
            title: title.into(),
            image: image.into(),
            similarities: None,
            ingredients: Vec::new(),
            instructions: None,
        }
    }

    pub fn with_similarities(mut self, similarities: SimilarityTable) -> Self {
        self.similarities = Some(similarities);
        self
    }

    /// Ranked similar recipes for `tier`; empty when the recipe has not been processed
    pub fn similar_in_tier(&self, tier: usize) -> &[SimilarRecipe] {
        self.similarities
            .as_ref()
            .map(|table| table.tier(tier))
            .unwrap_or(&[])
    }
}

/// Projection of a recipe shown on the polling page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            image: recipe.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_id_display() {
        let id = RecipeId::new("5914a2c1e0");
        assert_eq!(format!("{}", id), "5914a2c1e0");
    }

    #[test]
    fn test_recipe_accepts_mongo_style_id() {
        let json = r#"{
            "_id": "r1",
            "title": "Chicken Mashroob",
            "image": "chicken.jpg",
            "similarities": [null, [{"id": "r2", "score": 0.92}, {"id": "r3", "score": 0.81}]]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.id, RecipeId::new("r1"));
        assert!(recipe.similar_in_tier(0).is_empty());
        assert_eq!(recipe.similar_in_tier(1).len(), 2);
        assert_eq!(recipe.similar_in_tier(1)[0].id, RecipeId::new("r2"));
    }

    #[test]
    fn test_recipe_without_similarities() {
        let json = r#"{"id": "r1", "title": "Rice Krispies"}"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.similarities, None);
        assert!(recipe.similar_in_tier(1).is_empty());
        assert_eq!(recipe.image, "");
    }

    #[test]
    fn test_similarities_keyed_by_tier_number() {
        let json = r#"{
            "_id": "r1",
            "title": "Maqluba",
            "similarities": {"1": [{"id": "r2", "score": 0.9}], "3": [{"id": "r4"}]}
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.similar_in_tier(1)[0].id, RecipeId::new("r2"));
        assert!(recipe.similar_in_tier(2).is_empty());
        assert_eq!(recipe.similar_in_tier(3)[0].score, 0.0);
    }

    #[test]
    fn test_malformed_similarity_entries_are_skipped() {
        let json = r#"{
            "_id": "r1",
            "title": "Maqluba",
            "similarities": [null, [{"score": 0.9}, "r9", {"id": "r3", "score": 0.7}]]
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        let ids: Vec<&str> = recipe.similar_in_tier(1).iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["r3"]);
    }

    #[test]
    fn test_malformed_similarity_tables_read_as_empty() {
        for similarities in [
            r#""pending""#,
            r#"{"one": [{"id": "r2"}]}"#,
            r#"[null, {"id": "r2"}]"#,
            r#"{"100000": [{"id": "r2"}]}"#,
        ] {
            let json = format!(r#"{{"id": "r1", "title": "T", "similarities": {}}}"#, similarities);
            let recipe: Recipe = serde_json::from_str(&json).unwrap();
            assert!(recipe.similar_in_tier(1).is_empty(), "{}", similarities);
        }
    }

    #[test]
    fn test_similarity_table_serializes_as_array() {
        let table: SimilarityTable =
            serde_json::from_str(r#"{"1": [{"id": "r2", "score": 0.5}]}"#).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json, serde_json::json!([null, [{"id": "r2", "score": 0.5}]]));
    }

    #[test]
    fn test_similarity_tier_out_of_range() {
        let table = SimilarityTable::with_tier(
            1,
            vec![SimilarRecipe {
                id: RecipeId::new("r2"),
                score: 0.5,
            }],
        );
        assert!(table.tier(0).is_empty());
        assert_eq!(table.tier(1).len(), 1);
        assert!(table.tier(7).is_empty());
    }

    #[test]
    fn test_summary_projection() {
        let recipe = Recipe::new("r1", "Shakshuka", "shakshuka.jpg");
        let summary = RecipeSummary::from(&recipe);
        assert_eq!(summary.id, recipe.id);
        assert_eq!(summary.title, "Shakshuka");
        assert_eq!(summary.image, "shakshuka.jpg");
    }

    #[test]
    fn test_serialize_skips_unloaded_fields() {
        let recipe = Recipe::new("r1", "Shakshuka", "shakshuka.jpg");
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["id"], "r1");
        assert!(json.get("similarities").is_none());
        assert!(json.get("ingredients").is_none());
    }
}
