use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// One of the four fixed categories of the D.E.E.P. framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pillar {
    Diagnose,
    Embed,
    Evaluate,
    Prioritize,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [
        Pillar::Diagnose,
        Pillar::Embed,
        Pillar::Evaluate,
        Pillar::Prioritize,
    ];

    /// Key of this pillar in the analysis JSON.
    pub fn key(self) -> &'static str {
        match self {
            Pillar::Diagnose => "diagnose",
            Pillar::Embed => "embed",
            Pillar::Evaluate => "evaluate",
            Pillar::Prioritize => "prioritize",
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Best-effort description of the person behind the profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSummary {
    #[serde(deserialize_with = "nullable_string")]
    pub name: String,
    #[serde(deserialize_with = "nullable_string")]
    pub current_role: String,
    #[serde(deserialize_with = "nullable_string")]
    pub industry: String,
    #[serde(deserialize_with = "nullable_string")]
    pub experience: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Coaching output for a single pillar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PillarRecommendation {
    #[serde(deserialize_with = "nullable_string")]
    pub summary: String,
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The structured coaching report returned by `POST /api/analyze`.
///
/// Unknown keys the model adds are kept in `extra` so the report is returned
/// exactly as extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub profile_summary: ProfileSummary,
    pub diagnose: PillarRecommendation,
    pub embed: PillarRecommendation,
    pub evaluate: PillarRecommendation,
    pub prioritize: PillarRecommendation,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnalysisResult {
    pub fn pillar(&self, pillar: Pillar) -> &PillarRecommendation {
        match pillar {
            Pillar::Diagnose => &self.diagnose,
            Pillar::Embed => &self.embed,
            Pillar::Evaluate => &self.evaluate,
            Pillar::Prioritize => &self.prioritize,
        }
    }

    pub fn recommendation_count(&self) -> usize {
        Pillar::ALL
            .iter()
            .map(|p| self.pillar(*p).recommendations.len())
            .sum()
    }
}

/// Request body for `POST /api/analyze`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeRequest {
    pub profile_text: String,
}

fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
