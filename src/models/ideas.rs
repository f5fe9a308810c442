use serde::{Deserialize, Serialize};

/// Project pitch produced by the assistant, or by its canned fallback
/// when no model is reachable. Deserialized from the camelCase JSON the
/// model is asked to emit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdea {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub estimated_time: String,
    pub reason: String,
    pub team_size: u8,
    pub difficulty: String,
    pub market_demand: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub name: String,
    pub duration: String,
    pub tasks: Vec<String>,
    pub deliverables: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoadmap {
    pub phases: Vec<RoadmapPhase>,
    pub risks: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Dashboard insight card: one line each on profile completeness, a
/// skill worth learning next, collaboration style, and a project to try.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInsights {
    pub profile_insight: String,
    pub skill_growth: String,
    pub collaboration_tip: String,
    pub project_idea: String,
}
