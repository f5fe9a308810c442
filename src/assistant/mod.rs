//! Generative-AI collaborator.
//!
//! The [`Assistant`] facade fronts an optional text model. Every
//! operation degrades to deterministic canned content (see [`fallback`])
//! when the model is unconfigured, unreachable, or returns something
//! unusable, so callers never handle assistant errors: they always get
//! an answer.

pub mod fallback;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AssistantConfig;
use crate::models::ideas::{ProfileInsights, ProjectIdea, ProjectRoadmap};
use crate::models::user::{Preferences, Profile};
use crate::profile::defaults::{default_preferences, default_skills};
use crate::profile::strength::PROFILE_COMPLETE_THRESHOLD;

const MAX_ERROR_BODY_LEN: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("model request failed: {0}")]
    Transport(String),
    #[error("model returned status {status}: {message}")]
    Api { status: u16, message: String },
    #[error("model returned an empty response")]
    EmptyResponse,
    #[error("model output was not in the requested format: {0}")]
    MalformedOutput(String),
}

/// Minimal text-completion interface. Implemented by the HTTP client in
/// production and by scripted fakes in tests.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError>;
}

/// REST client for a hosted `models/{model}:generateContent` endpoint.
pub struct GenerativeHttpClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerativeHttpClient {
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        assert!(
            !config.base_url.is_empty(),
            "Assistant base URL must be provided"
        );
        assert!(
            !config.api_key.trim().is_empty(),
            "Assistant API key must be provided"
        );
        assert!(!config.model.is_empty(), "Assistant model must be named");
        assert!(
            config.request_timeout() >= Duration::from_millis(100),
            "Timeout below 100ms is unsafe"
        );

        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .with_context(|| format!("Failed to build assistant client for {}", config.base_url))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextModel for GenerativeHttpClient {
    async fn generate(&self, prompt: &str) -> Result<String, AssistantError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let request = GenerateRequest {
            contents: vec![PromptContent {
                role: "user",
                parts: vec![PromptPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|err| AssistantError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            let message: String = message.chars().take(MAX_ERROR_BODY_LEN).collect();
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::MalformedOutput(err.to_string()))?;

        let text = parsed
            .candidates
            .and_then(|mut candidates| candidates.pop())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .map(|text| text.trim().to_string())
            .unwrap_or_default();
        if text.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(text)
    }
}

/// Facade over an optional model. Cheap to clone.
#[derive(Clone)]
pub struct Assistant {
    model: Option<Arc<dyn TextModel>>,
}

impl Assistant {
    /// An assistant with no model: every operation serves canned content.
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Builds from configuration. A blank API key disables the model
    /// rather than failing: the platform works without it.
    pub fn from_config(config: &AssistantConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            info!("Assistant model not configured; canned fallbacks will serve all requests");
            return Ok(Self::disabled());
        }
        let client = GenerativeHttpClient::new(config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// One actionable collaboration tip for a just-sent chat message. An
    /// optional context line steers the model toward a particular angle.
    pub async fn chat_suggestion(
        &self,
        message: &str,
        sender: &str,
        receiver: &str,
        context: Option<&str>,
    ) -> String {
        let Some(model) = &self.model else {
            return fallback::chat_suggestion(message);
        };
        match model
            .generate(&chat_suggestion_prompt(message, sender, receiver, context))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!("Chat suggestion fell back to canned advice: {err}");
                fallback::contextual_chat_suggestion(message)
            }
        }
    }

    /// Three reply drafts for the compose box, each angled differently:
    /// a technical follow-up, collaboration next steps, and tooling.
    /// Serves the standing starter questions when no model is configured
    /// or any draft fails.
    pub async fn conversation_suggestions(
        &self,
        message: &str,
        sender: &str,
        receiver: &str,
    ) -> [String; 3] {
        const ANGLES: [&str; 3] = [
            "Generate a follow-up question about technical implementation",
            "Suggest next steps for collaboration",
            "Recommend tools or resources",
        ];

        let Some(model) = &self.model else {
            return fallback::conversation_starters();
        };
        let mut drafts: [String; 3] = Default::default();
        for (draft, angle) in drafts.iter_mut().zip(ANGLES) {
            let prompt = chat_suggestion_prompt(message, sender, receiver, Some(angle));
            match model.generate(&prompt).await {
                Ok(text) => *draft = text,
                Err(err) => {
                    warn!("Conversation suggestions fell back to starter questions: {err}");
                    return fallback::conversation_starters();
                }
            }
        }
        drafts
    }

    /// A project pitch tailored to the profile's skills and interests.
    pub async fn project_idea(&self, profile: &Profile) -> ProjectIdea {
        let Some(model) = &self.model else {
            return fallback::project_idea(&profile.skills);
        };
        let generated = model.generate(&project_idea_prompt(profile)).await;
        match generated.and_then(|text| parse_json_block::<ProjectIdea>(&text)) {
            Ok(idea) => idea,
            Err(err) => {
                warn!("Project idea fell back to canned pitch: {err}");
                fallback::project_idea(&profile.skills)
            }
        }
    }

    /// Free-form mentoring answer, optionally grounded in the asker's
    /// profile and in context from the surface the question came from.
    pub async fn answer(
        &self,
        question: &str,
        context: Option<&str>,
        profile: Option<&Profile>,
    ) -> String {
        let Some(model) = &self.model else {
            return fallback::answer(question);
        };
        match model
            .generate(&answer_prompt(question, context, profile))
            .await
        {
            Ok(text) => text,
            Err(err) => {
                warn!("Assistant answer fell back to canned guidance: {err}");
                fallback::answer(question)
            }
        }
    }

    /// Insight card for the signed-in dashboard: completeness,
    /// skill-growth, and collaboration lines are computed locally from
    /// the profile; only the project-idea line consults the model, and
    /// it degrades to a canned pitch like everything else.
    pub async fn profile_insights(&self, profile: &Profile) -> ProfileInsights {
        let idea = self.project_idea(profile).await;
        ProfileInsights {
            profile_insight: profile_insight_line(profile.profile_strength),
            skill_growth: skill_growth_line(&profile.skills),
            collaboration_tip: collaboration_line(&profile.preferences),
            project_idea: idea_line(&idea),
        }
    }

    /// Short compatibility blurb for a match between two profiles.
    pub async fn match_insight(&self, viewer: &Profile, candidate: &Profile) -> String {
        let Some(model) = &self.model else {
            return fallback::match_insight(&viewer.skills, &candidate.skills);
        };
        match model.generate(&match_insight_prompt(viewer, candidate)).await {
            Ok(text) => text,
            Err(err) => {
                warn!("Match insight fell back to skill overlap: {err}");
                fallback::match_insight(&viewer.skills, &candidate.skills)
            }
        }
    }

    /// Phase-by-phase roadmap for a project. Falls back to the generic
    /// starter plan when the model cannot produce a parseable one.
    pub async fn project_roadmap(
        &self,
        title: &str,
        technologies: &[String],
        team_size: u8,
        timeframe: &str,
    ) -> ProjectRoadmap {
        let Some(model) = &self.model else {
            return fallback::project_roadmap();
        };
        let generated = model
            .generate(&roadmap_prompt(title, technologies, team_size, timeframe))
            .await;
        match generated.and_then(|text| parse_json_block::<ProjectRoadmap>(&text)) {
            Ok(roadmap) => roadmap,
            Err(err) => {
                warn!("Roadmap fell back to the starter plan: {err}");
                fallback::project_roadmap()
            }
        }
    }
}

/// Extracts the outermost `{...}` block from model output. Models wrap
/// JSON in prose or code fences more often than not.
fn parse_json_block<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, AssistantError> {
    let start = text
        .find('{')
        .ok_or_else(|| AssistantError::MalformedOutput("no JSON object in output".to_string()))?;
    let end = text
        .rfind('}')
        .ok_or_else(|| AssistantError::MalformedOutput("no closing brace in output".to_string()))?;
    if end < start {
        return Err(AssistantError::MalformedOutput(
            "unbalanced braces in output".to_string(),
        ));
    }
    serde_json::from_str(&text[start..=end])
        .map_err(|err| AssistantError::MalformedOutput(err.to_string()))
}

fn chat_suggestion_prompt(
    message: &str,
    sender: &str,
    receiver: &str,
    context: Option<&str>,
) -> String {
    let extra = context
        .filter(|context| !context.trim().is_empty())
        .map(|context| format!("Additional context: {context}\n"))
        .unwrap_or_default();
    format!(
        "You are the Crewmatch assistant on a collaboration platform for developers.\n\
         {sender} just messaged {receiver}: \"{message}\"\n\
         {extra}Reply with one friendly, actionable suggestion (1-2 sentences) that helps them \
         collaborate: a next step, a tool, or an approach. No preamble, no formatting."
    )
}

fn project_idea_prompt(profile: &Profile) -> String {
    format!(
        "Suggest one portfolio-worthy team project for a developer.\n\
         Skills: {skills}\nInterests: {interests}\nExperience: {experience}\n\
         The project should use their existing skills, add one or two new technologies, \
         and fit a small team in 2-6 weeks.\n\
         Respond with exactly this JSON and nothing else:\n\
         {{\"title\": \"...\", \"description\": \"...\", \"technologies\": [\"...\"], \
         \"estimatedTime\": \"X-Y weeks\", \"reason\": \"...\", \"teamSize\": 3, \
         \"difficulty\": \"Beginner/Intermediate/Advanced\", \"marketDemand\": \"...\"}}",
        skills = profile.skills.join(", "),
        interests = profile.interests.join(", "),
        experience = profile.experience.as_str(),
    )
}

fn answer_prompt(question: &str, context: Option<&str>, profile: Option<&Profile>) -> String {
    let asker = profile
        .map(|p| {
            format!(
                "Asker's skills: {}. Experience: {}. Interests: {}.\n",
                p.skills.join(", "),
                p.experience.as_str(),
                p.interests.join(", ")
            )
        })
        .unwrap_or_default();
    let extra = context
        .filter(|context| !context.trim().is_empty())
        .map(|context| format!("Additional context: {context}\n"))
        .unwrap_or_default();
    format!(
        "You are a mentor on Crewmatch, a platform where developers find teammates.\n\
         {asker}Question: \"{question}\"\n\
         {extra}Answer in 3-5 encouraging, practical sentences focused on collaboration, \
         project planning, or skill growth. Name concrete tools or methods where useful."
    )
}

fn match_insight_prompt(viewer: &Profile, candidate: &Profile) -> String {
    format!(
        "Two developers might collaborate.\n\
         A: skills {a_skills}; interests {a_interests}; experience {a_exp}.\n\
         B: skills {b_skills}; interests {b_interests}; experience {b_exp}.\n\
         In 2-3 sentences, say what makes this pairing work: shared strengths, \
         complementary gaps, and what kind of project suits them.",
        a_skills = viewer.skills.join(", "),
        a_interests = viewer.interests.join(", "),
        a_exp = viewer.experience.as_str(),
        b_skills = candidate.skills.join(", "),
        b_interests = candidate.interests.join(", "),
        b_exp = candidate.experience.as_str(),
    )
}

fn roadmap_prompt(title: &str, technologies: &[String], team_size: u8, timeframe: &str) -> String {
    format!(
        "Create a delivery roadmap for the project \"{title}\".\n\
         Technologies: {techs}. Team size: {team_size}. Timeframe: {timeframe}.\n\
         Respond with exactly this JSON and nothing else:\n\
         {{\"phases\": [{{\"name\": \"...\", \"duration\": \"...\", \"tasks\": [\"...\"], \
         \"deliverables\": [\"...\"]}}], \"risks\": [\"...\"], \"recommendations\": [\"...\"]}}",
        techs = technologies.join(", "),
    )
}

fn profile_insight_line(strength: u8) -> String {
    if strength < PROFILE_COMPLETE_THRESHOLD {
        format!(
            "Your profile is {strength}% complete. Adding more skills, links, or work \
             preferences would help you find better matches and collaboration opportunities."
        )
    } else {
        format!(
            "Great profile! At {strength}% completion, you are well positioned to attract \
             quality collaboration partners."
        )
    }
}

fn skill_growth_line(skills: &[String]) -> String {
    let named = match skills {
        [] => None,
        _ if skills == default_skills() => None,
        [only] => Some(only.clone()),
        [first, second, ..] => Some(format!("{first} and {second}")),
    };
    match named {
        Some(named) => format!(
            "Based on your {named} skills, consider learning {next} to expand your project \
             opportunities.",
            next = fallback::complementary_skill(skills),
        ),
        None => "Adding technical skills to your profile will help you find more relevant \
                 project matches and teammates."
            .to_string(),
    }
}

fn collaboration_line(preferences: &Preferences) -> String {
    match preferences.work_style.first() {
        Some(style) if preferences.work_style != default_preferences().work_style => format!(
            "Your {style} work style pairs well with teammates who complement your approach. \
             Look for diverse perspectives in your collaborations."
        ),
        _ => "Define your work style preferences to find teammates who complement your \
              collaboration approach."
            .to_string(),
    }
}

fn idea_line(idea: &ProjectIdea) -> String {
    let preview: String = idea.description.chars().take(100).collect();
    format!("Try building: \"{}\" - {preview}...", idea.title)
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<PromptContent>,
}

#[derive(Debug, Serialize)]
struct PromptContent {
    role: &'static str,
    parts: Vec<PromptPart>,
}

#[derive(Debug, Serialize)]
struct PromptPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}
