//! Canned content for every assistant operation.
//!
//! The product contract: assistant-backed features never block on the
//! model being configured or reachable. When it is not, answers come
//! from here. Selection is seeded by the input text rather than by
//! randomness, so a given conversation sees stable advice and tests see
//! stable output.

use crate::models::ideas::{ProjectIdea, ProjectRoadmap, RoadmapPhase};
use crate::profile::avatar::stable_hash;

/// General-purpose collaboration nudges, one of which is picked per
/// message when no model is configured.
pub const CHAT_SUGGESTIONS: [&str; 8] = [
    "Sounds like a solid collaboration opportunity. Try pinning down the technical requirements and a rough timeline next.",
    "A short video call is the fastest way to align on roles, scope, and deliverables.",
    "A shared repository with contribution guidelines up front saves a lot of friction later.",
    "Your skill sets overlap nicely here. Have you sketched the MVP feature list yet?",
    "Weekly sprints with a lightweight retro keep small teams moving without ceremony.",
    "Agree on the tech stack early; architecture debates get expensive once code exists.",
    "Set up a roadmap with two or three concrete milestones before writing code.",
    "Decide who owns frontend and who owns backend now; you can swap later if it stops working.",
];

pub fn chat_suggestion(message: &str) -> String {
    let index = stable_hash(message).unsigned_abs() as usize % CHAT_SUGGESTIONS.len();
    CHAT_SUGGESTIONS[index].to_string()
}

/// Standing reply drafts offered when live compose-box suggestions
/// cannot be generated.
pub fn conversation_starters() -> [String; 3] {
    [
        "What technologies are you most excited to work with?".to_string(),
        "Should we set up a shared GitHub repository?".to_string(),
        "When would be a good time for a video call to discuss the project?".to_string(),
    ]
}

/// Keyword-routed suggestion used when a live model call fails mid
/// conversation.
pub fn contextual_chat_suggestion(message: &str) -> String {
    let message = message.to_lowercase();
    let suggestion = if message.contains("project") || message.contains("build") {
        "A written roadmap with milestones, technology choices, and an owner per workstream keeps a new project from drifting."
    } else if message.contains("meet") || message.contains("call") {
        "Good call. Prepare a short agenda covering scope, roles, and timeline so the meeting produces decisions."
    } else if message.contains("code") || message.contains("github") || message.contains("repo") {
        "A shared repository with a branching strategy and review rules will keep the codebase healthy as the team grows."
    } else if message.contains("design") || message.contains("ui") {
        "Shared design tooling and an early component library keep the interface consistent while you iterate."
    } else {
        "Sounds promising. What is the next concrete step to move this forward?"
    };
    suggestion.to_string()
}

/// Keyword-routed answer for the ask-the-assistant surface.
pub fn answer(question: &str) -> String {
    let question = question.to_lowercase();
    let answer = if question.contains("teammate") || question.contains("team") {
        "Look for complementary skills rather than identical ones: shared goals and work ethic matter more than a matching stack. Aligned availability and honest communication carry a team further than raw talent."
    } else if question.contains("project") || question.contains("idea") {
        "Good projects solve a real problem and fit in two to four weeks. Pick something with clear user value, then put your own spin on it; finished and polished beats ambitious and abandoned."
    } else if question.contains("collaboration") || question.contains("collaborate") {
        "Effective collaboration needs defined roles and regular check-ins. Use a shared repository for code, one chat channel for decisions, and a simple board to track who is doing what."
    } else if question.contains("timeline") {
        "Break the work into weekly milestones: planning first, core features in the middle weeks, testing and polish at the end. Add buffer for surprises and flag slips early instead of absorbing them silently."
    } else if question.contains("skill") || question.contains("learn") {
        "Build projects one step beyond your comfort zone; hands-on practice beats passive study. Pairing with a teammate who already knows the technology is the fastest transfer of knowledge there is."
    } else if question.contains("portfolio") || question.contains("job") {
        "Three or four polished projects with live demos and honest write-ups of the hard parts beat a long list of half-finished repositories. Show growth, not just output."
    } else {
        "Good question. For detailed guidance, compare notes with experienced developers in your network or the documentation for your stack; a second opinion early usually saves a rewrite later."
    };
    answer.to_string()
}

/// Picks a canned project pitch by skill category: machine-learning
/// skills first, then web, then mobile, defaulting to the first entry.
pub fn project_idea(skills: &[String]) -> ProjectIdea {
    let ideas = canned_ideas();
    let [ai_idea, web_idea, mobile_idea] = ideas;

    if matches_any(skills, &["python", "machine learning", "ai", "tensorflow", "pytorch", "nlp"]) {
        return ai_idea;
    }
    if matches_any(
        skills,
        &["react", "javascript", "typescript", "html", "css", "node.js", "vue", "angular"],
    ) {
        return web_idea;
    }
    if matches_any(skills, &["react native", "flutter", "swift", "kotlin", "mobile"]) {
        return mobile_idea;
    }
    ai_idea
}

/// Next-skill suggestions per known skill, in preference order.
const COMPLEMENTARY_SKILLS: [(&str, [&str; 3]); 6] = [
    ("react", ["Node.js", "TypeScript", "GraphQL"]),
    ("javascript", ["Python", "React", "Node.js"]),
    ("python", ["JavaScript", "Docker", "AWS"]),
    ("node.js", ["React", "MongoDB", "Docker"]),
    ("html", ["JavaScript", "React", "CSS"]),
    ("css", ["JavaScript", "Sass", "Figma"]),
];

/// Suggests one skill worth learning next: the first complement of an
/// existing skill that the profile does not already list.
pub fn complementary_skill(skills: &[String]) -> &'static str {
    for skill in skills {
        let skill = skill.trim().to_lowercase();
        let Some((_, suggestions)) = COMPLEMENTARY_SKILLS
            .into_iter()
            .find(|(known, _)| *known == skill)
        else {
            continue;
        };
        let unused = suggestions.into_iter().find(|suggestion| {
            !skills
                .iter()
                .any(|owned| owned.eq_ignore_ascii_case(suggestion))
        });
        if let Some(suggestion) = unused {
            return suggestion;
        }
    }
    "Docker"
}

/// Case-insensitive skill intersection, preserving the viewer's casing.
pub fn shared_skills(viewer_skills: &[String], candidate_skills: &[String]) -> Vec<String> {
    viewer_skills
        .iter()
        .filter(|skill| {
            candidate_skills
                .iter()
                .any(|other| other.eq_ignore_ascii_case(skill))
        })
        .cloned()
        .collect()
}

/// One-line compatibility blurb built from the skill overlap.
pub fn match_insight(viewer_skills: &[String], candidate_skills: &[String]) -> String {
    let common = shared_skills(viewer_skills, candidate_skills);
    match common.as_slice() {
        [] => {
            "Complementary skill sets could lead to innovative solutions and mutual learning."
                .to_string()
        }
        [only] => format!(
            "Strong technical alignment around {only}; a shared foundation with room to specialize."
        ),
        [first, second, ..] => format!(
            "Strong technical alignment with shared expertise in {first} and {second}. A collaboration here plays to both of your strengths."
        ),
    }
}

/// Three-phase starter roadmap used when the model cannot produce one.
pub fn project_roadmap() -> ProjectRoadmap {
    ProjectRoadmap {
        phases: vec![
            RoadmapPhase {
                name: "Planning & Setup".to_string(),
                duration: "Week 1".to_string(),
                tasks: string_vec(&[
                    "Define requirements",
                    "Set up the development environment",
                    "Create the project skeleton",
                ]),
                deliverables: string_vec(&[
                    "Project specification",
                    "Working dev setup",
                    "Initial wireframes",
                ]),
            },
            RoadmapPhase {
                name: "Core Development".to_string(),
                duration: "Week 2-3".to_string(),
                tasks: string_vec(&[
                    "Implement core features",
                    "Stand up the database",
                    "Build the API surface",
                ]),
                deliverables: string_vec(&[
                    "Working MVP",
                    "API documentation",
                    "Database schema",
                ]),
            },
            RoadmapPhase {
                name: "Testing & Launch".to_string(),
                duration: "Week 4".to_string(),
                tasks: string_vec(&["Write the test suite", "Deploy", "Tune performance"]),
                deliverables: string_vec(&[
                    "Test suite",
                    "Live deployment",
                    "Performance notes",
                ]),
            },
        ],
        risks: string_vec(&[
            "Scope creep",
            "Underestimated technical complexity",
            "Coordination overhead",
        ]),
        recommendations: string_vec(&[
            "Keep iterations short",
            "Review every change",
            "Agree on one communication channel",
        ]),
    }
}

fn canned_ideas() -> [ProjectIdea; 3] {
    [
        ProjectIdea {
            title: "Resume Insight Analyzer".to_string(),
            description: "Parse resumes, extract structured experience, and suggest improvements with lightweight NLP.".to_string(),
            technologies: string_vec(&["Python", "spaCy", "Flask", "React", "PostgreSQL"]),
            estimated_time: "3-4 weeks".to_string(),
            reason: "Shows applied machine learning on a problem recruiters actually have".to_string(),
            team_size: 3,
            difficulty: "Intermediate".to_string(),
            market_demand: "High - hiring tools keep growing".to_string(),
        },
        ProjectIdea {
            title: "Live Pair-Programming Editor".to_string(),
            description: "Web code editor with shared cursors, syntax highlighting, and built-in chat for remote pairing sessions.".to_string(),
            technologies: string_vec(&["React", "Node.js", "WebSocket", "Monaco Editor", "Redis"]),
            estimated_time: "4-5 weeks".to_string(),
            reason: "Full-stack plus real-time infrastructure in one portfolio piece".to_string(),
            team_size: 4,
            difficulty: "Advanced".to_string(),
            market_demand: "Medium - developer tooling".to_string(),
        },
        ProjectIdea {
            title: "Smart Expense Coach".to_string(),
            description: "Mobile-first expense tracker that categorizes spending automatically and surfaces monthly insights.".to_string(),
            technologies: string_vec(&["React Native", "Node.js", "MongoDB", "TensorFlow.js"]),
            estimated_time: "3-4 weeks".to_string(),
            reason: "Combines mobile development with on-device inference".to_string(),
            team_size: 3,
            difficulty: "Intermediate".to_string(),
            market_demand: "High - personal finance apps".to_string(),
        },
    ]
}

fn matches_any(skills: &[String], category: &[&str]) -> bool {
    skills.iter().any(|skill| {
        let skill = skill.trim().to_lowercase();
        category.contains(&skill.as_str())
    })
}

fn string_vec(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
