//! Agent Profiles
//!
//! Static descriptors of the vertical agents offered by the platform.
//! A profile is read-only input to the chat engine: it seeds the session
//! greeting and the system prompt, nothing mutates it.

use serde::{Deserialize, Serialize};

/// Pricing tier an agent is offered under
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingTier {
    Free,
    Pro,
    Enterprise,
}

impl std::fmt::Display for PricingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingTier::Free => write!(f, "free"),
            PricingTier::Pro => write!(f, "pro"),
            PricingTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Descriptor of a deployable vertical agent
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Stable catalog identifier (e.g., "healthcare-assistant")
    pub id: String,

    /// Display name (e.g., "Healthcare Assistant")
    pub name: String,

    /// One-paragraph description for catalog cards
    pub description: String,

    /// Industry vertical (e.g., "Healthcare")
    pub category: String,

    /// Emoji icon for display
    pub icon: String,

    /// What the agent can do
    pub capabilities: Vec<String>,

    /// Scenarios the agent is designed for
    pub use_cases: Vec<String>,

    /// Pricing tier
    pub pricing_tier: PricingTier,
}

impl AgentProfile {
    /// Synthesize the greeting that seeds every new chat session
    ///
    /// Names the agent, states its category, and lists up to the first
    /// three capabilities comma-joined and lower-cased.
    pub fn greeting(&self) -> String {
        let category = self.category.to_lowercase();

        if self.capabilities.is_empty() {
            return format!(
                "Hello! I'm your {}. I'm specialized in {}. How can I assist you today?",
                self.name, category,
            );
        }

        let highlights = self
            .capabilities
            .iter()
            .take(3)
            .map(|c| c.to_lowercase())
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "Hello! I'm your {}. I'm specialized in {} and can help you with {}, and more. How can I assist you today?",
            self.name, category, highlights,
        )
    }

    /// Build the system prompt submitted with every chat turn
    pub fn system_prompt(&self) -> String {
        let capabilities = self
            .capabilities
            .iter()
            .map(|c| format!("- {}", c))
            .collect::<Vec<_>>()
            .join("\n");

        let use_cases = self
            .use_cases
            .iter()
            .map(|u| format!("- {}", u))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are a {name}, an AI agent specialized in {category}.\n\n\
             Your key capabilities include:\n{capabilities}\n\n\
             You are designed to help with these use cases:\n{use_cases}\n\n\
             Please respond in a professional, helpful manner that reflects your \
             specialization in {category}. Keep responses concise but informative. \
             Always stay in character as a {category_lower} specialist.",
            name = self.name,
            category = self.category,
            capabilities = capabilities,
            use_cases = use_cases,
            category_lower = self.category.to_lowercase(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn healthcare() -> AgentProfile {
        AgentProfile {
            id: "healthcare-assistant".into(),
            name: "Healthcare Assistant".into(),
            description: "AI agent specialized in healthcare workflows".into(),
            category: "Healthcare".into(),
            icon: "🏥".into(),
            capabilities: vec![
                "Patient data analysis".into(),
                "Medical documentation".into(),
                "Appointment scheduling".into(),
                "Symptom assessment".into(),
            ],
            use_cases: vec!["Patient triage".into(), "Medical research".into()],
            pricing_tier: PricingTier::Pro,
        }
    }

    #[test]
    fn test_greeting_lists_first_three_capabilities() {
        let greeting = healthcare().greeting();
        assert!(greeting.contains("Healthcare Assistant"));
        assert!(greeting.contains("healthcare"));
        assert!(greeting
            .contains("patient data analysis, medical documentation, appointment scheduling"));
        assert!(!greeting.contains("symptom assessment"));
    }

    #[test]
    fn test_greeting_with_fewer_capabilities() {
        let mut profile = healthcare();
        profile.capabilities.truncate(1);
        let greeting = profile.greeting();
        assert!(greeting.contains("patient data analysis, and more"));
    }

    #[test]
    fn test_greeting_without_capabilities() {
        let mut profile = healthcare();
        profile.capabilities.clear();
        let greeting = profile.greeting();
        assert!(greeting.contains("Healthcare Assistant"));
        assert!(greeting.ends_with("How can I assist you today?"));
    }

    #[test]
    fn test_system_prompt_enumerates_profile() {
        let prompt = healthcare().system_prompt();
        assert!(prompt.starts_with("You are a Healthcare Assistant"));
        assert!(prompt.contains("- Patient data analysis"));
        assert!(prompt.contains("- Patient triage"));
        assert!(prompt.contains("stay in character as a healthcare specialist"));
    }
}
