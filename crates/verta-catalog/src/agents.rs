//! Built-in Agents
//!
//! The platform's launch catalog. Each profile carries the full capability
//! and use-case lists shown on marketplace cards and fed into the chat
//! engine's system prompt.

use verta_core::{AgentProfile, PricingTier};

/// The agents available at launch
pub fn builtin_agents() -> Vec<AgentProfile> {
    vec![
        AgentProfile {
            id: "healthcare-assistant".into(),
            name: "Healthcare Assistant".into(),
            description: "AI agent specialized in healthcare workflows, patient management, and medical documentation".into(),
            category: "Healthcare".into(),
            icon: "🏥".into(),
            capabilities: vec![
                "Patient data analysis".into(),
                "Medical documentation".into(),
                "Appointment scheduling".into(),
                "Symptom assessment".into(),
                "Treatment recommendations".into(),
            ],
            use_cases: vec![
                "Electronic health records".into(),
                "Patient triage".into(),
                "Medical research".into(),
                "Clinical decision support".into(),
                "Healthcare automation".into(),
            ],
            pricing_tier: PricingTier::Pro,
        },
        AgentProfile {
            id: "customer-support".into(),
            name: "Customer Support Agent".into(),
            description: "Advanced customer service automation with natural language understanding".into(),
            category: "Customer Service".into(),
            icon: "🎧".into(),
            capabilities: vec![
                "Natural language processing".into(),
                "Ticket routing".into(),
                "Knowledge base search".into(),
                "Sentiment analysis".into(),
                "Multi-channel support".into(),
            ],
            use_cases: vec![
                "24/7 customer support".into(),
                "Ticket automation".into(),
                "FAQ handling".into(),
                "Escalation management".into(),
                "Customer insights".into(),
            ],
            pricing_tier: PricingTier::Free,
        },
        AgentProfile {
            id: "sales-assistant".into(),
            name: "Sales Assistant".into(),
            description: "AI sales agent for lead qualification, follow-ups, and deal management".into(),
            category: "Sales".into(),
            icon: "📈".into(),
            capabilities: vec![
                "Lead scoring".into(),
                "Email automation".into(),
                "CRM integration".into(),
                "Sales forecasting".into(),
                "Pipeline management".into(),
            ],
            use_cases: vec![
                "Lead generation".into(),
                "Sales automation".into(),
                "Customer outreach".into(),
                "Deal tracking".into(),
                "Performance analytics".into(),
            ],
            pricing_tier: PricingTier::Pro,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_agents_are_complete() {
        let agents = builtin_agents();
        assert_eq!(agents.len(), 3);

        for agent in &agents {
            assert!(!agent.id.is_empty());
            assert!(agent.capabilities.len() >= 3);
            assert!(!agent.use_cases.is_empty());
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let agents = builtin_agents();
        let mut ids: Vec<_> = agents.iter().map(|a| a.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), agents.len());
    }
}
