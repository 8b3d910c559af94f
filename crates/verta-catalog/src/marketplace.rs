//! Marketplace Search
//!
//! Read-only views over the agent catalog: category listing and the
//! search-plus-category filter behind the marketplace page.

use verta_core::AgentProfile;

use crate::error::{CatalogError, Result};

/// The agent marketplace
#[derive(Clone, Debug, Default)]
pub struct Marketplace {
    agents: Vec<AgentProfile>,
}

impl Marketplace {
    /// Create a marketplace over the given catalog
    pub fn new(agents: Vec<AgentProfile>) -> Self {
        Self { agents }
    }

    /// Marketplace over the built-in launch catalog
    pub fn builtin() -> Self {
        Self::new(crate::agents::builtin_agents())
    }

    /// All agents, catalog order
    pub fn agents(&self) -> &[AgentProfile] {
        &self.agents
    }

    /// Look up an agent by catalog id
    pub fn get(&self, id: &str) -> Result<&AgentProfile> {
        self.agents
            .iter()
            .find(|a| a.id == id)
            .ok_or_else(|| CatalogError::UnknownAgent(id.to_string()))
    }

    /// Distinct categories in catalog order
    pub fn categories(&self) -> Vec<&str> {
        let mut categories = Vec::new();
        for agent in &self.agents {
            if !categories.contains(&agent.category.as_str()) {
                categories.push(agent.category.as_str());
            }
        }
        categories
    }

    /// Filter agents by search term and category
    ///
    /// The term matches case-insensitively against name or description;
    /// an empty term matches everything. `None` or `"all"` for category
    /// disables the category filter.
    pub fn search(&self, term: &str, category: Option<&str>) -> Vec<&AgentProfile> {
        let term = term.trim().to_lowercase();

        self.agents
            .iter()
            .filter(|agent| {
                let matches_term = term.is_empty()
                    || agent.name.to_lowercase().contains(&term)
                    || agent.description.to_lowercase().contains(&term);

                let matches_category = match category {
                    None | Some("all") | Some("") => true,
                    Some(c) => agent.category == c,
                };

                matches_term && matches_category
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let marketplace = Marketplace::builtin();

        let hits = marketplace.search("HEALTHCARE", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "healthcare-assistant");

        // matches description text too
        let hits = marketplace.search("lead qualification", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "sales-assistant");
    }

    #[test]
    fn test_category_filter() {
        let marketplace = Marketplace::builtin();

        let hits = marketplace.search("", Some("Sales"));
        assert_eq!(hits.len(), 1);

        let all = marketplace.search("", Some("all"));
        assert_eq!(all.len(), marketplace.agents().len());

        let none = marketplace.search("", Some("Logistics"));
        assert!(none.is_empty());
    }

    #[test]
    fn test_categories_are_deduplicated_in_order() {
        let mut agents = crate::agents::builtin_agents();
        let mut second_healthcare = agents[0].clone();
        second_healthcare.id = "healthcare-triage".into();
        agents.push(second_healthcare);

        let marketplace = Marketplace::new(agents);
        assert_eq!(
            marketplace.categories(),
            vec!["Healthcare", "Customer Service", "Sales"]
        );
    }

    #[test]
    fn test_get_unknown_agent_errors() {
        let marketplace = Marketplace::builtin();
        assert!(marketplace.get("nope").is_err());
    }
}
