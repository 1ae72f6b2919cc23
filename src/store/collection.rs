//! Known collections and their identifier prefixes

use std::fmt;

/// The fixed set of collections every document carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Stakeholders,
    GoalsAndObjectives,
    BusinessProcesses,
    Requirements,
    SystemsAndApplications,
    DataEntities,
    RisksAndConstraints,
    MetricsAndKpis,
}

impl Collection {
    /// All known collections, in canonical document order.
    pub const ALL: [Collection; 8] = [
        Collection::Stakeholders,
        Collection::GoalsAndObjectives,
        Collection::BusinessProcesses,
        Collection::Requirements,
        Collection::SystemsAndApplications,
        Collection::DataEntities,
        Collection::RisksAndConstraints,
        Collection::MetricsAndKpis,
    ];

    /// Key under which the collection is stored in the document
    pub fn key(&self) -> &'static str {
        match self {
            Collection::Stakeholders => "stakeholders",
            Collection::GoalsAndObjectives => "goals_and_objectives",
            Collection::BusinessProcesses => "business_processes",
            Collection::Requirements => "requirements",
            Collection::SystemsAndApplications => "systems_and_applications",
            Collection::DataEntities => "data_entities",
            Collection::RisksAndConstraints => "risks_and_constraints",
            Collection::MetricsAndKpis => "metrics_and_kpis",
        }
    }

    /// Identifier prefix for items of this collection
    pub fn prefix(&self) -> &'static str {
        match self {
            Collection::Stakeholders => "STK",
            Collection::GoalsAndObjectives => "GOAL",
            Collection::BusinessProcesses => "BP",
            Collection::Requirements => "REQ",
            Collection::SystemsAndApplications => "SYS",
            Collection::DataEntities => "DE",
            Collection::RisksAndConstraints => "RISK",
            Collection::MetricsAndKpis => "KPI",
        }
    }

    pub fn from_key(key: &str) -> Option<Collection> {
        Collection::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Identifier prefix for any collection key.
///
/// Known collections use the fixed table; anything else gets the first three
/// characters of its key, upper-cased.
pub fn prefix_for(key: &str) -> String {
    match Collection::from_key(key) {
        Some(collection) => collection.prefix().to_string(),
        None => key.chars().take(3).collect::<String>().to_uppercase(),
    }
}
