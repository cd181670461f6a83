use std::{fmt, str::FromStr};

use crate::error::ConfigError;

/// A technology sector analyzed for startup trends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Domain {
    AiMachineLearning,
    Biotechnology,
    CleanTech,
    FinTech,
    EdTech,
    SpaceTech,
    Cybersecurity,
    Robotics,
    HealthcareTech,
    AgriTech,
    QuantumComputing,
    BlockchainWeb3,
    RenewableEnergy,
    ClimateTech,
    AdvancedMaterials,
    AutonomousVehicles,
}

impl Domain {
    /// The full catalog, in display order.
    pub(crate) const ALL: [Domain; 16] = [
        Domain::AiMachineLearning,
        Domain::Biotechnology,
        Domain::CleanTech,
        Domain::FinTech,
        Domain::EdTech,
        Domain::SpaceTech,
        Domain::Cybersecurity,
        Domain::Robotics,
        Domain::HealthcareTech,
        Domain::AgriTech,
        Domain::QuantumComputing,
        Domain::BlockchainWeb3,
        Domain::RenewableEnergy,
        Domain::ClimateTech,
        Domain::AdvancedMaterials,
        Domain::AutonomousVehicles,
    ];

    /// Selection used when the user doesn't pick any domain explicitly.
    pub(crate) const DEFAULT_SELECTION: [Domain; 3] = [
        Domain::AiMachineLearning,
        Domain::Biotechnology,
        Domain::FinTech,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            Domain::AiMachineLearning => "AI/Machine Learning",
            Domain::Biotechnology => "Biotechnology",
            Domain::CleanTech => "CleanTech",
            Domain::FinTech => "FinTech",
            Domain::EdTech => "EdTech",
            Domain::SpaceTech => "SpaceTech",
            Domain::Cybersecurity => "Cybersecurity",
            Domain::Robotics => "Robotics",
            Domain::HealthcareTech => "Healthcare Tech",
            Domain::AgriTech => "AgriTech",
            Domain::QuantumComputing => "Quantum Computing",
            Domain::BlockchainWeb3 => "Blockchain/Web3",
            Domain::RenewableEnergy => "Renewable Energy",
            Domain::ClimateTech => "Climate Tech",
            Domain::AdvancedMaterials => "Advanced Materials",
            Domain::AutonomousVehicles => "Autonomous Vehicles",
        }
    }

    /// The query sent to the search service for this domain.
    pub(crate) fn search_query(self) -> String {
        format!("Latest startup trends in {} 2024", self.label())
    }

    /// Base name of the downloadable report, e.g. `Healthcare_Tech_startup_trends`.
    pub(crate) fn report_stem(self) -> String {
        format!("{}_startup_trends", self.label().replace(' ', "_"))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Domain {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Domain::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownDomain(s.to_string()))
    }
}

/// Parses user-supplied labels, keeping the first occurrence of each domain.
pub(crate) fn parse_selection<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Domain>, ConfigError> {
    let mut selection: Vec<Domain> = Vec::with_capacity(labels.len());
    for label in labels {
        let domain: Domain = label.as_ref().parse()?;
        if !selection.contains(&domain) {
            selection.push(domain);
        }
    }
    Ok(selection)
}
