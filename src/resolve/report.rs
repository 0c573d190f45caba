use super::{MatchTier, ResolutionOutcome};
use std::fmt;

/// Per-run diagnostics: which material got which texture, and how.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ResolutionReport {
    pub outcomes: Vec<ResolutionOutcome>,
    pub texture_count: usize,
    /// Keys of textures whose filename did not classify.
    pub unparsed_textures: Vec<String>,
}

impl ResolutionReport {
    pub fn new(
        outcomes: Vec<ResolutionOutcome>,
        texture_count: usize,
        unparsed_textures: Vec<String>,
    ) -> Self {
        Self {
            outcomes,
            texture_count,
            unparsed_textures,
        }
    }

    pub fn filled_slot_count(&self) -> usize {
        self.outcomes
            .iter()
            .map(|outcome| outcome.applied_slots.len())
            .sum()
    }

    pub fn unmatched_materials(&self) -> impl Iterator<Item = &ResolutionOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.matched_by == MatchTier::None)
    }

    pub fn outcome_for(&self, material_name: &str) -> Option<&ResolutionOutcome> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.material_name == material_name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{} ({})", outcome.material_name, outcome.matched_by)?;
            for (slot, applied) in &outcome.applied_slots {
                write!(f, "  {}: {} [{}", slot, applied.filename, applied.tier)?;
                if let Some(score) = applied.score {
                    write!(f, " {:.2}", score)?;
                }
                writeln!(f, "]")?;
            }
        }
        if !self.unparsed_textures.is_empty() {
            writeln!(f, "unclassified textures: {}", self.unparsed_textures.join(", "))?;
        }
        Ok(())
    }
}
