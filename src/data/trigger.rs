//! Compiled trigger structure

use serde::{Deserialize, Serialize};

use super::Requirement;

/// Ordered list of requirements that must all hold
pub type RequirementGroup = Vec<Requirement>;

/// Compiled trigger: a core group AND at least one alternate (if any)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Requirements that must always be satisfied
    pub core: RequirementGroup,
    /// Groups of which at least one must be satisfied
    #[serde(default)]
    pub alternates: Vec<RequirementGroup>,
}

impl Trigger {
    pub fn new(core: RequirementGroup, alternates: Vec<RequirementGroup>) -> Self {
        Self { core, alternates }
    }

    /// Total number of requirements across every group
    pub fn requirement_count(&self) -> usize {
        self.core.len() + self.alternates.iter().map(Vec::len).sum::<usize>()
    }

    /// Every requirement, core first, then each alternate in order
    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.core.iter().chain(self.alternates.iter().flatten())
    }

    pub fn is_empty(&self) -> bool {
        self.requirement_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_count() {
        let trigger = Trigger::new(
            vec![Requirement::always_true()],
            vec![
                vec![Requirement::always_false(), Requirement::always_true()],
                vec![Requirement::always_true()],
            ],
        );
        assert_eq!(trigger.requirement_count(), 4);
        assert_eq!(trigger.requirements().count(), 4);
        assert!(!trigger.is_empty());
    }

    #[test]
    fn test_requirements_order() {
        let trigger = Trigger::new(
            vec![Requirement::always_true()],
            vec![vec![Requirement::always_false()]],
        );
        let all: Vec<_> = trigger.requirements().copied().collect();
        assert_eq!(all, vec![Requirement::always_true(), Requirement::always_false()]);
    }

    #[test]
    fn test_empty_trigger() {
        assert!(Trigger::default().is_empty());
    }
}
