//! Milestone-based feature gate.
//!
//! Code written for a given milestone runs once the configured milestone
//! reaches or passes it, so later milestones subsume earlier ones without
//! per-feature flags. The gate is a plain value handed to whoever needs it;
//! there is no process-wide setting.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{CrawlerError, Result};

/// A point in the assignment progression.
///
/// The order is given by [`Milestone::rank`], not by declaration order.
/// Changing a rank changes which code paths are enabled for every
/// configured milestone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    Assignment1a,
    Assignment1b,
    Assignment2a,
    Assignment2b,
    Assignment2c,
    Assignment3a,
    Assignment3b,
    Assignment4,
    Assignmentrx,
    All,
}

impl Milestone {
    /// Every milestone, lowest rank first.
    pub const ALL: [Milestone; 10] = [
        Milestone::Assignment1a,
        Milestone::Assignment1b,
        Milestone::Assignment2a,
        Milestone::Assignment2b,
        Milestone::Assignment2c,
        Milestone::Assignment3a,
        Milestone::Assignment3b,
        Milestone::Assignment4,
        Milestone::Assignmentrx,
        Milestone::All,
    ];

    /// Position in the total order. `All` is always the maximum.
    pub const fn rank(self) -> u8 {
        match self {
            Milestone::Assignment1a => 0,
            Milestone::Assignment1b => 1,
            Milestone::Assignment2a => 2,
            Milestone::Assignment2b => 3,
            Milestone::Assignment2c => 4,
            Milestone::Assignment3a => 5,
            Milestone::Assignment3b => 6,
            Milestone::Assignment4 => 7,
            Milestone::Assignmentrx => 8,
            Milestone::All => 9,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Milestone::Assignment1a => "Assignment1a",
            Milestone::Assignment1b => "Assignment1b",
            Milestone::Assignment2a => "Assignment2a",
            Milestone::Assignment2b => "Assignment2b",
            Milestone::Assignment2c => "Assignment2c",
            Milestone::Assignment3a => "Assignment3a",
            Milestone::Assignment3b => "Assignment3b",
            Milestone::Assignment4 => "Assignment4",
            Milestone::Assignmentrx => "Assignmentrx",
            Milestone::All => "All",
        }
    }
}

impl Default for Milestone {
    fn default() -> Self {
        Milestone::All
    }
}

impl PartialOrd for Milestone {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Milestone {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Milestone {
    type Err = CrawlerError;

    /// Accepts the full name (`Assignment2b`), the short form (`2b`, `rx`)
    /// or `all`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let short = lower.strip_prefix("assignment").unwrap_or(lower.as_str());

        match short {
            "1a" => Ok(Milestone::Assignment1a),
            "1b" => Ok(Milestone::Assignment1b),
            "2a" => Ok(Milestone::Assignment2a),
            "2b" => Ok(Milestone::Assignment2b),
            "2c" => Ok(Milestone::Assignment2c),
            "3a" => Ok(Milestone::Assignment3a),
            "3b" => Ok(Milestone::Assignment3b),
            "4" => Ok(Milestone::Assignment4),
            "rx" => Ok(Milestone::Assignmentrx),
            "all" => Ok(Milestone::All),
            _ => Err(CrawlerError::UnknownMilestone(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StudentLevel {
    Undergraduate,
    Graduate,
}

impl Default for StudentLevel {
    fn default() -> Self {
        StudentLevel::Graduate
    }
}

impl fmt::Display for StudentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentLevel::Undergraduate => f.write_str("undergraduate"),
            StudentLevel::Graduate => f.write_str("graduate"),
        }
    }
}

impl FromStr for StudentLevel {
    type Err = CrawlerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "undergraduate" | "ugrad" => Ok(StudentLevel::Undergraduate),
            "graduate" | "grad" => Ok(StudentLevel::Graduate),
            _ => Err(CrawlerError::UnknownStudentLevel(s.to_string())),
        }
    }
}

/// Source of the student level the gate consults.
///
/// Implementations must report exactly one of the two levels.
pub trait StudentProvider {
    fn level(&self) -> StudentLevel;

    fn is_undergraduate(&self) -> bool {
        self.level() == StudentLevel::Undergraduate
    }

    fn is_graduate(&self) -> bool {
        self.level() == StudentLevel::Graduate
    }
}

impl StudentProvider for StudentLevel {
    fn level(&self) -> StudentLevel {
        *self
    }
}

/// Answers whether code associated with a milestone is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentGate<S = StudentLevel> {
    current: Milestone,
    student: S,
}

impl<S: StudentProvider> AssignmentGate<S> {
    pub fn new(current: Milestone, student: S) -> Self {
        Self { current, student }
    }

    pub fn current(&self) -> Milestone {
        self.current
    }

    pub fn student(&self) -> &S {
        &self.student
    }

    /// Same student provider, different milestone.
    pub fn with_milestone(self, current: Milestone) -> Self {
        Self { current, ..self }
    }

    /// True iff `milestone` ranks at or below the configured milestone.
    pub fn includes(&self, milestone: Milestone) -> bool {
        milestone.rank() <= self.current.rank()
    }

    pub fn is(&self, milestone: Milestone) -> bool {
        self.includes(milestone)
    }

    pub fn is_assignment(&self, milestone: Milestone) -> bool {
        self.is(milestone)
    }

    pub fn is_undergraduate_for(&self, milestone: Milestone) -> bool {
        self.is_undergraduate() && self.is_assignment(milestone)
    }

    pub fn is_graduate_for(&self, milestone: Milestone) -> bool {
        self.is_graduate() && self.is_assignment(milestone)
    }

    pub fn is_undergraduate(&self) -> bool {
        self.student.is_undergraduate()
    }

    pub fn is_graduate(&self) -> bool {
        self.student.is_graduate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::Cell;

    fn milestone() -> impl Strategy<Value = Milestone> {
        prop::sample::select(Milestone::ALL.to_vec())
    }

    fn level() -> impl Strategy<Value = StudentLevel> {
        prop_oneof![
            Just(StudentLevel::Undergraduate),
            Just(StudentLevel::Graduate)
        ]
    }

    #[test]
    fn test_ranks_follow_listing() {
        for pair in Milestone::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should rank below {}", pair[0], pair[1]);
        }
        assert_eq!(Milestone::ALL.iter().max(), Some(&Milestone::All));
    }

    #[test]
    fn test_includes_at_assignment_2b() {
        let gate = AssignmentGate::new(Milestone::Assignment2b, StudentLevel::Graduate);

        assert!(gate.includes(Milestone::Assignment2a));
        assert!(gate.includes(Milestone::Assignment2b));
        assert!(!gate.includes(Milestone::Assignment3a));
        assert!(!gate.includes(Milestone::All));
    }

    #[test]
    fn test_minimal_milestone_includes_only_itself() {
        let gate = AssignmentGate::new(Milestone::Assignment1a, StudentLevel::Graduate);

        for m in Milestone::ALL {
            assert_eq!(gate.includes(m), m == Milestone::Assignment1a);
        }
    }

    #[test]
    fn test_default_gate_is_all_graduate() {
        let gate = AssignmentGate::<StudentLevel>::default();
        assert_eq!(gate.current(), Milestone::All);
        assert!(gate.is_graduate());
        assert!(Milestone::ALL.iter().all(|m| gate.includes(*m)));
    }

    #[test]
    fn test_with_milestone_keeps_student() {
        let gate = AssignmentGate::new(Milestone::All, StudentLevel::Undergraduate)
            .with_milestone(Milestone::Assignment1b);

        assert_eq!(gate.current(), Milestone::Assignment1b);
        assert!(gate.is_undergraduate_for(Milestone::Assignment1a));
        assert!(!gate.is_undergraduate_for(Milestone::Assignment2a));
    }

    struct CountingStudent {
        level: StudentLevel,
        queries: Cell<u32>,
    }

    impl StudentProvider for CountingStudent {
        fn level(&self) -> StudentLevel {
            self.queries.set(self.queries.get() + 1);
            self.level
        }
    }

    #[test]
    fn test_level_predicates_query_the_provider() {
        let gate = AssignmentGate::new(
            Milestone::Assignment3a,
            CountingStudent {
                level: StudentLevel::Undergraduate,
                queries: Cell::new(0),
            },
        );

        assert!(gate.is_undergraduate());
        assert!(!gate.is_graduate_for(Milestone::Assignment1a));
        assert_eq!(gate.student().queries.get(), 2);
    }

    #[test]
    fn test_parse_milestones() {
        assert_eq!("2b".parse::<Milestone>().unwrap(), Milestone::Assignment2b);
        assert_eq!("Assignment3a".parse::<Milestone>().unwrap(), Milestone::Assignment3a);
        assert_eq!("ASSIGNMENTRX".parse::<Milestone>().unwrap(), Milestone::Assignmentrx);
        assert_eq!(" all ".parse::<Milestone>().unwrap(), Milestone::All);
        assert!(matches!(
            "5".parse::<Milestone>(),
            Err(CrawlerError::UnknownMilestone(_))
        ));
    }

    #[test]
    fn test_parse_student_level() {
        assert_eq!("grad".parse::<StudentLevel>().unwrap(), StudentLevel::Graduate);
        assert_eq!("Undergraduate".parse::<StudentLevel>().unwrap(), StudentLevel::Undergraduate);
        assert!("faculty".parse::<StudentLevel>().is_err());
    }

    proptest! {
        #[test]
        fn prop_includes_matches_rank(m in milestone(), current in milestone(), student in level()) {
            let gate = AssignmentGate::new(current, student);
            prop_assert_eq!(gate.includes(m), m.rank() <= current.rank());
            prop_assert_eq!(gate.is(m), gate.includes(m));
            prop_assert_eq!(gate.is_assignment(m), gate.includes(m));
        }

        #[test]
        fn prop_all_includes_everything(m in milestone(), student in level()) {
            prop_assert!(AssignmentGate::new(Milestone::All, student).includes(m));
        }

        #[test]
        fn prop_level_predicates_are_exclusive(m in milestone(), current in milestone()) {
            let grad = AssignmentGate::new(current, StudentLevel::Graduate);
            let ugrad = AssignmentGate::new(current, StudentLevel::Undergraduate);

            prop_assert!(!grad.is_undergraduate_for(m));
            prop_assert!(!ugrad.is_graduate_for(m));
            prop_assert_eq!(grad.is_graduate_for(m), grad.includes(m));
            prop_assert_eq!(ugrad.is_undergraduate_for(m), ugrad.includes(m));
        }
    }
}
