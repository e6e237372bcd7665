//! Step sequencer: position within the primary flow and the nested
//! "add experience" sub-flow.
//!
//! The position is a tagged union, so "in the sub-flow" and "on primary step N"
//! can never both be meaningful at once. The sub-flow remembers the primary
//! step it was entered from and returns there untouched.

use serde::{Deserialize, Serialize};

use crate::wizard::WizardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryStep {
    Role,
    Industry,
    Tasks,
    Skills,
    Interests,
    Education,
    Review,
}

impl PrimaryStep {
    const ORDER: [PrimaryStep; 7] = [
        PrimaryStep::Role,
        PrimaryStep::Industry,
        PrimaryStep::Tasks,
        PrimaryStep::Skills,
        PrimaryStep::Interests,
        PrimaryStep::Education,
        PrimaryStep::Review,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDER.get(index).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Role => "Your Role",
            Self::Industry => "Industry",
            Self::Tasks => "Tasks",
            Self::Skills => "Skills",
            Self::Interests => "Interests",
            Self::Education => "Education",
            Self::Review => "Review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStep {
    Role,
    Industry,
    Tasks,
}

impl SubStep {
    fn next(self) -> Option<Self> {
        match self {
            Self::Role => Some(Self::Industry),
            Self::Industry => Some(Self::Tasks),
            Self::Tasks => None,
        }
    }

    fn prev(self) -> Option<Self> {
        match self {
            Self::Role => None,
            Self::Industry => Some(Self::Role),
            Self::Tasks => Some(Self::Industry),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum WizardPosition {
    Primary { step: PrimaryStep },
    AddExperience { primary: PrimaryStep, sub: SubStep },
}

impl WizardPosition {
    /// The primary step shown in the progress indicator; in the sub-flow
    /// this is the step the sub-flow returns to.
    pub fn primary_step(self) -> PrimaryStep {
        match self {
            Self::Primary { step } => step,
            Self::AddExperience { primary, .. } => primary,
        }
    }

    pub fn is_sub_flow(self) -> bool {
        matches!(self, Self::AddExperience { .. })
    }
}

/// Presentation hint only (entry animation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// What a transition asks the controller to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved,
    /// Forward from the last primary step.
    Finalize,
    /// Backward from the first primary step.
    Exit,
    /// Forward from the last sub-step; the sequencer is already back in the primary flow.
    SubFlowCompleted,
    /// Backward from the first sub-step; the sequencer is already back in the primary flow.
    SubFlowCancelled,
}

#[derive(Debug, Clone)]
pub struct StepSequencer {
    position: WizardPosition,
    direction: Direction,
}

impl StepSequencer {
    pub fn new(start: PrimaryStep) -> Self {
        Self {
            position: WizardPosition::Primary { step: start },
            direction: Direction::Forward,
        }
    }

    pub fn position(&self) -> WizardPosition {
        self.position
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn advance(&mut self) -> Transition {
        self.direction = Direction::Forward;
        match self.position {
            WizardPosition::Primary { step } => match step.next() {
                Some(next) => {
                    self.position = WizardPosition::Primary { step: next };
                    Transition::Moved
                }
                None => Transition::Finalize,
            },
            WizardPosition::AddExperience { primary, sub } => match sub.next() {
                Some(next) => {
                    self.position = WizardPosition::AddExperience { primary, sub: next };
                    Transition::Moved
                }
                None => {
                    // Returning to the primary flow animates as a step back.
                    self.direction = Direction::Backward;
                    self.position = WizardPosition::Primary { step: primary };
                    Transition::SubFlowCompleted
                }
            },
        }
    }

    pub fn retreat(&mut self) -> Transition {
        self.direction = Direction::Backward;
        match self.position {
            WizardPosition::Primary { step } => match step.prev() {
                Some(prev) => {
                    self.position = WizardPosition::Primary { step: prev };
                    Transition::Moved
                }
                None => Transition::Exit,
            },
            WizardPosition::AddExperience { primary, sub } => match sub.prev() {
                Some(prev) => {
                    self.position = WizardPosition::AddExperience { primary, sub: prev };
                    Transition::Moved
                }
                None => {
                    self.position = WizardPosition::Primary { step: primary };
                    Transition::SubFlowCancelled
                }
            },
        }
    }

    pub fn enter_sub_flow(&mut self) -> Result<(), WizardError> {
        let WizardPosition::Primary { step } = self.position else {
            return Err(WizardError::AlreadyInSubFlow);
        };
        self.direction = Direction::Forward;
        self.position = WizardPosition::AddExperience {
            primary: step,
            sub: SubStep::Role,
        };
        Ok(())
    }

    /// Direct navigation from the review step's edit shortcuts. Skips validation
    /// of any intervening step.
    pub fn jump_to(&mut self, target: PrimaryStep) -> Result<(), WizardError> {
        let WizardPosition::Primary { step } = self.position else {
            return Err(WizardError::NotInPrimaryFlow);
        };
        self.direction = if target < step {
            Direction::Backward
        } else {
            Direction::Forward
        };
        self.position = WizardPosition::Primary { step: target };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary(step: PrimaryStep) -> WizardPosition {
        WizardPosition::Primary { step }
    }

    #[test]
    fn test_advance_then_retreat_is_symmetric_in_primary() {
        for index in 0..PrimaryStep::Review.index() {
            let start = PrimaryStep::from_index(index).unwrap();
            let mut seq = StepSequencer::new(start);
            assert_eq!(seq.advance(), Transition::Moved);
            assert_eq!(seq.retreat(), Transition::Moved);
            assert_eq!(seq.position(), primary(start));
        }
    }

    #[test]
    fn test_advance_from_review_finalizes_without_moving() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        assert_eq!(seq.advance(), Transition::Finalize);
        assert_eq!(seq.position(), primary(PrimaryStep::Review));
    }

    #[test]
    fn test_retreat_from_first_step_exits() {
        let mut seq = StepSequencer::new(PrimaryStep::Role);
        assert_eq!(seq.retreat(), Transition::Exit);
        assert_eq!(seq.position(), primary(PrimaryStep::Role));
        assert_eq!(seq.direction(), Direction::Backward);
    }

    #[test]
    fn test_sub_flow_walk_and_complete() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        seq.enter_sub_flow().unwrap();
        assert_eq!(
            seq.position(),
            WizardPosition::AddExperience {
                primary: PrimaryStep::Review,
                sub: SubStep::Role
            }
        );
        assert_eq!(seq.advance(), Transition::Moved);
        assert_eq!(seq.advance(), Transition::Moved);
        assert_eq!(seq.advance(), Transition::SubFlowCompleted);
        assert_eq!(seq.position(), primary(PrimaryStep::Review));
        assert_eq!(seq.direction(), Direction::Backward);
    }

    #[test]
    fn test_sub_flow_retreat_unwinds_then_cancels() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        seq.enter_sub_flow().unwrap();
        seq.advance();
        assert_eq!(seq.retreat(), Transition::Moved);
        assert_eq!(seq.retreat(), Transition::SubFlowCancelled);
        assert_eq!(seq.position(), primary(PrimaryStep::Review));
    }

    #[test]
    fn test_sub_flow_advance_retreat_symmetric_below_last() {
        let mut seq = StepSequencer::new(PrimaryStep::Tasks);
        seq.enter_sub_flow().unwrap();
        let before = seq.position();
        seq.advance();
        seq.retreat();
        assert_eq!(seq.position(), before);
    }

    #[test]
    fn test_enter_sub_flow_twice_is_rejected() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        seq.enter_sub_flow().unwrap();
        assert!(matches!(
            seq.enter_sub_flow(),
            Err(WizardError::AlreadyInSubFlow)
        ));
    }

    #[test]
    fn test_jump_to_sets_direction() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        seq.jump_to(PrimaryStep::Skills).unwrap();
        assert_eq!(seq.position(), primary(PrimaryStep::Skills));
        assert_eq!(seq.direction(), Direction::Backward);
        seq.jump_to(PrimaryStep::Review).unwrap();
        assert_eq!(seq.direction(), Direction::Forward);
    }

    #[test]
    fn test_jump_to_from_sub_flow_is_rejected() {
        let mut seq = StepSequencer::new(PrimaryStep::Review);
        seq.enter_sub_flow().unwrap();
        assert!(matches!(
            seq.jump_to(PrimaryStep::Skills),
            Err(WizardError::NotInPrimaryFlow)
        ));
    }

    #[test]
    fn test_step_index_round_trip_and_bounds() {
        assert_eq!(PrimaryStep::from_index(6), Some(PrimaryStep::Review));
        assert_eq!(PrimaryStep::from_index(7), None);
        assert_eq!(PrimaryStep::Skills.index(), 3);
        assert_eq!(PrimaryStep::Role.prev(), None);
    }
}
