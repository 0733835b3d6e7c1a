//! Step sequencer: linear navigation with backtracking over the four wizard
//! steps.
//!
//! Forward moves go one step at a time and run a checkpoint first. Backward
//! moves are free, either one step at a time or by jumping to any earlier step.

use serde::{Deserialize, Serialize};

use crate::model::{Fields, Step};

/// A step that advances on its own once the listed fields are all set.
#[derive(Debug)]
pub struct AutoAdvance {
    pub step: Step,
    pub when_set: &'static [&'static str],
}

/// Automatic transitions, evaluated after a field update that touches one of
/// the listed fields.
pub const AUTO_ADVANCE: &[AutoAdvance] = &[AutoAdvance {
    step: Step::BasicInfo,
    when_set: &["category", "subcategory"],
}];

/// A jump that would not move backward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("can only jump back to an earlier step (at {current}, asked for {requested})")]
pub struct JumpRejected {
    pub current: Step,
    pub requested: Step,
}

/// Tracks the current step of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepSequencer {
    current: Step,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    /// A sequencer at the first step.
    pub fn new() -> Self {
        Self {
            current: Step::FIRST,
        }
    }

    pub fn current(&self) -> Step {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current == Step::LAST
    }

    /// Moves forward one step, running `checkpoint` first.
    ///
    /// The checkpoint receives the step being left. If it fails, the step is
    /// unchanged and its error is returned. At the last step this is a no-op
    /// and the checkpoint is not run. Returns whether the step changed.
    pub fn next<E>(&mut self, checkpoint: impl FnOnce(Step) -> Result<(), E>) -> Result<bool, E> {
        let Some(following) = self.current.succ() else {
            return Ok(false);
        };
        checkpoint(self.current)?;
        tracing::debug!(from = %self.current, to = %following, "step advanced");
        self.current = following;
        Ok(true)
    }

    /// Moves back one step. No-op at the first step. Returns whether the step
    /// changed.
    pub fn previous(&mut self) -> bool {
        match self.current.pred() {
            Some(preceding) => {
                self.current = preceding;
                true
            }
            None => false,
        }
    }

    /// Jumps directly to an earlier step.
    pub fn jump_to(&mut self, step: Step) -> Result<(), JumpRejected> {
        if step >= self.current {
            return Err(JumpRejected {
                current: self.current,
                requested: step,
            });
        }
        self.current = step;
        Ok(())
    }

    /// Returns to the first step.
    pub fn reset(&mut self) {
        self.current = Step::FIRST;
    }

    /// Whether an update of `changed` makes an automatic transition out of
    /// the current step due.
    pub fn auto_advance_due(&self, changed: &[String], fields: &Fields) -> bool {
        AUTO_ADVANCE.iter().any(|rule| {
            rule.step == self.current
                && changed.iter().any(|name| rule.when_set.contains(&name.as_str()))
                && rule
                    .when_set
                    .iter()
                    .all(|name| fields.get(*name).is_some_and(|v| v.is_set()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::FieldValue;

    fn at(step: Step) -> StepSequencer {
        StepSequencer { current: step }
    }

    fn no_checkpoint(_: Step) -> Result<(), ()> {
        Ok(())
    }

    #[test]
    fn next_walks_forward_and_stops_at_review() {
        let mut seq = StepSequencer::new();

        assert_eq!(seq.next(no_checkpoint), Ok(true));
        assert_eq!(seq.next(no_checkpoint), Ok(true));
        assert_eq!(seq.next(no_checkpoint), Ok(true));
        assert_eq!(seq.current(), Step::Review);

        assert_eq!(seq.next(no_checkpoint), Ok(false));
        assert_eq!(seq.current(), Step::Review);
        assert!(seq.is_terminal());
    }

    #[test]
    fn checkpoint_runs_before_advance_with_the_step_being_left() {
        let mut seq = at(Step::Details);
        let mut seen = None;

        seq.next(|step| {
            seen = Some(step);
            Ok::<_, ()>(())
        })
        .unwrap();

        assert_eq!(seen, Some(Step::Details));
        assert_eq!(seq.current(), Step::TradeOptions);
    }

    #[test]
    fn failed_checkpoint_keeps_step() {
        let mut seq = at(Step::BasicInfo);

        let result = seq.next(|_| Err("missing category"));

        assert_eq!(result, Err("missing category"));
        assert_eq!(seq.current(), Step::BasicInfo);
    }

    #[test]
    fn checkpoint_not_run_at_last_step() {
        let mut seq = at(Step::Review);
        let mut ran = false;

        seq.next(|_| {
            ran = true;
            Ok::<_, ()>(())
        })
        .unwrap();

        assert!(!ran);
    }

    #[test]
    fn previous_is_noop_at_first_step() {
        let mut seq = StepSequencer::new();
        assert!(!seq.previous());
        assert_eq!(seq.current(), Step::BasicInfo);

        let mut seq = at(Step::TradeOptions);
        assert!(seq.previous());
        assert_eq!(seq.current(), Step::Details);
    }

    #[test]
    fn jump_only_goes_backward() {
        let mut seq = at(Step::TradeOptions);

        for step in [Step::TradeOptions, Step::Review] {
            let err = seq.jump_to(step).unwrap_err();
            assert_eq!(err.requested, step);
            assert_eq!(seq.current(), Step::TradeOptions);
        }

        seq.jump_to(Step::BasicInfo).unwrap();
        assert_eq!(seq.current(), Step::BasicInfo);
    }

    #[test]
    fn auto_advance_needs_both_fields_on_basic_info() {
        let changed = ["subcategory".to_string()];
        let mut fields = Fields::new();
        fields.insert("category".into(), FieldValue::from("home"));
        assert!(!StepSequencer::new().auto_advance_due(&changed, &fields));

        fields.insert("subcategory".into(), FieldValue::from("lighting"));
        assert!(StepSequencer::new().auto_advance_due(&changed, &fields));
        assert!(!at(Step::Details).auto_advance_due(&changed, &fields));

        fields.insert("subcategory".into(), FieldValue::from(""));
        assert!(!StepSequencer::new().auto_advance_due(&changed, &fields));
    }

    #[test]
    fn auto_advance_only_on_rule_fields() {
        let mut fields = Fields::new();
        fields.insert("category".into(), FieldValue::from("home"));
        fields.insert("subcategory".into(), FieldValue::from("lighting"));
        fields.insert("title".into(), FieldValue::from("Lamp"));

        let sequencer = StepSequencer::new();
        assert!(!sequencer.auto_advance_due(&["title".to_string()], &fields));
        assert!(!sequencer.auto_advance_due(&[], &fields));
        assert!(sequencer.auto_advance_due(&["category".to_string()], &fields));
    }
}
