//! Non-empty, immutable sequence of steps.

use serde::Serialize;

use crate::error::TraceError;
use crate::step::Step;

/// Ordered execution trace. Always holds at least one step.
///
/// Position 0 is the initial state, the last position the terminal state.
/// Steps are kept exactly in the order supplied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

#[allow(clippy::len_without_is_empty)]
impl Trace {
    pub fn new(steps: Vec<Step>) -> Result<Self, TraceError> {
        if steps.is_empty() {
            return Err(TraceError::EmptyTrace);
        }
        Ok(Trace { steps })
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn get(&self, position: usize) -> Option<&Step> {
        self.steps.get(position)
    }

    pub fn last_position(&self) -> usize {
        self.steps.len() - 1
    }

    /// First position whose step number does not strictly increase over its
    /// predecessor's, if any.
    pub fn first_index_anomaly(&self) -> Option<usize> {
        self.steps
            .windows(2)
            .position(|pair| pair[1].index <= pair[0].index)
            .map(|p| p + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_rejected() {
        assert_eq!(Trace::new(Vec::new()), Err(TraceError::EmptyTrace));
    }

    #[test]
    fn keeps_order() {
        let trace = Trace::new(vec![Step::new(1, "a"), Step::new(2, "b"), Step::new(3, "c")])
            .unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.last_position(), 2);
        let descriptions: Vec<_> = trace.steps().iter().map(|s| s.description.as_str()).collect();
        assert_eq!(descriptions, vec!["a", "b", "c"]);
        assert_eq!(trace.first_index_anomaly(), None);
    }

    #[test]
    fn reports_non_increasing_index() {
        let trace = Trace::new(vec![Step::new(1, "a"), Step::new(3, "b"), Step::new(3, "c")])
            .unwrap();
        assert_eq!(trace.first_index_anomaly(), Some(2));
    }
}
