//! The run record and the run sequence of one channel.

/// The longest run a record can describe; the on-disk length field is a `u16`.
pub const MAX_RUN_LENGTH: u16 = u16::MAX;

/// `length` consecutive traversal positions represented by one mean `value`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Run {
    pub length: u16,
    pub value: f32,
}

impl Run {
    /// Opens a run holding a single sample.
    pub fn new(value: f32) -> Self {
        Self { length: 1, value }
    }

    /// True once the run cannot absorb another sample.
    pub fn is_full(&self) -> bool {
        self.length == MAX_RUN_LENGTH
    }

    /// Folds one more sample into the run, updating the mean incrementally.
    /// The caller must check `is_full` first.
    pub fn fold(&mut self, sample: f32) {
        self.length += 1;
        self.value += (sample - self.value) / f32::from(self.length);
    }
}

/// The runs of one channel in traversal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelRuns {
    pub runs: Vec<Run>,
    /// How many runs were closed because they reached `MAX_RUN_LENGTH` rather
    /// than because the threshold was crossed.
    pub capped_runs: usize,
}

impl ChannelRuns {
    pub fn from_runs(runs: Vec<Run>) -> Self {
        Self {
            runs,
            capped_runs: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The number of traversal positions the runs cover.
    pub fn covered_slots(&self) -> usize {
        self.runs.iter().map(|r| usize::from(r.length)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_keeps_running_mean() {
        let mut run = Run::new(0.2);
        run.fold(0.4);
        run.fold(0.6);
        assert_eq!(run.length, 3);
        assert!((run.value - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_fold_identical_samples_is_exact() {
        let mut run = Run::new(0.3);
        for _ in 0..1000 {
            run.fold(0.3);
        }
        assert_eq!(run.value, 0.3);
    }

    #[test]
    fn test_covered_slots() {
        let runs = ChannelRuns::from_runs(vec![
            Run { length: 3, value: 0.0 },
            Run { length: MAX_RUN_LENGTH, value: 1.0 },
        ]);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs.covered_slots(), 3 + 65535);
        assert!(Run { length: MAX_RUN_LENGTH, value: 0.0 }.is_full());
    }
}
