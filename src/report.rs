use crate::walker::DirectionTally;
use serde::{Deserialize, Serialize};
use std::fmt;

/// End-of-run statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub side: u32,
    pub tally: DirectionTally,
    /// Moves taken, equal to the tally total
    pub steps: u64,
    /// Cells converted to filled
    pub freezes: u64,
    pub filled_cells: usize,
    /// False when the run was stopped before reaching the center
    pub completed: bool,
    pub elapsed_ms: u64,
}

impl RunReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, count) in self.tally.counts().iter().enumerate() {
            writeln!(f, "[{}] : {}", index, count)?;
        }
        if self.completed {
            write!(f, "Finished")
        } else {
            write!(f, "Interrupted")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walker::Direction;

    fn sample_report(completed: bool) -> RunReport {
        let mut tally = DirectionTally::default();
        tally.record(Direction::East);
        tally.record(Direction::East);
        tally.record(Direction::NorthEast);
        RunReport {
            side: 11,
            tally,
            steps: 3,
            freezes: 1,
            filled_cells: 77,
            completed,
            elapsed_ms: 4,
        }
    }

    #[test]
    fn test_display_lists_every_direction() {
        let text = sample_report(true).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "[0] : 2");
        assert_eq!(lines[3], "[3] : 0");
        assert_eq!(lines[7], "[7] : 1");
        assert_eq!(lines[8], "Finished");
    }

    #[test]
    fn test_interrupted_run_is_labelled() {
        let text = sample_report(false).to_string();
        assert!(text.ends_with("Interrupted"));
    }

    #[test]
    fn test_json_output() {
        let json = sample_report(true).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["side"], 11);
        assert_eq!(value["tally"]["counts"][0], 2);
        assert_eq!(value["completed"], true);
    }
}
