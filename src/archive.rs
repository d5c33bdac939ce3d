use crate::MergeError;
use itertools::Itertools;
use std::collections::VecDeque;

/// Sink for solution records that can later be drained as text.
pub trait SolutionArchive {
    fn add_solution(&mut self, value1: &str, value2: &str, raw_line: &str) -> Result<(), MergeError>;

    /// Next stored solution line, removing it from the archive. `None` once drained.
    fn next_solution_text(&mut self) -> Option<String>;
}

#[derive(Debug, Clone)]
struct ArchivePoint {
    f1: f64,
    f2: f64,
    raw: String,
}

impl ArchivePoint {
    fn weakly_dominates(&self, other: &ArchivePoint) -> bool {
        self.f1 <= other.f1 && self.f2 <= other.f2
    }
}

/// Bi-objective (minimisation) archive keeping only non-dominated, distinct points.
///
/// Draining yields lines ordered by the first objective, ties broken by the second.
#[derive(Debug, Default)]
pub struct NondominatedArchive {
    points: Vec<ArchivePoint>,
    pending: VecDeque<String>,
}

impl NondominatedArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_objective(value: &str) -> Result<f64, MergeError> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|e| MergeError::Parse(format!("invalid objective value '{}': {}", value, e)))?;
    if !parsed.is_finite() {
        return Err(MergeError::Parse(format!("objective value '{}' is not finite", value)));
    }
    Ok(parsed)
}

impl SolutionArchive for NondominatedArchive {
    fn add_solution(&mut self, value1: &str, value2: &str, raw_line: &str) -> Result<(), MergeError> {
        let point = ArchivePoint {
            f1: parse_objective(value1)?,
            f2: parse_objective(value2)?,
            raw: raw_line.to_string(),
        };

        if self.points.iter().any(|stored| stored.weakly_dominates(&point)) {
            return Ok(());
        }
        self.points.retain(|stored| !point.weakly_dominates(stored));
        self.points.push(point);
        Ok(())
    }

    fn next_solution_text(&mut self) -> Option<String> {
        if self.pending.is_empty() && !self.points.is_empty() {
            self.pending = self
                .points
                .drain(..)
                .sorted_by(|a, b| a.f1.total_cmp(&b.f1).then(a.f2.total_cmp(&b.f2)))
                .map(|point| point.raw)
                .collect();
        }
        self.pending.pop_front()
    }
}

/// Keeps every line in arrival order.
#[derive(Debug, Default)]
pub struct PassThroughArchive {
    lines: VecDeque<String>,
}

impl PassThroughArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl SolutionArchive for PassThroughArchive {
    fn add_solution(&mut self, _value1: &str, _value2: &str, raw_line: &str) -> Result<(), MergeError> {
        self.lines.push_back(raw_line.to_string());
        Ok(())
    }

    fn next_solution_text(&mut self) -> Option<String> {
        self.lines.pop_front()
    }
}
