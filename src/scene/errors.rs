//! Error types for building and navigating a scene
//!
//! - [`ScenarioError`]: a scenario file or configuration is malformed
//! - [`TimelineError`]: navigation ran into either end, or the frame cap was hit
//! - [`SceneError`]: everything the director can fail with while building

use crate::walk::WalkError;
use std::fmt;

/// Scenario parse or validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioError {
    /// 1-based line in the scenario file, 0 for whole-scenario checks
    pub line: usize,
    pub message: String,
}

impl ScenarioError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        ScenarioError {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            write!(f, "Invalid scenario: {}", self.message)
        } else {
            write!(f, "Scenario error at line {}: {}", self.line, self.message)
        }
    }
}

impl std::error::Error for ScenarioError {}

/// Timeline navigation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineError {
    /// Already at the first frame
    AtStart,
    /// Already at the last frame
    AtEnd,
    /// The timeline has no frames
    Empty,
    /// Too many frames for one timeline
    FrameLimitExceeded { limit: usize },
}

impl fmt::Display for TimelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimelineError::AtStart => write!(f, "Already at the first frame"),
            TimelineError::AtEnd => write!(f, "Already at the last frame"),
            TimelineError::Empty => write!(f, "Timeline has no frames"),
            TimelineError::FrameLimitExceeded { limit } => {
                write!(f, "Frame limit exceeded: at most {} frames", limit)
            }
        }
    }
}

impl std::error::Error for TimelineError {}

/// Errors raised while the director builds a timeline
#[derive(Debug, Clone)]
pub enum SceneError {
    Scenario(ScenarioError),
    Walk(WalkError),
    /// Heap or stack update failed
    Memory(String),
    Timeline(TimelineError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Scenario(e) => write!(f, "{}", e),
            SceneError::Walk(e) => write!(f, "{}", e),
            SceneError::Memory(message) => write!(f, "Memory operation failed: {}", message),
            SceneError::Timeline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SceneError {}

impl From<ScenarioError> for SceneError {
    fn from(err: ScenarioError) -> Self {
        SceneError::Scenario(err)
    }
}

impl From<WalkError> for SceneError {
    fn from(err: WalkError) -> Self {
        SceneError::Walk(err)
    }
}

impl From<TimelineError> for SceneError {
    fn from(err: TimelineError) -> Self {
        SceneError::Timeline(err)
    }
}

impl From<String> for SceneError {
    fn from(message: String) -> Self {
        SceneError::Memory(message)
    }
}
