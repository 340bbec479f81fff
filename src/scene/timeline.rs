// Frame history and navigation

use super::errors::TimelineError;
use super::frame::Frame;

/// Ordered frames plus the position the viewer is at
#[derive(Debug)]
pub struct Timeline {
    frames: Vec<Frame>,
    position: usize,
    max_frames: usize,
}

impl Timeline {
    pub fn new(max_frames: usize) -> Self {
        Timeline {
            frames: Vec::new(),
            position: 0,
            max_frames,
        }
    }

    /// Append a frame
    pub fn push(&mut self, frame: Frame) -> Result<(), TimelineError> {
        if self.frames.len() >= self.max_frames {
            return Err(TimelineError::FrameLimitExceeded {
                limit: self.max_frames,
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Frame at the current position
    pub fn current(&self) -> Option<&Frame> {
        self.frames.get(self.position)
    }

    /// Get a frame by index
    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.frames.len()
    }

    pub fn step_forward(&mut self) -> Result<(), TimelineError> {
        if self.frames.is_empty() {
            return Err(TimelineError::Empty);
        }
        if self.is_at_end() {
            return Err(TimelineError::AtEnd);
        }
        self.position += 1;
        Ok(())
    }

    pub fn step_backward(&mut self) -> Result<(), TimelineError> {
        if self.frames.is_empty() {
            return Err(TimelineError::Empty);
        }
        if self.position == 0 {
            return Err(TimelineError::AtStart);
        }
        self.position -= 1;
        Ok(())
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.frames.len().saturating_sub(1);
    }
}
