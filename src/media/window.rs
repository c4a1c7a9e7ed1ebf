use std::time::Duration;

/// Where a timestamp falls relative to a [`TimeWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    Before,
    Inside,
    After,
}

/// Inclusive time range of frames to keep from a stream, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeWindow {
    pub start: f64,
    /// `None` keeps everything from `start` on.
    pub end: Option<f64>,
}

impl TimeWindow {
    pub fn new(start: f64, end: Option<f64>) -> Self {
        Self { start, end }
    }

    pub fn position(&self, t: f64) -> WindowPosition {
        if t < self.start {
            WindowPosition::Before
        } else if self.end.is_some_and(|end| t > end) {
            WindowPosition::After
        } else {
            WindowPosition::Inside
        }
    }
}

/// Timestamp of frame `index` at a constant frame rate.
pub fn frame_timestamp(index: u64, fps: f64) -> Duration {
    Duration::from_secs_f64(index as f64 / fps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_bounds_inclusive() {
        let window = TimeWindow::new(1.0, Some(2.0));
        assert_eq!(window.position(0.99), WindowPosition::Before);
        assert_eq!(window.position(1.0), WindowPosition::Inside);
        assert_eq!(window.position(2.0), WindowPosition::Inside);
        assert_eq!(window.position(2.01), WindowPosition::After);
    }

    #[test]
    fn test_open_window() {
        let window = TimeWindow::default();
        assert_eq!(window.position(1e6), WindowPosition::Inside);
    }

    #[test]
    fn test_frame_timestamp() {
        assert_eq!(frame_timestamp(30, 30.0), Duration::from_secs(1));
    }
}
