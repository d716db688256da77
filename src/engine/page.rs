//! Host collaborator seams.
//!
//! The engine never touches a concrete display surface.  Whatever renders the
//! page implements [`Page`]; whatever owns pinned-section measurements
//! implements [`Timeline`].

/// The size measurements a page reports for its content.
///
/// Layout engines disagree on which one is authoritative, so the content
/// height is taken as the maximum of all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ContentMeasurements {
    pub body_scroll_height: f64,
    pub body_offset_height: f64,
    pub root_client_height: f64,
    pub root_scroll_height: f64,
    pub root_offset_height: f64,
}

impl ContentMeasurements {
    /// A page whose every measurement agrees on `height`.
    pub fn uniform(height: f64) -> Self {
        Self {
            body_scroll_height: height,
            body_offset_height: height,
            root_client_height: height,
            root_scroll_height: height,
            root_offset_height: height,
        }
    }

    pub fn content_height(&self) -> f64 {
        [
            self.body_scroll_height,
            self.body_offset_height,
            self.root_client_height,
            self.root_scroll_height,
            self.root_offset_height,
        ]
        .into_iter()
        .fold(0.0, f64::max)
    }
}

/// The page the engine scrolls.
pub trait Page {
    fn measurements(&self) -> ContentMeasurements;

    fn viewport_height(&self) -> f64;

    /// Offset currently shown at the top of the viewport.
    fn scroll_offset(&self) -> f64;

    /// Move the visible viewport.  The only way the engine changes what the
    /// user sees.
    fn set_scroll_offset(&mut self, y: f64);

    /// Absolute document offset of the element carrying `anchor`, if any.
    fn anchor_offset(&self, anchor: &str) -> Option<f64>;

    fn prefers_reduced_motion(&self) -> bool {
        false
    }
}

/// Scroll-driven timeline library, seen from the scroll core.
pub trait Timeline {
    /// Recorded start offset of the pinned section triggered by `anchor`.
    fn trigger_start(&self, anchor: &str) -> Option<f64>;

    /// Recompute pinned-section measurements against the final layout.
    fn refresh(&mut self, page: &dyn Page);
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_height_is_the_largest_measurement() {
        let m = ContentMeasurements {
            body_scroll_height: 900.0,
            body_offset_height: 1200.0,
            root_client_height: 600.0,
            root_scroll_height: 1100.0,
            root_offset_height: 1000.0,
        };
        assert_eq!(m.content_height(), 1200.0);
    }
}
