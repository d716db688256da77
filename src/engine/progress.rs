//! Reading-progress percentage.

/// `scroll_top / (scroll_height - client_height) * 100`, clamped to
/// `[0, 100]`.  Zero when nothing can scroll.
pub fn progress_percent(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let extent = scroll_height - client_height;
    if extent.is_nan() || extent <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / extent * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_to_offset() {
        assert_eq!(progress_percent(0.0, 5000.0, 1000.0), 0.0);
        assert_eq!(progress_percent(1000.0, 5000.0, 1000.0), 25.0);
        assert_eq!(progress_percent(4000.0, 5000.0, 1000.0), 100.0);
    }

    #[test]
    fn no_extent_reads_zero() {
        assert_eq!(progress_percent(0.0, 800.0, 1000.0), 0.0);
        assert_eq!(progress_percent(10.0, 1000.0, 1000.0), 0.0);
    }

    #[test]
    fn overscroll_is_clamped() {
        assert_eq!(progress_percent(4500.0, 5000.0, 1000.0), 100.0);
        assert_eq!(progress_percent(-20.0, 5000.0, 1000.0), 0.0);
    }
}
