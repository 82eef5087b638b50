// High/low partitioning of predicted tide extrema
use crate::domain::tide::{ExtremumEvent, ExtremumKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extrema {
    pub highs: Vec<ExtremumEvent>,
    pub lows: Vec<ExtremumEvent>,
}

impl Extrema {
    pub fn len(&self) -> usize {
        self.highs.len() + self.lows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.highs.is_empty() && self.lows.is_empty()
    }
}

/// Split events by kind, keeping input order within each side.
pub fn classify_extrema(events: &[ExtremumEvent]) -> Extrema {
    let (highs, lows) = events
        .iter()
        .partition(|event| event.kind == ExtremumKind::High);
    Extrema { highs, lows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_classify_preserves_order_and_count() {
        let at = |h| Utc.with_ymd_and_hms(2024, 7, 28, h, 0, 0).unwrap();
        let events = vec![
            ExtremumEvent::new(at(2), 4.9, ExtremumKind::High),
            ExtremumEvent::new(at(8), -0.3, ExtremumKind::Low),
            ExtremumEvent::new(at(14), 3.8, ExtremumKind::High),
            ExtremumEvent::new(at(20), 1.7, ExtremumKind::Low),
            ExtremumEvent::new(at(23), 5.1, ExtremumKind::High),
        ];

        let extrema = classify_extrema(&events);

        assert_eq!(extrema.len(), events.len());
        let high_times: Vec<_> = extrema.highs.iter().map(|e| e.time).collect();
        let low_times: Vec<_> = extrema.lows.iter().map(|e| e.time).collect();
        assert_eq!(high_times, vec![at(2), at(14), at(23)]);
        assert_eq!(low_times, vec![at(8), at(20)]);
    }

    #[test]
    fn test_classify_empty() {
        let extrema = classify_extrema(&[]);
        assert!(extrema.is_empty());
    }
}
