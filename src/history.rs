use std::collections::VecDeque;

/// Fixed-length history of samples; the oldest sample falls off when full.
#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    capacity: usize,
    values: VecDeque<f64>,
}

impl HistoricalSeries {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.capacity == 0 {
            return;
        }
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut series = HistoricalSeries::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            series.push(v);
        }
        assert_eq!(series.len(), 3);
        assert_eq!(series.iter().collect::<Vec<_>>(), vec![3.0, 4.0, 5.0]);
        assert_eq!(series.latest(), Some(5.0));
    }

    #[test]
    fn test_partial_fill() {
        let mut series = HistoricalSeries::new(60);
        series.push(12.5);
        assert_eq!(series.len(), 1);
        assert_eq!(series.capacity(), 60);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut series = HistoricalSeries::new(0);
        series.push(1.0);
        assert!(series.is_empty());
        assert_eq!(series.latest(), None);
    }
}
