/// Run-wide first/last call tracker, scoped to one analysis invocation
/// and passed explicitly so concurrent analyses cannot interfere.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunClock {
    first: Option<i64>,
    last: Option<i64>,
}

impl RunClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, date: i64) {
        self.first = Some(match self.first {
            Some(first) => first.min(date),
            None => date,
        });
        self.last = Some(match self.last {
            Some(last) => last.max(date),
            None => date,
        });
    }

    #[must_use]
    pub fn first(&self) -> Option<i64> {
        self.first
    }

    #[must_use]
    pub fn last(&self) -> Option<i64> {
        self.last
    }

    /// Milliseconds between the first and last recorded call.
    #[must_use]
    pub fn span_ms(&self) -> Option<i64> {
        match (self.first, self.last) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_extremes_in_any_order() {
        let mut clock = RunClock::new();
        assert_eq!(clock.span_ms(), None);

        clock.record(50);
        clock.record(10);
        clock.record(30);

        assert_eq!(clock.first(), Some(10));
        assert_eq!(clock.last(), Some(50));
        assert_eq!(clock.span_ms(), Some(40));
    }

    #[test]
    fn single_call_has_zero_span() {
        let mut clock = RunClock::new();
        clock.record(7);
        assert_eq!(clock.span_ms(), Some(0));
    }
}
