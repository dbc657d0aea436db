/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64); // seconds

impl Time {
    pub fn from_millis(ms: u64) -> Self {
        Time(ms as f64 / 1000.0)
    }

    /// Whole milliseconds, rounded to the nearest.
    pub fn as_millis(&self) -> u64 {
        (self.0 * 1000.0).round().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::Time;

    #[test]
    fn millis_round_trip() {
        assert_eq!(Time::from_millis(5000), Time(5.0));
        assert_eq!(Time(1.0 / 60.0).as_millis(), 17);
        assert_eq!(Time(-1.0).as_millis(), 0);
    }
}
