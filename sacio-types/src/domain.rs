/// Область, в которой находятся отсчёты записи.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Вещественные отсчёты во времени
    Time,
    /// Комплексный полуспектр (`npts / 2 + 1` отсчётов)
    Frequency,
}

impl std::fmt::Display for Domain {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Domain::Time => write!(f, "time"),
            Domain::Frequency => write!(f, "frequency"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_display() {
        assert_eq!(Domain::Time.to_string(), "time");
        assert_eq!(Domain::Frequency.to_string(), "frequency");
        assert_ne!(Domain::Time, Domain::Frequency);
    }
}
