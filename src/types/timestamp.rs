use chrono::{DateTime, Local};
use std::fmt;

/// Wall-clock instant of a run, rendered the way the history log stores it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Local>);

impl Timestamp {
    pub const FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

    pub fn now() -> Self {
        Timestamp(Local::now())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[test]
    fn renders_log_format_without_subseconds() {
        let rendered = Timestamp::now().to_string();

        assert_eq!(rendered.len(), 19);
        assert!(NaiveDateTime::parse_from_str(&rendered, Timestamp::FORMAT).is_ok());
    }
}
