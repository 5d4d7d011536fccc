//! Deployment timestamp format.
//!
//! A deployment stores dates and times as two text cells. They are joined
//! with a single space and parsed against exactly one configured format;
//! there is no per-row guessing across formats, so an ambiguous string such
//! as `03.04` is read the same way in every row.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseResult};
use serde::{Deserialize, Serialize};

/// Date and time formats (chrono `strftime` syntax) for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampFormat {
    /// Format of the date cell, e.g. `%d.%m.%Y`.
    pub date: String,
    /// Format of the time cell, e.g. `%H:%M:%S`.
    pub time: String,
    /// Year to assume when the date format has none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assumed_year: Option<i32>,
}

impl TimestampFormat {
    /// `DD.MM.YYYY HH:MM:SS`
    pub fn day_first() -> Self {
        Self::custom("%d.%m.%Y", "%H:%M:%S")
    }

    /// `YYYY-MM-DD HH:MM:SS`
    pub fn iso() -> Self {
        Self::custom("%Y-%m-%d", "%H:%M:%S")
    }

    /// `DD.MM HH:MM`, completed with an assumed year.
    pub fn day_month(year: i32) -> Self {
        Self {
            date: "%d.%m".to_string(),
            time: "%H:%M".to_string(),
            assumed_year: Some(year),
        }
    }

    /// Arbitrary date and time formats.
    pub fn custom(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            assumed_year: None,
        }
    }

    /// The combined pattern the joined `date time` text is parsed with.
    pub fn pattern(&self) -> String {
        match self.assumed_year {
            Some(_) => format!("{} {} %Y", self.date, self.time),
            None => format!("{} {}", self.date, self.time),
        }
    }

    /// Join the two cells with a single space, as they are parsed.
    pub fn join(date: &str, time: &str) -> String {
        format!("{} {}", date.trim(), time.trim())
    }

    /// Parse a date cell and a time cell into one timestamp.
    pub fn parse(&self, date: &str, time: &str) -> ParseResult<NaiveDateTime> {
        let mut text = Self::join(date, time);
        if let Some(year) = self.assumed_year {
            text.push(' ');
            text.push_str(&year.to_string());
        }
        NaiveDateTime::parse_from_str(&text, &self.pattern())
    }

    /// Render a date the way this deployment stores it.
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.date).to_string()
    }

    /// Render a time the way this deployment stores it.
    pub fn format_time(&self, time: NaiveTime) -> String {
        time.format(&self.time).to_string()
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self::day_first()
    }
}
