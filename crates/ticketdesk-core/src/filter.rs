// ── Client-side date/hour filter ──
//
// The ticket list is fetched once and narrowed locally by calendar date,
// hour of day, and a "show all history" toggle. Dates and hours are
// evaluated in the viewer's time zone, passed in as a `chrono::TimeZone`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Ticket;

/// Hour-of-day selector: every hour, or the `[H:00, H+1:00)` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HourFilter {
    #[default]
    All,
    Hour(u8),
}

impl HourFilter {
    /// Step forward through `all, 0, 1, .., 23, all`.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Hour(0),
            Self::Hour(h) if h >= 23 => Self::All,
            Self::Hour(h) => Self::Hour(h + 1),
        }
    }

    /// Step backward through `all, 23, 22, .., 0, all`.
    pub fn prev(self) -> Self {
        match self {
            Self::All => Self::Hour(23),
            Self::Hour(0) => Self::All,
            Self::Hour(h) => Self::Hour(h - 1),
        }
    }

    pub fn matches(self, hour: u32) -> bool {
        match self {
            Self::All => true,
            Self::Hour(h) => u32::from(h) == hour,
        }
    }
}

impl fmt::Display for HourFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Hour(h) => write!(f, "{h:02}:00"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("hour must be 'all' or 0-23, got {0:?}")]
pub struct InvalidHour(pub String);

impl FromStr for HourFilter {
    type Err = InvalidHour;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        let digits = trimmed.strip_suffix(":00").unwrap_or(trimmed);
        match digits.parse::<u8>() {
            Ok(h) if h < 24 => Ok(Self::Hour(h)),
            _ => Err(InvalidHour(s.to_owned())),
        }
    }
}

/// The three controls that derive the visible subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFilter {
    pub date: NaiveDate,
    pub hour: HourFilter,
    pub show_all_history: bool,
}

impl ViewFilter {
    /// Today in `tz`, all hours, history off.
    pub fn today<Tz: TimeZone>(tz: &Tz) -> Self {
        Self::for_date(Utc::now().with_timezone(tz).date_naive())
    }

    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            hour: HourFilter::All,
            show_all_history: false,
        }
    }

    pub fn prev_day(&mut self) {
        if let Some(d) = self.date.pred_opt() {
            self.date = d;
        }
    }

    pub fn next_day(&mut self) {
        if let Some(d) = self.date.succ_opt() {
            self.date = d;
        }
    }

    pub fn toggle_history(&mut self) {
        self.show_all_history = !self.show_all_history;
    }

    /// Whether `ticket` belongs in the visible subset.
    ///
    /// With history on, every ticket matches. Otherwise the send time,
    /// seen in `tz`, must fall on `date` and inside the selected hour.
    pub fn matches<Tz: TimeZone>(&self, ticket: &Ticket, tz: &Tz) -> bool {
        if self.show_all_history {
            return true;
        }
        let local = ticket.email_sent_at.with_timezone(tz);
        local.date_naive() == self.date && self.hour.matches(local.hour())
    }

    /// Visible subset, in fetched order.
    pub fn apply<'a, Tz: TimeZone>(&self, tickets: &'a [Ticket], tz: &Tz) -> Vec<&'a Ticket> {
        tickets.iter().filter(|t| self.matches(t, tz)).collect()
    }

    /// Short human label, e.g. `2024-01-15 08:00` or `all history`.
    pub fn label(&self) -> String {
        if self.show_all_history {
            "all history".into()
        } else {
            match self.hour {
                HourFilter::All => format!("{} (all hours)", self.date),
                HourFilter::Hour(_) => format!("{} {}", self.date, self.hour),
            }
        }
    }
}
