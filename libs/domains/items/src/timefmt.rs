//! Relative creation-time formatting.
//!
//! Pure and deterministic: `now` is injected rather than read from the
//! ambient clock, and the locale is fixed at construction instead of being
//! configured process-wide.

use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 3_600;
const DAY: i64 = 86_400;
const MONTH: i64 = 2_592_000; // 30 days
const YEAR: i64 = 31_536_000; // 365 days

/// Output language for [`RelativeTimeFormatter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Es,
}

enum Unit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl Unit {
    fn word(&self, locale: Locale, singular: bool) -> &'static str {
        match (locale, self, singular) {
            (Locale::En, Unit::Minute, true) => "minute",
            (Locale::En, Unit::Minute, false) => "minutes",
            (Locale::En, Unit::Hour, true) => "hour",
            (Locale::En, Unit::Hour, false) => "hours",
            (Locale::En, Unit::Day, true) => "day",
            (Locale::En, Unit::Day, false) => "days",
            (Locale::En, Unit::Month, true) => "month",
            (Locale::En, Unit::Month, false) => "months",
            (Locale::En, Unit::Year, true) => "year",
            (Locale::En, Unit::Year, false) => "years",
            (Locale::Es, Unit::Minute, true) => "minuto",
            (Locale::Es, Unit::Minute, false) => "minutos",
            (Locale::Es, Unit::Hour, true) => "hora",
            (Locale::Es, Unit::Hour, false) => "horas",
            (Locale::Es, Unit::Day, true) => "día",
            (Locale::Es, Unit::Day, false) => "días",
            (Locale::Es, Unit::Month, true) => "mes",
            (Locale::Es, Unit::Month, false) => "meses",
            (Locale::Es, Unit::Year, true) => "año",
            (Locale::Es, Unit::Year, false) => "años",
        }
    }
}

/// Formats an absolute timestamp as a human-readable elapsed-time string.
///
/// Construct one at startup and pass it where it is needed; there is no
/// global locale state.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeTimeFormatter {
    locale: Locale,
}

impl RelativeTimeFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Render the elapsed time between `created_at` and `now`.
    ///
    /// All divisions truncate toward zero; the singular form is used when
    /// the truncated count is exactly 1.
    pub fn format(&self, created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let seconds = (now - created_at).num_seconds();

        if seconds < MINUTE {
            return match self.locale {
                Locale::En => "a few seconds ago".to_string(),
                Locale::Es => "Hace unos segundos".to_string(),
            };
        }

        let (n, unit) = if seconds < HOUR {
            (seconds / MINUTE, Unit::Minute)
        } else if seconds < DAY {
            (seconds / HOUR, Unit::Hour)
        } else if seconds < MONTH {
            (seconds / DAY, Unit::Day)
        } else if seconds < YEAR {
            (seconds / MONTH, Unit::Month)
        } else {
            (seconds / YEAR, Unit::Year)
        };

        let word = unit.word(self.locale, n == 1);
        match self.locale {
            Locale::En => format!("{} {} ago", n, word),
            Locale::Es => format!("Hace {} {}", n, word),
        }
    }

    /// Like [`format`](Self::format), but renders a missing timestamp as an
    /// empty string.
    pub fn format_opt(&self, created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
        created_at
            .map(|ts| self.format(ts, now))
            .unwrap_or_default()
    }
}
