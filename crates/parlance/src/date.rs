//! Locale-aware date/time formatting on top of chrono's locale tables.

use std::fmt::{Display, Write};

use chrono::{DateTime, Locale, TimeZone};
use tracing::debug;

use crate::error::IntlError;

/// Predefined length of the date or time part.
///
/// [`DateStyle::Short`] dates use the locale's own `%x` layout. The longer
/// styles are fixed day-month-year patterns on a 24-hour clock; only the
/// month and weekday names follow the locale. Use
/// [`DateTimeFormat::Pattern`] where the field order matters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateStyle {
    #[default]
    None,
    Short,
    Medium,
    Long,
    Full,
}

impl DateStyle {
    fn date_pattern(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Short => Some("%x"),
            Self::Medium => Some("%d %b %Y"),
            Self::Long => Some("%d %B %Y"),
            Self::Full => Some("%A, %d %B %Y"),
        }
    }

    fn time_pattern(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Short => Some("%H:%M"),
            Self::Medium => Some("%H:%M:%S"),
            Self::Long | Self::Full => Some("%H:%M:%S %Z"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateTimeFormat {
    /// strftime-style pattern, e.g. `%d. %B %Y`.
    Pattern(String),
    /// Date and time styles; either part may be [`DateStyle::None`].
    Styles { date: DateStyle, time: DateStyle },
}

impl DateTimeFormat {
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }

    pub fn styles(date: DateStyle, time: DateStyle) -> Self {
        Self::Styles { date, time }
    }

    fn to_pattern(&self) -> String {
        match self {
            Self::Pattern(p) => p.clone(),
            Self::Styles { date, time } => [date.date_pattern(), time.time_pattern()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// Map a locale key onto chrono's locale table, falling back to POSIX.
pub fn chrono_locale(locale: &str) -> Locale {
    match Locale::try_from(locale) {
        Ok(l) => l,
        Err(_) => {
            debug!(locale = %locale, "no date locale data; using POSIX");
            Locale::POSIX
        }
    }
}

pub fn format_date_time<Tz>(
    datetime: &DateTime<Tz>,
    format: &DateTimeFormat,
    locale: &str,
) -> Result<String, IntlError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let pattern = format.to_pattern();
    let mut out = String::new();
    write!(
        out,
        "{}",
        datetime.format_localized(&pattern, chrono_locale(locale))
    )
    .map_err(|_| IntlError::InvalidDateFormat(pattern.clone()))?;
    Ok(out)
}
