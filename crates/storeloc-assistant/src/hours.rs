//! Opening/closing time extraction from free-text operating-hours lines.
//!
//! Lines look like `Monday - Sunday, 8:00 AM - 10:00 PM` but the format is
//! not guaranteed. A token only counts as a time if it carries minutes
//! (`8:00`, `8.00`) or a meridiem (`8am`), so day ranges and unit numbers
//! are ignored. The first time on a line is the opening time and the last
//! is the closing time.

use std::sync::LazyLock;

use regex::Regex;
use storeloc_core::StoreRecord;

static TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:[:.](\d{2}))?\s*([ap])\.?m\b\.?|\b(\d{1,2})[:.](\d{2})\b")
        .expect("valid regex")
});

/// One time token as written in the source line, with a sortable value
/// (`HHMM` on a 24-hour clock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeToken {
    pub text: String,
    pub value: u32,
}

/// Opening and closing time of one hours line.
///
/// A closing time at or before the opening time is taken to be after
/// midnight and carries `+2400` in its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoursSpan {
    pub opening: TimeToken,
    pub closing: TimeToken,
}

fn to_value(hour: u32, minute: u32, meridiem: Option<char>) -> Option<u32> {
    if minute >= 60 {
        return None;
    }
    let hour = match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some('p') if hour < 12 => hour + 12,
        Some('a') if hour == 12 => 0,
        Some(_) => hour,
        None if hour > 24 => return None,
        None => hour,
    };
    Some(hour * 100 + minute)
}

/// Every recognisable time on `line`, in order.
#[must_use]
pub fn time_tokens(line: &str) -> Vec<TimeToken> {
    TIME.captures_iter(line)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let (hour, minute, meridiem) = if let Some(h) = caps.get(1) {
                let meridiem = caps
                    .get(3)
                    .and_then(|m| m.as_str().chars().next())
                    .map(|c| c.to_ascii_lowercase());
                (h.as_str(), caps.get(2).map(|m| m.as_str()), meridiem)
            } else {
                (caps.get(4)?.as_str(), caps.get(5).map(|m| m.as_str()), None)
            };
            let hour: u32 = hour.parse().ok()?;
            let minute: u32 = minute.map_or(Ok(0), str::parse::<u32>).ok()?;
            Some(TimeToken {
                text: whole.as_str().trim().to_owned(),
                value: to_value(hour, minute, meridiem)?,
            })
        })
        .collect()
}

/// Opening/closing span of one hours line, or `None` if it holds no time.
#[must_use]
pub fn parse_hours_line(line: &str) -> Option<HoursSpan> {
    let mut tokens = time_tokens(line);
    let opening = tokens.first()?.clone();
    if tokens.len() == 1 {
        return Some(HoursSpan {
            closing: opening.clone(),
            opening,
        });
    }
    let mut closing = tokens.pop()?;
    if closing.value <= opening.value {
        closing.value += 2400;
    }
    Some(HoursSpan { opening, closing })
}

fn spans(records: &[StoreRecord]) -> impl Iterator<Item = (&StoreRecord, HoursSpan)> {
    records.iter().flat_map(|record| {
        record
            .info
            .operating_hours
            .iter()
            .filter_map(move |line| parse_hours_line(line).map(|span| (record, span)))
    })
}

/// Store with the earliest opening time across all hours lines. The first
/// store in dataset order wins a tie.
#[must_use]
pub fn earliest_opening(records: &[StoreRecord]) -> Option<(&StoreRecord, TimeToken)> {
    spans(records)
        .map(|(record, span)| (record, span.opening))
        .reduce(|best, next| if next.1.value < best.1.value { next } else { best })
}

/// Store with the latest closing time across all hours lines. The first
/// store in dataset order wins a tie.
#[must_use]
pub fn latest_closing(records: &[StoreRecord]) -> Option<(&StoreRecord, TimeToken)> {
    spans(records)
        .map(|(record, span)| (record, span.closing))
        .reduce(|best, next| if next.1.value > best.1.value { next } else { best })
}
