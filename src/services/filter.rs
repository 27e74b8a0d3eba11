//! Filter engine: narrows a client list to what the pipeline view shows.
//!
//! Pure functions only. Timestamps on clients are naive UTC; date windows are
//! computed in the timezone of the supplied `now` and converted to UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::domain::client::Client;
use crate::domain::filter::{ClientFilter, DateFilter};

/// Inclusive creation-time window in naive UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<NaiveDateTime>,
    pub end: NaiveDateTime,
}

impl DateWindow {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start.is_none_or(|start| at >= start) && at <= self.end
    }
}

/// Converts a local wall-clock time in `tz` to naive UTC. Times inside a DST
/// gap fall back to being read as UTC.
fn local_to_utc<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime) -> NaiveDateTime {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.naive_utc())
        .unwrap_or(local)
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> NaiveDateTime {
    local_to_utc(tz, day.and_time(NaiveTime::MIN))
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> NaiveDateTime {
    let last_moment = day
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| day.and_time(NaiveTime::MIN));
    local_to_utc(tz, last_moment)
}

/// Resolves a date filter against `now`. `None` means no date restriction.
pub fn date_window<Tz: TimeZone>(date: &DateFilter, now: &DateTime<Tz>) -> Option<DateWindow> {
    let tz = now.timezone();
    let now_utc = now.naive_utc();
    let today = now.date_naive();

    match *date {
        DateFilter::All => None,
        DateFilter::Today => Some(DateWindow {
            start: Some(start_of_day(&tz, today)),
            end: now_utc,
        }),
        DateFilter::Week => Some(DateWindow {
            start: Some(now_utc - Duration::days(7)),
            end: now_utc,
        }),
        DateFilter::Month => Some(DateWindow {
            start: Some(start_of_day(&tz, today.with_day(1).unwrap_or(today))),
            end: now_utc,
        }),
        DateFilter::Custom { start, end } => Some(DateWindow {
            start: start.map(|day| start_of_day(&tz, day)),
            end: end.map_or(now_utc, |day| end_of_day(&tz, day)),
        }),
    }
}

fn matches_search(client: &Client, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    client.name.to_lowercase().contains(needle)
        || client
            .company_name
            .as_deref()
            .is_some_and(|company| company.to_lowercase().contains(needle))
}

fn matches_tags(client: &Client, filter: &ClientFilter) -> bool {
    filter.selected_tags.is_empty() || !client.tags.is_disjoint(&filter.selected_tags)
}

fn matches_priority(client: &Client, filter: &ClientFilter) -> bool {
    filter.priority.is_none_or(|p| p == client.priority)
}

/// Returns the clients satisfying every active predicate, preserving order.
pub fn filter_clients<'a, Tz: TimeZone>(
    clients: &'a [Client],
    filter: &ClientFilter,
    now: &DateTime<Tz>,
) -> Vec<&'a Client> {
    let needle = filter.search.trim().to_lowercase();
    let window = date_window(&filter.date, now);

    clients
        .iter()
        .filter(|c| matches_search(c, &needle))
        .filter(|c| matches_tags(c, filter))
        .filter(|c| matches_priority(c, filter))
        .filter(|c| window.is_none_or(|w| w.contains(c.created_at)))
        .collect()
}
