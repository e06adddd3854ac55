//! Recurrence expansion.
//!
//! Turns a recurring master [`Event`] and its [`RecurrenceRule`] into the
//! ordered list of generated occurrences that follow the master's own start.
//!
//! The walk works on the master's wall-clock time in its own zone, so a
//! weekly 10:00 meeting stays at 10:00 across DST changes. Cursor positions
//! are computed from the master start (`start + n * step`) rather than by
//! repeated addition, which keeps month-end dates from drifting after a short
//! month clamps them.

use chrono::{Datelike, Days, Months, NaiveDateTime};
use tracing::{debug, trace, warn};

use crate::event::Event;
use crate::rrule::{Frequency, RecurrenceRule};
use crate::time::{Instant, localize};

/// Consecutive cursor positions without an emission before giving up.
///
/// Bounds the walk for filters that can never match (e.g. a yearly rule with
/// a `BYMONTH` other than the master's month).
const MAX_IDLE_STEPS: usize = 1000;

/// The distance between two cursor positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CalendarStep {
    Days(u64),
    Months(u32),
}

impl CalendarStep {
    fn for_rule(frequency: Frequency, interval: u32) -> Self {
        match frequency {
            Frequency::Daily => Self::Days(u64::from(interval)),
            // by-day expansion covers the week; the interval is not applied
            Frequency::Weekly => Self::Days(7),
            Frequency::Monthly => Self::Months(interval),
            Frequency::Yearly => Self::Months(interval.saturating_mul(12)),
        }
    }

    /// Returns the wall-clock time `n` steps after `anchor`, or `None` past
    /// the representable range.
    fn nth(self, anchor: NaiveDateTime, n: u32) -> Option<NaiveDateTime> {
        match self {
            Self::Days(days) => anchor.checked_add_days(Days::new(days.checked_mul(u64::from(n))?)),
            Self::Months(months) => anchor.checked_add_months(Months::new(months.checked_mul(n)?)),
        }
    }
}

/// Expands `master` into its generated occurrences.
///
/// At most `min(rule.count, max_repeats)` occurrences are generated. Instants
/// listed in `excluded` are skipped without consuming the count, and
/// occurrences after `rule.until` are never returned. The master itself is
/// not part of the result.
///
/// Returns an empty list when the master has no rule or the rule has no
/// supported frequency.
pub fn expand(
    master: &Event,
    rule: &RecurrenceRule,
    max_repeats: usize,
    excluded: &[Instant],
) -> Vec<Event> {
    if !master.is_recurring() {
        return Vec::new();
    }
    let Some(frequency) = rule.frequency else {
        debug!(uid = %master.id, "Rule has no supported frequency, nothing to expand");
        return Vec::new();
    };

    let budget = rule.count.min(max_repeats);
    let step = CalendarStep::for_rule(frequency, rule.interval);
    let zone = master.start.timezone();
    let anchor = master.start.naive_local();
    let duration = master.duration();

    let mut occurrences = Vec::new();
    let mut generated: usize = 0;
    let mut latest: Option<Instant> = None;
    let mut idle = 0;
    let mut position: u32 = 0;
    let mut cursor = anchor;

    while generated < budget {
        let before = generated;

        if rule.matches_month(cursor.month()) {
            for day in candidate_days(cursor, rule) {
                if generated >= budget {
                    break;
                }

                let instant = localize(zone, day);
                // the master itself, or a day an overlapping window already produced
                if instant == master.start || latest.is_some_and(|l| instant <= l) {
                    continue;
                }
                if excluded.contains(&instant) {
                    trace!(uid = %master.id, %instant, "Skipping excluded occurrence");
                    continue;
                }

                generated += 1;
                latest = Some(instant);

                if rule.until.is_none_or(|until| instant <= until) {
                    occurrences.push(master.occurrence(
                        instant,
                        instant + duration,
                        generated as u32,
                    ));
                }
            }
        }

        idle = if generated == before { idle + 1 } else { 0 };
        if idle >= MAX_IDLE_STEPS {
            warn!(uid = %master.id, rrule = %master.rrule, "Rule stopped producing occurrences");
            break;
        }

        position += 1;
        let Some(next) = step.nth(anchor, position) else {
            break;
        };
        if rule.until.is_some_and(|until| localize(zone, next) > until) {
            break;
        }
        cursor = next;
    }

    debug!(
        uid = %master.id,
        freq = frequency.as_str(),
        count = occurrences.len(),
        "Expanded recurring event"
    );

    occurrences
}

/// Returns the wall-clock times to consider for one cursor position, in
/// calendar order.
fn candidate_days(cursor: NaiveDateTime, rule: &RecurrenceRule) -> Vec<NaiveDateTime> {
    if rule.by_day.is_empty() {
        return vec![cursor];
    }

    (0..7)
        .filter_map(|offset| cursor.checked_add_days(Days::new(offset)))
        .filter(|day| rule.matches_weekday(day.weekday()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Timelike, Weekday};
    use chrono_tz::Tz;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> Instant {
        Tz::UTC.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    fn master(rrule: &str, start: Instant, length: Duration) -> Event {
        Event::new("series", start, start + length)
            .with_summary("Recurring")
            .with_rrule(rrule)
    }

    fn run(master: &Event, max_repeats: usize, excluded: &[Instant]) -> Vec<Event> {
        let rule = RecurrenceRule::parse(&master.rrule, max_repeats, master.start.timezone())
            .expect("non-empty rule");
        expand(master, &rule, max_repeats, excluded)
    }

    fn starts(events: &[Event]) -> Vec<Instant> {
        events.iter().map(|e| e.start).collect()
    }

    mod bounds {
        use super::*;

        #[test]
        fn non_recurring_master_yields_nothing() {
            let event = Event::new("single", utc(2015, 8, 30, 9, 30), utc(2015, 8, 30, 10, 30));
            let rule = RecurrenceRule::parse("FREQ=DAILY", 10, Tz::UTC).unwrap();
            assert!(expand(&event, &rule, 10, &[]).is_empty());
        }

        #[test]
        fn count_generates_exactly_count() {
            let m = master("FREQ=DAILY;COUNT=5", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            let occurrences = run(&m, 100, &[]);

            assert_eq!(occurrences.len(), 5);
            assert_eq!(occurrences[0].start, utc(2015, 8, 31, 9, 30));
            assert_eq!(occurrences[4].start, utc(2015, 9, 4, 9, 30));
            let sequences: Vec<_> = occurrences.iter().map(|e| e.sequence).collect();
            assert_eq!(sequences, [1, 2, 3, 4, 5]);
        }

        #[test]
        fn max_repeats_caps_count() {
            let m = master("FREQ=DAILY;COUNT=10", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert_eq!(run(&m, 3, &[]).len(), 3);
        }

        #[test]
        fn max_repeats_is_default_count() {
            let m = master("FREQ=WEEKLY", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert_eq!(run(&m, 4, &[]).len(), 4);
        }

        #[test]
        fn zero_max_repeats_disables_expansion() {
            let m = master("FREQ=DAILY;COUNT=5", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert!(run(&m, 0, &[]).is_empty());
        }

        #[test]
        fn until_is_inclusive() {
            let m = master(
                "FREQ=DAILY;UNTIL=20150902T093000Z",
                utc(2015, 8, 30, 9, 30),
                Duration::hours(1),
            );
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [
                    utc(2015, 8, 31, 9, 30),
                    utc(2015, 9, 1, 9, 30),
                    utc(2015, 9, 2, 9, 30)
                ]
            );
        }

        #[test]
        fn until_bounds_by_day_windows() {
            // Sunday master, Mon/Thu occurrences until Thursday of the next week
            let m = master(
                "FREQ=WEEKLY;BYDAY=MO,TH;UNTIL=20150903T120000Z",
                utc(2015, 8, 30, 9, 30),
                Duration::hours(1),
            );
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [utc(2015, 8, 31, 9, 30), utc(2015, 9, 3, 9, 30)]
            );
        }

        #[test]
        fn cursor_on_until_is_still_visited() {
            // the second window starts exactly at UNTIL
            let m = master(
                "FREQ=WEEKLY;BYDAY=SU,MO;UNTIL=20150906T093000Z",
                utc(2015, 8, 30, 9, 30),
                Duration::hours(1),
            );
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [utc(2015, 8, 31, 9, 30), utc(2015, 9, 6, 9, 30)]
            );
        }

        #[test]
        fn unknown_frequency_yields_nothing() {
            let m = master("FREQ=SECONDLY;COUNT=3", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert!(run(&m, 10, &[]).is_empty());
        }

        #[test]
        fn never_matching_filter_terminates() {
            // the cursor stays in August forever
            let m = master("FREQ=YEARLY;BYMONTH=2", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert!(run(&m, 10, &[]).is_empty());
        }
    }

    mod filters {
        use super::*;

        #[test]
        fn weekly_by_day_in_cursor_order() {
            // Monday master
            let m = master(
                "FREQ=WEEKLY;COUNT=5;BYDAY=FR,MO,WE",
                utc(2015, 8, 31, 10, 0),
                Duration::minutes(30),
            );
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [
                    utc(2015, 9, 2, 10, 0),
                    utc(2015, 9, 4, 10, 0),
                    utc(2015, 9, 7, 10, 0),
                    utc(2015, 9, 9, 10, 0),
                    utc(2015, 9, 11, 10, 0)
                ]
            );
        }

        #[test]
        fn saturday_matches() {
            let m = master("FREQ=WEEKLY;COUNT=2;BYDAY=SA", utc(2015, 8, 31, 10, 0), Duration::hours(1));
            let occurrences = run(&m, 100, &[]);
            assert!(occurrences.iter().all(|e| e.start.weekday() == Weekday::Sat));
            assert_eq!(occurrences.len(), 2);
        }

        #[test]
        fn daily_by_day_has_no_duplicates() {
            let m = master("FREQ=DAILY;COUNT=4;BYDAY=SA,SU", utc(2015, 8, 31, 8, 0), Duration::hours(1));
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [
                    utc(2015, 9, 5, 8, 0),
                    utc(2015, 9, 6, 8, 0),
                    utc(2015, 9, 12, 8, 0),
                    utc(2015, 9, 13, 8, 0)
                ]
            );
        }

        #[test]
        fn by_month_skips_other_months() {
            let m = master(
                "FREQ=MONTHLY;COUNT=3;BYMONTH=1,3",
                utc(2015, 1, 10, 9, 0),
                Duration::hours(1),
            );
            let occurrences = run(&m, 100, &[]);
            assert_eq!(
                starts(&occurrences),
                [
                    utc(2015, 3, 10, 9, 0),
                    utc(2016, 1, 10, 9, 0),
                    utc(2016, 3, 10, 9, 0)
                ]
            );
        }

        #[test]
        fn excluded_instants_are_skipped() {
            let m = master("FREQ=DAILY;COUNT=3", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            let excluded = [utc(2015, 8, 31, 9, 30)];
            let occurrences = run(&m, 100, &excluded);

            assert_eq!(
                starts(&occurrences),
                [
                    utc(2015, 9, 1, 9, 30),
                    utc(2015, 9, 2, 9, 30),
                    utc(2015, 9, 3, 9, 30)
                ]
            );
            assert!(occurrences.iter().all(|e| !excluded.contains(&e.start)));
        }

        #[test]
        fn excluded_in_other_zone_still_matches() {
            let madrid = chrono_tz::Europe::Madrid;
            let start = madrid.with_ymd_and_hms(2015, 9, 7, 10, 0, 0).unwrap();
            let m = master("FREQ=WEEKLY;COUNT=2", start, Duration::hours(1));
            // 2015-09-14 10:00 CEST
            let excluded = [utc(2015, 9, 14, 8, 0)];
            let occurrences = run(&m, 100, &excluded);

            assert_eq!(occurrences.len(), 2);
            assert_eq!(occurrences[0].start, utc(2015, 9, 21, 8, 0));
        }
    }

    mod steps {
        use super::*;

        #[test]
        fn daily_interval() {
            let m = master("FREQ=DAILY;INTERVAL=3;COUNT=2", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert_eq!(
                starts(&run(&m, 100, &[])),
                [utc(2015, 9, 2, 9, 30), utc(2015, 9, 5, 9, 30)]
            );
        }

        #[test]
        fn weekly_ignores_interval() {
            let m = master("FREQ=WEEKLY;INTERVAL=2;COUNT=2", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert_eq!(
                starts(&run(&m, 100, &[])),
                [utc(2015, 9, 6, 9, 30), utc(2015, 9, 13, 9, 30)]
            );
        }

        #[test]
        fn monthly_from_month_end_does_not_drift() {
            let m = master("FREQ=MONTHLY;COUNT=3", utc(2015, 1, 31, 9, 0), Duration::hours(1));
            assert_eq!(
                starts(&run(&m, 100, &[])),
                [
                    utc(2015, 2, 28, 9, 0),
                    utc(2015, 3, 31, 9, 0),
                    utc(2015, 4, 30, 9, 0)
                ]
            );
        }

        #[test]
        fn yearly_interval() {
            let m = master("FREQ=YEARLY;INTERVAL=2;COUNT=2", utc(2015, 8, 30, 9, 30), Duration::hours(1));
            assert_eq!(
                starts(&run(&m, 100, &[])),
                [utc(2017, 8, 30, 9, 30), utc(2019, 8, 30, 9, 30)]
            );
        }

        #[test]
        fn wall_clock_kept_across_dst() {
            let madrid = chrono_tz::Europe::Madrid;
            let start = madrid.with_ymd_and_hms(2015, 10, 19, 10, 0, 0).unwrap();
            let m = master("FREQ=WEEKLY;COUNT=2", start, Duration::hours(1));
            let occurrences = run(&m, 100, &[]);

            for occurrence in &occurrences {
                assert_eq!(occurrence.start.hour(), 10);
                assert_eq!(occurrence.duration(), Duration::hours(1));
            }
            // CEST before the change, CET after it
            assert_eq!(occurrences[0].start, utc(2015, 10, 26, 9, 0));
        }

        #[test]
        fn occurrences_keep_duration_and_fields() {
            let m = master("FREQ=DAILY;COUNT=1", utc(2015, 8, 30, 9, 30), Duration::minutes(45));
            let occurrences = run(&m, 100, &[]);

            assert_eq!(occurrences[0].end, utc(2015, 8, 31, 10, 15));
            assert_eq!(occurrences[0].summary, "Recurring");
            assert_eq!(occurrences[0].id, "series");
            assert!(occurrences[0].rrule.is_empty());
        }
    }
}
