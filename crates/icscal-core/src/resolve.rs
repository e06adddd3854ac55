//! Override resolution.
//!
//! An override is an event that shares a series `id` and carries a
//! recurrence marker: the start of the occurrence it replaces. Given the flat,
//! start-sorted list of masters, generated occurrences and overrides, the
//! resolver keeps the override and drops the event it supersedes.

use std::collections::HashMap;

use tracing::trace;

use crate::event::{Event, sort_by_start};

/// Replaces superseded occurrences with their overrides.
///
/// `events` should already be sorted ascending by start. Events are grouped
/// by `id` (order within a group is preserved). Inside a group, consecutive
/// pairs where one event's marker equals the other's start collapse to the
/// override. A non-override whose start equals the marker of any override in
/// the group is dropped as well, so an override that moved past a neighbour
/// still replaces its slot. Overrides without a matching event are kept.
///
/// The result is sorted ascending by start. Running the resolver on its own
/// output returns it unchanged.
pub fn resolve_overrides(events: Vec<Event>) -> Vec<Event> {
    let mut resolved = Vec::with_capacity(events.len());

    for group in group_by_id(events) {
        if group.len() == 1 {
            resolved.extend(group);
            continue;
        }
        resolved.extend(drop_displaced(scan_pairs(group)));
    }

    sort_by_start(&mut resolved);
    resolved
}

/// Groups events by id, in order of first appearance.
fn group_by_id(events: Vec<Event>) -> Vec<Vec<Event>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Vec<Event>> = Vec::new();

    for event in events {
        match index.get(&event.id) {
            Some(&i) => groups[i].push(event),
            None => {
                index.insert(event.id.clone(), groups.len());
                groups.push(vec![event]);
            }
        }
    }

    groups
}

/// Returns true if `candidate` overrides `other`.
fn replaces(candidate: &Event, other: &Event) -> bool {
    !other.is_override() && candidate.recurrence_marker == Some(other.start)
}

fn scan_pairs(group: Vec<Event>) -> Vec<Event> {
    let mut kept = Vec::with_capacity(group.len());
    let mut events = group.into_iter().peekable();

    while let Some(current) = events.next() {
        let Some(next) = events.peek() else {
            kept.push(current);
            break;
        };

        if replaces(&current, next) {
            trace!(uid = %current.id, start = %next.start, "Override replaces following occurrence");
            events.next();
            kept.push(current);
        } else if replaces(next, &current) {
            trace!(uid = %current.id, start = %current.start, "Override replaces preceding occurrence");
            if let Some(next) = events.next() {
                kept.push(next);
            }
        } else {
            kept.push(current);
        }
    }

    kept
}

fn drop_displaced(group: Vec<Event>) -> Vec<Event> {
    let markers: Vec<_> = group.iter().filter_map(|e| e.recurrence_marker).collect();
    if markers.is_empty() {
        return group;
    }

    group
        .into_iter()
        .filter(|e| e.is_override() || !markers.contains(&e.start))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Instant;
    use chrono::{Duration, TimeZone};
    use chrono_tz::Tz;

    /// Parses `YYYYMMDDTHHMMSSZ`.
    fn d(s: &str) -> Instant {
        let naive = chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%SZ").unwrap();
        Tz::UTC.from_utc_datetime(&naive)
    }

    fn event(id: &str, start: &str, end: &str) -> Event {
        Event::new(id, d(start), d(end))
    }

    fn override_of(id: &str, start: &str, end: &str, marker: &str) -> Event {
        event(id, start, end).with_recurrence_marker(d(marker))
    }

    fn sorted(mut events: Vec<Event>) -> Vec<Event> {
        sort_by_start(&mut events);
        events
    }

    #[test]
    fn worked_example() {
        let events = sorted(vec![
            event("1", "20150830T103000Z", "20150830T123000Z"),
            event("2", "20150830T093000Z", "20150830T103000Z"),
            override_of("1", "20150830T113000Z", "20150830T123000Z", "20150830T103000Z"),
            override_of("2", "20150830T123000Z", "20150830T133000Z", "20150830T093000Z"),
            override_of("3", "20150930T123000Z", "20150930T133000Z", "20150930T103000Z"),
        ]);

        let result = resolve_overrides(events);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(Event::is_override));
        let ids: Vec<_> = result.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn override_replaces_non_recurring_original() {
        let events = sorted(vec![
            event("2", "20150830T093000Z", "20150830T103000Z"),
            override_of("2", "20150830T123000Z", "20150830T133000Z", "20150830T093000Z"),
        ]);

        let result = resolve_overrides(events);

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].start, d("20150830T123000Z"));
        assert_eq!(result[0].recurrence_marker, Some(d("20150830T093000Z")));
    }

    #[test]
    fn override_earlier_than_original() {
        let events = sorted(vec![
            event("x", "20150901T100000Z", "20150901T110000Z"),
            override_of("x", "20150901T080000Z", "20150901T090000Z", "20150901T100000Z"),
        ]);

        let result = resolve_overrides(events);

        assert_eq!(result.len(), 1);
        assert!(result[0].is_override());
    }

    #[test]
    fn unmatched_events_pass_through() {
        let events = sorted(vec![
            event("a", "20150901T100000Z", "20150901T110000Z"),
            event("a", "20150902T100000Z", "20150902T110000Z"),
            event("b", "20150901T120000Z", "20150901T130000Z"),
        ]);

        let result = resolve_overrides(events.clone());
        assert_eq!(result, events);
    }

    #[test]
    fn override_moved_past_neighbour() {
        let master = event("w", "20150901T100000Z", "20150901T110000Z").with_rrule("FREQ=WEEKLY");
        let second = master.occurrence(d("20150908T100000Z"), d("20150908T110000Z"), 1);
        let third = master.occurrence(d("20150915T100000Z"), d("20150915T110000Z"), 2);
        // the 09-08 meeting moved after the 09-15 one
        let moved = override_of("w", "20150916T100000Z", "20150916T110000Z", "20150908T100000Z");

        let result = resolve_overrides(sorted(vec![master, second, third, moved]));

        let starts: Vec<_> = result.iter().map(|e| e.start).collect();
        assert_eq!(
            starts,
            [
                d("20150901T100000Z"),
                d("20150915T100000Z"),
                d("20150916T100000Z")
            ]
        );
    }

    #[test]
    fn override_never_replaces_another_override() {
        let master = event("w", "20150831T100000Z", "20150831T110000Z").with_rrule("FREQ=WEEKLY");
        let first = master.occurrence(d("20150907T100000Z"), d("20150907T110000Z"), 1);
        let second = master.occurrence(d("20150914T100000Z"), d("20150914T110000Z"), 2);
        // 09-07 moved to 09-08, 09-14 moved into the old 09-07 slot
        let to_tuesday = override_of("w", "20150908T100000Z", "20150908T110000Z", "20150907T100000Z");
        let into_gap = override_of("w", "20150907T100000Z", "20150907T110000Z", "20150914T100000Z");

        let result = resolve_overrides(sorted(vec![
            master.clone(),
            first,
            second,
            to_tuesday.clone(),
            into_gap.clone(),
        ]));

        assert_eq!(result, [master, into_gap, to_tuesday]);
    }

    #[test]
    fn every_occurrence_overridden() {
        let master = event("s", "20150901T100000Z", "20150901T110000Z").with_rrule("FREQ=DAILY");
        let mut events = vec![master.clone()];
        let mut overrides = Vec::new();
        for day in 1..=3 {
            let start = master.start + Duration::days(day);
            events.push(master.occurrence(start, start + Duration::hours(1), day as u32));
            let moved = Event::new("s", start + Duration::hours(2), start + Duration::hours(3))
                .with_recurrence_marker(start);
            overrides.push(moved.clone());
            events.push(moved);
        }

        let result = resolve_overrides(sorted(events));

        assert_eq!(result.len(), 4);
        assert_eq!(result[0], master);
        assert_eq!(result[1..], overrides[..]);
    }

    #[test]
    fn idempotent() {
        let events = sorted(vec![
            event("1", "20150830T103000Z", "20150830T123000Z"),
            event("1", "20150906T103000Z", "20150906T123000Z"),
            override_of("1", "20150830T113000Z", "20150830T123000Z", "20150830T103000Z"),
            event("2", "20150830T093000Z", "20150830T103000Z"),
            override_of("3", "20150930T123000Z", "20150930T133000Z", "20150930T103000Z"),
        ]);

        let once = resolve_overrides(events);
        let twice = resolve_overrides(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn output_is_sorted() {
        let events = sorted(vec![
            event("a", "20150901T100000Z", "20150901T110000Z"),
            override_of("a", "20150903T100000Z", "20150903T110000Z", "20150901T100000Z"),
            event("b", "20150902T100000Z", "20150902T110000Z"),
        ]);

        let result = resolve_overrides(events);
        assert!(result.windows(2).all(|w| w[0].start <= w[1].start));
        assert_eq!(result[0].id, "b");
    }

    #[test]
    fn empty_input() {
        assert!(resolve_overrides(Vec::new()).is_empty());
    }
}
