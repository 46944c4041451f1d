use crate::domain::models::availability::AvailabilityMode;
use crate::domain::models::schedule::CityScheduleTemplate;
use crate::domain::models::session_length::SessionLength;
use crate::domain::models::time::{TimeOfDay, TimeRange, MINUTES_PER_DAY, SLOT_MINUTES};
use crate::domain::services::block_store::BlockStore;
use crate::domain::services::snapshot::BookingSnapshot;
use crate::domain::services::timezone::{weekday_index, LocalNow, TimezoneContext};
use crate::domain::services::tour_calendar::CityCheck;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Outcome of a slot lookup. `Available(vec![])` means the day is full;
/// the other variants mean slots were never computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Availability {
    Available(Vec<TimeRange>),
    NotSlotBased,
    DateInPast,
    Closed,
}

impl Availability {
    pub fn status(&self) -> &'static str {
        match self {
            Availability::Available(_) => "available",
            Availability::NotSlotBased => "not_slot_based",
            Availability::DateInPast => "date_in_past",
            Availability::Closed => "closed",
        }
    }

    pub fn slots(&self) -> &[TimeRange] {
        match self {
            Availability::Available(slots) => slots,
            _ => &[],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotRejection {
    #[error("This session length is arranged by message, not by time slot")]
    NotSlotBased,
    #[error("Bookings are currently closed")]
    Closed,
    #[error("The selected time has already passed")]
    InPast,
    #[error("The selected time is outside working hours")]
    OutsideWorkingHours,
    #[error("The selected time is no longer available")]
    Unavailable,
    #[error("No touring city is scheduled for {0}")]
    NoTourOnDate(NaiveDate),
    #[error("On {date} the tour is in {city}")]
    CityMismatch { city: String, date: NaiveDate },
}

impl From<CityCheck> for SlotRejection {
    fn from(check: CityCheck) -> Self {
        match check {
            CityCheck::NoTourOnDate(date) => SlotRejection::NoTourOnDate(date),
            CityCheck::Mismatch { city, date } => SlotRejection::CityMismatch { city, date },
        }
    }
}

#[derive(Debug, Clone)]
pub struct DayContext<'a> {
    pub date: NaiveDate,
    pub city: String,
    pub zone: Tz,
    pub buffer: u32,
    pub schedule: Option<&'a CityScheduleTemplate>,
    pub now: LocalNow,
    pub weekday: u32,
}

impl DayContext<'_> {
    pub fn is_past(&self) -> bool {
        self.date < self.now.date
    }

    pub fn within_working_hours(&self, start: u32, duration: u32) -> bool {
        let Some(schedule) = self.schedule else {
            return true;
        };
        if let Some(ready) = schedule.ready_start
            && start < ready.minutes()
        {
            return false;
        }
        if let Some(leave) = schedule.leave_day_end {
            let mut leave_min = leave.minutes();
            if leave_min == MINUTES_PER_DAY - 1 {
                leave_min = MINUTES_PER_DAY;
            }
            if start + duration > leave_min {
                return false;
            }
        }
        true
    }
}

pub struct SlotResolver<'a> {
    snapshot: &'a BookingSnapshot,
    timezones: TimezoneContext<'a>,
    store: BlockStore,
    now: DateTime<Utc>,
}

impl<'a> SlotResolver<'a> {
    pub fn new(snapshot: &'a BookingSnapshot, now: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            timezones: snapshot.timezone_context(),
            store: snapshot.block_store(),
            now,
        }
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn timezones(&self) -> &TimezoneContext<'a> {
        &self.timezones
    }

    pub fn day(&self, date: NaiveDate, city: &str) -> DayContext<'a> {
        let schedule = self.timezones.schedule_for(date, city);
        let zone = self.timezones.active_timezone(date, city);
        let buffer = schedule
            .and_then(CityScheduleTemplate::buffer)
            .unwrap_or(self.snapshot.settings.buffer_minutes);

        DayContext {
            date,
            city: self.timezones.resolved_city(date, city),
            zone,
            buffer,
            schedule,
            now: self.timezones.now(zone, self.now),
            weekday: weekday_index(date, zone),
        }
    }

    pub fn resolve(&self, date: NaiveDate, city: &str, length: SessionLength) -> Availability {
        let Some(duration) = length.minutes() else {
            return Availability::NotSlotBased;
        };
        if self.snapshot.settings.availability_mode == AvailabilityMode::Closed {
            return Availability::Closed;
        }

        let ctx = self.day(date, city);
        if ctx.is_past() {
            return Availability::DateInPast;
        }

        let mut slots = Vec::new();
        let mut start = 0;
        while start + duration <= MINUTES_PER_DAY {
            if self.is_bookable(&ctx, start, duration) {
                slots.push(TimeRange::new(
                    TimeOfDay::clamped(start as i64),
                    TimeOfDay::clamped((start + duration) as i64),
                ));
            }
            start += SLOT_MINUTES;
        }

        tracing::debug!(
            %date,
            city = %ctx.city,
            zone = %ctx.zone,
            buffer = ctx.buffer,
            slots = slots.len(),
            "resolved availability"
        );
        Availability::Available(slots)
    }

    // Validates a start time chosen on the booking form. Unlike `resolve`
    // the start does not have to sit on the grid.
    pub fn check_start(
        &self,
        date: NaiveDate,
        start: TimeOfDay,
        city: &str,
        length: SessionLength,
    ) -> Result<(), SlotRejection> {
        let duration = length.minutes().ok_or(SlotRejection::NotSlotBased)?;
        if self.snapshot.settings.availability_mode == AvailabilityMode::Closed {
            return Err(SlotRejection::Closed);
        }
        self.snapshot.tour.validate_city(date, city)?;

        let ctx = self.day(date, city);
        if ctx.now.has_passed(date, start) {
            return Err(SlotRejection::InPast);
        }
        let start = start.minutes();
        if start + duration > MINUTES_PER_DAY || !ctx.within_working_hours(start, duration) {
            return Err(SlotRejection::OutsideWorkingHours);
        }
        if !self.window_is_free(&ctx, start, duration) {
            return Err(SlotRejection::Unavailable);
        }
        Ok(())
    }

    fn is_bookable(&self, ctx: &DayContext<'_>, start: u32, duration: u32) -> bool {
        if ctx.date == ctx.now.date && start <= ctx.now.minute_of_day {
            return false;
        }
        ctx.within_working_hours(start, duration) && self.window_is_free(ctx, start, duration)
    }

    fn window_is_free(&self, ctx: &DayContext<'_>, start: u32, duration: u32) -> bool {
        let from = start.saturating_sub(ctx.buffer);
        let to = (start + duration + ctx.buffer).min(MINUTES_PER_DAY);

        if self.store.intersects_hard(ctx.date, from, to) {
            return false;
        }
        !self
            .snapshot
            .settings
            .recurring
            .iter()
            .any(|rule| rule.intersects(ctx.weekday, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::availability::AvailabilitySettings;
    use crate::domain::models::block::{BlockKind, BlockedRange, RecurringBlock};
    use crate::domain::models::booking::BookingRequest;
    use crate::domain::models::tour::TourStop;
    use chrono::TimeZone;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn before_tour() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap()
    }

    fn toronto_snapshot() -> BookingSnapshot {
        let mut schedule = CityScheduleTemplate::new("Toronto", d("2026-02-15"), d("2026-02-18"), "America/Toronto");
        schedule.ready_start = Some(t("10:00"));
        schedule.leave_day_end = Some(t("18:00"));
        schedule.buffer_minutes = Some(15);

        let mut settings = AvailabilitySettings::default();
        settings.city_schedules = vec![schedule];

        let booking = BookingRequest {
            id: "req-1".into(),
            preferred_date: "2026-02-16".into(),
            preferred_time: "12:00".into(),
            duration_hours: Some(1.0),
            status: "pending".into(),
            payment_status: "paid".into(),
            city: "Toronto".into(),
            name: "Alex".into(),
            ..Default::default()
        };

        BookingSnapshot::new(
            settings,
            vec![TourStop::new("Toronto", d("2026-02-15"), d("2026-02-18"))],
            vec![booking],
        )
    }

    fn starts(availability: &Availability) -> Vec<String> {
        availability.slots().iter().map(|r| r.start.to_string()).collect()
    }

    #[test]
    fn test_toronto_day_with_paid_booking() {
        let snapshot = toronto_snapshot();
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let result = resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Minutes(60));

        assert_eq!(
            starts(&result),
            vec!["10:00", "10:30", "13:30", "14:00", "14:30", "15:00", "15:30", "16:00", "16:30", "17:00"]
        );
        assert_eq!(result.slots()[0].label(), "10:00 - 11:00");
    }

    #[test]
    fn test_buffer_rejects_starts_too_close_to_a_booking() {
        let snapshot = toronto_snapshot();
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let date = d("2026-02-16");
        let half_hour = SessionLength::Minutes(30);

        assert_eq!(
            resolver.check_start(date, t("11:45"), "Toronto", half_hour),
            Err(SlotRejection::Unavailable)
        );
        assert_eq!(resolver.check_start(date, t("11:00"), "Toronto", half_hour), Ok(()));
        assert_eq!(resolver.check_start(date, t("13:15"), "Toronto", half_hour), Ok(()));
        assert_eq!(
            resolver.check_start(date, t("09:30"), "Toronto", half_hour),
            Err(SlotRejection::OutsideWorkingHours)
        );
    }

    #[test]
    fn test_no_past_slots_today() {
        let snapshot = toronto_snapshot();
        // 14:10 in Toronto
        let now = Utc.with_ymd_and_hms(2026, 2, 17, 19, 10, 0).unwrap();
        let resolver = SlotResolver::new(&snapshot, now);

        let today = resolver.resolve(d("2026-02-17"), "Toronto", SessionLength::Minutes(30));
        assert_eq!(starts(&today).first().map(String::as_str), Some("14:30"));
        assert!(today.slots().iter().all(|s| s.start.minutes() > 14 * 60 + 10));

        assert_eq!(
            resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Minutes(30)),
            Availability::DateInPast
        );
        assert_eq!(
            resolver.check_start(d("2026-02-17"), t("14:00"), "Toronto", SessionLength::Minutes(30)),
            Err(SlotRejection::InPast)
        );
    }

    #[test]
    fn test_recurring_monday_blocks_whole_day() {
        let mut snapshot = toronto_snapshot();
        snapshot.settings.recurring = vec![RecurringBlock {
            days: vec![1],
            all_day: true,
            start: None,
            end: None,
            reason: "Day off".into(),
        }];
        let resolver = SlotResolver::new(&snapshot, before_tour());

        // 2026-02-16 is a Monday
        for length in [SessionLength::Minutes(30), SessionLength::Minutes(240)] {
            assert_eq!(resolver.resolve(d("2026-02-16"), "Toronto", length), Availability::Available(Vec::new()));
        }
        assert!(!resolver.resolve(d("2026-02-17"), "Toronto", SessionLength::Minutes(60)).slots().is_empty());
    }

    #[test]
    fn test_manual_block_excludes_buffered_window() {
        let mut snapshot = toronto_snapshot();
        snapshot.settings.blocked = vec![BlockedRange::new(d("2026-02-17"), t("14:00"), t("15:00"), BlockKind::Manual, "Errand")];
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let date = d("2026-02-17");
        let hour = SessionLength::Minutes(60);

        assert_eq!(resolver.check_start(date, t("13:00"), "Toronto", hour), Err(SlotRejection::Unavailable));
        assert_eq!(resolver.check_start(date, t("12:30"), "Toronto", hour), Ok(()));
        assert_eq!(resolver.check_start(date, t("15:15"), "Toronto", hour), Ok(()));

        assert_eq!(
            starts(&resolver.resolve(date, "Toronto", hour)),
            vec!["10:00", "10:30", "11:00", "11:30", "12:00", "12:30", "15:30", "16:00", "16:30", "17:00"]
        );
    }

    #[test]
    fn test_timed_recurring_window_respects_buffer() {
        let mut snapshot = toronto_snapshot();
        snapshot.settings.recurring = vec![RecurringBlock {
            days: vec![1],
            all_day: false,
            start: Some(t("09:00")),
            end: Some(t("10:00")),
            reason: "Gym".into(),
        }];
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let monday = d("2026-02-16");
        let half_hour = SessionLength::Minutes(30);

        assert_eq!(resolver.check_start(monday, t("10:00"), "Toronto", half_hour), Err(SlotRejection::Unavailable));
        assert_eq!(resolver.check_start(monday, t("10:30"), "Toronto", half_hour), Ok(()));
        assert_eq!(starts(&resolver.resolve(monday, "Toronto", half_hour)).first().map(String::as_str), Some("10:30"));

        // Tuesday is untouched
        assert_eq!(resolver.check_start(d("2026-02-17"), t("10:00"), "Toronto", half_hour), Ok(()));
    }

    #[test]
    fn test_sentinel_city_uses_touring_schedule_and_skips_city_check() {
        let snapshot = toronto_snapshot();
        let resolver = SlotResolver::new(&snapshot, before_tour());

        let via_sentinel = resolver.resolve(d("2026-02-16"), "Fly Me To You", SessionLength::Minutes(60));
        let direct = resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Minutes(60));
        assert_eq!(via_sentinel, direct);

        assert_eq!(
            resolver.check_start(d("2026-05-01"), t("12:00"), "fly me to you", SessionLength::Minutes(60)),
            Ok(())
        );
        assert_eq!(
            resolver.check_start(d("2026-02-16"), t("15:00"), "Paris", SessionLength::Minutes(60)),
            Err(SlotRejection::CityMismatch { city: "Toronto".into(), date: d("2026-02-16") })
        );
    }

    #[test]
    fn test_custom_length_and_closed_mode() {
        let mut snapshot = toronto_snapshot();
        snapshot.settings.availability_mode = AvailabilityMode::Closed;
        let resolver = SlotResolver::new(&snapshot, before_tour());

        assert_eq!(resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Custom), Availability::NotSlotBased);
        assert_eq!(resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Minutes(60)), Availability::Closed);
        assert_eq!(
            resolver.check_start(d("2026-02-16"), t("15:00"), "Toronto", SessionLength::Minutes(60)),
            Err(SlotRejection::Closed)
        );
    }

    #[test]
    fn test_tentative_booking_does_not_exclude() {
        let mut snapshot = toronto_snapshot();
        snapshot.requests[0].payment_status = String::new();
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let result = resolver.resolve(d("2026-02-16"), "Toronto", SessionLength::Minutes(60));
        assert!(starts(&result).contains(&"12:00".to_string()));
    }

    #[test]
    fn test_global_buffer_without_schedule() {
        let mut settings = AvailabilitySettings::default();
        settings.buffer_minutes = 30;
        let booking = BookingRequest {
            id: "r".into(),
            preferred_date: "2026-03-02".into(),
            preferred_time: "10:00".into(),
            duration_hours: Some(1.0),
            status: "accepted".into(),
            ..Default::default()
        };
        let snapshot = BookingSnapshot::new(settings, Vec::new(), vec![booking]);
        let resolver = SlotResolver::new(&snapshot, before_tour());
        let result = resolver.resolve(d("2026-03-02"), "", SessionLength::Minutes(30));
        let s = starts(&result);

        assert_eq!(s.first().map(String::as_str), Some("00:00"));
        assert_eq!(s.last().map(String::as_str), Some("23:30"));
        assert!(s.contains(&"09:00".to_string()));
        for blocked in ["09:30", "10:00", "10:30", "11:00"] {
            assert!(!s.contains(&blocked.to_string()), "{blocked} should be excluded");
        }
        assert!(s.contains(&"11:30".to_string()));
    }
}
