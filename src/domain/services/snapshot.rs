use crate::domain::models::availability::AvailabilitySettings;
use crate::domain::models::block::{BlockKind, BlockedRange};
use crate::domain::models::booking::BookingRequest;
use crate::domain::models::tour::TourStop;
use crate::domain::services::block_store::BlockStore;
use crate::domain::services::projector::project;
use crate::domain::services::template::generate_all;
use crate::domain::services::timezone::TimezoneContext;
use crate::domain::services::tour_calendar::TourCalendar;
use crate::domain::services::validation::sanitize_schedules;
use std::collections::HashSet;

#[derive(Debug, Clone, Default)]
pub struct BookingSnapshot {
    pub settings: AvailabilitySettings,
    pub tour: TourCalendar,
    pub requests: Vec<BookingRequest>,
}

impl BookingSnapshot {
    pub fn new(settings: AvailabilitySettings, stops: Vec<TourStop>, requests: Vec<BookingRequest>) -> Self {
        Self {
            settings: sanitized(settings),
            tour: TourCalendar::new(stops),
            requests,
        }
    }

    pub fn timezone_context(&self) -> TimezoneContext<'_> {
        TimezoneContext::new(&self.settings.city_schedules, &self.tour, &self.settings.tour_timezone)
    }

    fn stored(&self, kind: BlockKind) -> impl Iterator<Item = &BlockedRange> {
        self.settings.blocked.iter().filter(move |b| b.kind == kind)
    }

    // Admin-authored blocks. Stored entries tagged `recurring` are kept
    // here as one-off blocks; weekly rules come from `settings.recurring`.
    pub fn manual_blocks(&self) -> Vec<BlockedRange> {
        self.stored(BlockKind::Manual)
            .chain(self.stored(BlockKind::Recurring))
            .cloned()
            .collect()
    }

    pub fn template_blocks(&self) -> Vec<BlockedRange> {
        if self.settings.auto_template_blocks {
            generate_all(&self.settings.city_schedules)
        } else {
            self.stored(BlockKind::Template).cloned().collect()
        }
    }

    // Live requests projected fresh, plus saved booking blocks whose request
    // is no longer in the list. Hidden ids are dropped from both.
    pub fn booking_blocks(&self) -> Vec<BlockedRange> {
        let hidden = &self.settings.hidden_booking_ids;
        let live: HashSet<&str> = self.requests.iter().map(|r| r.id.trim()).collect();

        let mut blocks: Vec<BlockedRange> = self
            .stored(BlockKind::Booking)
            .filter(|b| match b.booking_id.as_deref() {
                Some(id) => !live.contains(id) && !self.settings.is_hidden(id),
                None => true,
            })
            .cloned()
            .collect();
        blocks.extend(project(&self.requests, hidden));
        blocks
    }

    pub fn block_store(&self) -> BlockStore {
        BlockStore::merge(self.manual_blocks(), self.template_blocks(), Vec::new(), self.booking_blocks())
    }
}

fn sanitized(mut settings: AvailabilitySettings) -> AvailabilitySettings {
    let schedules = std::mem::take(&mut settings.city_schedules);
    settings.city_schedules = sanitize_schedules(schedules, settings.buffer_minutes, &settings.tour_timezone);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::schedule::CityScheduleTemplate;
    use crate::domain::models::time::TimeOfDay;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn t(s: &str) -> TimeOfDay {
        TimeOfDay::parse(s).unwrap()
    }

    fn stored_booking(id: &str, start: &str) -> BlockedRange {
        let mut b = BlockedRange::new(d("2026-02-16"), t(start), t("24:00"), BlockKind::Booking, "Booking");
        b.end = TimeOfDay::clamped(b.start.minutes() as i64 + 30);
        b.booking_id = Some(id.into());
        b.booking_status = Some("accepted".into());
        b
    }

    #[test]
    fn test_template_source_follows_auto_flag() {
        let mut schedule = CityScheduleTemplate::new("Toronto", d("2026-02-15"), d("2026-02-15"), "America/Toronto");
        schedule.has_break = true;
        schedule.break_start = Some(t("16:00"));
        schedule.break_end = Some(t("17:00"));

        let mut settings = AvailabilitySettings::default();
        settings.city_schedules = vec![schedule];
        settings.blocked = vec![BlockedRange::new(d("2026-02-15"), t("08:00"), t("08:30"), BlockKind::Template, "Old")];

        let manual = BookingSnapshot::new(settings.clone(), Vec::new(), Vec::new());
        assert_eq!(manual.template_blocks().len(), 1);

        settings.auto_template_blocks = true;
        let auto = BookingSnapshot::new(settings, Vec::new(), Vec::new());
        let blocks = auto.template_blocks();
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| b.reason == "Break"));
    }

    #[test]
    fn test_booking_blocks_prefer_live_requests() {
        let mut settings = AvailabilitySettings::default();
        settings.blocked = vec![stored_booking("live", "09:00"), stored_booking("gone", "10:00"), stored_booking("hidden", "11:00")];
        settings.hidden_booking_ids = vec!["hidden".into()];
        let request = BookingRequest {
            id: "live".into(),
            preferred_date: "2026-02-16".into(),
            preferred_time: "14:00".into(),
            duration_hours: Some(0.5),
            status: "accepted".into(),
            ..Default::default()
        };

        let snapshot = BookingSnapshot::new(settings, Vec::new(), vec![request]);
        let mut starts: Vec<String> = snapshot.booking_blocks().iter().map(|b| b.start.to_string()).collect();
        starts.sort();
        assert_eq!(starts, vec!["10:00", "14:00"]);
    }
}
