use crate::domain::models::availability::DEFAULT_TOUR_TZ;
use crate::domain::models::schedule::CityScheduleTemplate;
use crate::domain::models::time::TimeOfDay;
use crate::domain::models::tour::is_fly_me_city;
use crate::domain::services::tour_calendar::TourCalendar;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalNow {
    pub date: NaiveDate,
    pub minute_of_day: u32,
}

impl LocalNow {
    pub fn has_passed(&self, date: NaiveDate, start: TimeOfDay) -> bool {
        date < self.date || (date == self.date && start.minutes() <= self.minute_of_day)
    }
}

pub fn parse_zone(name: &str) -> Option<Tz> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    name.parse().ok()
}

pub fn local_now(zone: Tz, at: DateTime<Utc>) -> LocalNow {
    let local = at.with_timezone(&zone);
    LocalNow {
        date: local.date_naive(),
        minute_of_day: local.hour() * 60 + local.minute(),
    }
}

// Weekday index (Sunday = 0) of a calendar date as seen in `zone`, read at
// noon UTC so that every zone within ±12h agrees with the plain calendar.
pub fn weekday_index(date: NaiveDate, zone: Tz) -> u32 {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default();
    let instant = Utc.from_utc_datetime(&date.and_time(noon));
    instant.with_timezone(&zone).weekday().num_days_from_sunday()
}

pub struct TimezoneContext<'a> {
    schedules: &'a [CityScheduleTemplate],
    tour: &'a TourCalendar,
    default_zone: &'a str,
}

impl<'a> TimezoneContext<'a> {
    pub fn new(schedules: &'a [CityScheduleTemplate], tour: &'a TourCalendar, default_zone: &'a str) -> Self {
        Self { schedules, tour, default_zone }
    }

    pub fn resolved_city(&self, date: NaiveDate, city: &str) -> String {
        if city.trim().is_empty() || is_fly_me_city(city) {
            self.tour.city_for_date(date).to_string()
        } else {
            city.trim().to_string()
        }
    }

    pub fn schedule_for(&self, date: NaiveDate, city: &str) -> Option<&'a CityScheduleTemplate> {
        let target = self.resolved_city(date, city);
        if target.is_empty() {
            return None;
        }
        self.schedules
            .iter()
            .find(|s| s.covers(date) && s.matches_city(&target))
    }

    pub fn default_timezone(&self) -> Tz {
        parse_zone(self.default_zone)
            .or_else(|| parse_zone(DEFAULT_TOUR_TZ))
            .unwrap_or(chrono_tz::UTC)
    }

    pub fn active_timezone(&self, date: NaiveDate, city: &str) -> Tz {
        self.schedule_for(date, city)
            .and_then(|s| parse_zone(&s.timezone))
            .unwrap_or_else(|| self.default_timezone())
    }

    pub fn now(&self, zone: Tz, at: DateTime<Utc>) -> LocalNow {
        local_now(zone, at)
    }
}
