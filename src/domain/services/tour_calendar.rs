use crate::domain::models::tour::{is_fly_me_city, normalize_city_name, TourStop};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CityCheck {
    #[error("No touring city is scheduled for {0}")]
    NoTourOnDate(NaiveDate),
    #[error("On {date} the tour is in {city}")]
    Mismatch { city: String, date: NaiveDate },
}

/// Touring stops in list order. Lookups return the first stop that covers a
/// date, so overlapping stops resolve to whichever was listed first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TourCalendar {
    stops: Vec<TourStop>,
}

impl TourCalendar {
    pub fn new(stops: Vec<TourStop>) -> Self {
        let stops = stops
            .into_iter()
            .filter(|s| s.start <= s.end && !s.city.trim().is_empty())
            .collect();
        Self { stops }
    }

    pub fn stops(&self) -> &[TourStop] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<TourStop> {
        self.stops
    }

    pub fn stop_for_date(&self, date: NaiveDate) -> Option<&TourStop> {
        self.stops.iter().find(|s| s.covers(date))
    }

    pub fn city_for_date(&self, date: NaiveDate) -> &str {
        self.stop_for_date(date).map(|s| s.city.as_str()).unwrap_or("")
    }

    pub fn validate_city(&self, date: NaiveDate, city: &str) -> Result<(), CityCheck> {
        if city.trim().is_empty() || is_fly_me_city(city) {
            return Ok(());
        }
        let touring = self.city_for_date(date);
        if touring.is_empty() {
            return Err(CityCheck::NoTourOnDate(date));
        }
        if normalize_city_name(touring) != normalize_city_name(city) {
            return Err(CityCheck::Mismatch {
                city: touring.to_string(),
                date,
            });
        }
        Ok(())
    }

    pub fn overlaps(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (i, a) in self.stops.iter().enumerate() {
            for (j, b) in self.stops.iter().enumerate().skip(i + 1) {
                if a.overlaps(b) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn calendar() -> TourCalendar {
        TourCalendar::new(vec![
            TourStop::new("Montreal", d("2026-02-08"), d("2026-02-14")),
            TourStop::new("Toronto", d("2026-02-15"), d("2026-02-18")),
            TourStop::new("Vancouver", d("2026-02-19"), d("2026-02-21")),
        ])
    }

    #[test]
    fn test_city_for_date_uses_inclusive_bounds() {
        let cal = calendar();
        assert_eq!(cal.city_for_date(d("2026-02-15")), "Toronto");
        assert_eq!(cal.city_for_date(d("2026-02-18")), "Toronto");
        assert_eq!(cal.city_for_date(d("2026-02-22")), "");
    }

    #[test]
    fn test_first_listed_stop_wins_on_overlap() {
        let cal = TourCalendar::new(vec![
            TourStop::new("Paris", d("2026-03-14"), d("2026-03-19")),
            TourStop::new("Berlin", d("2026-03-10"), d("2026-03-15")),
        ]);
        assert_eq!(cal.city_for_date(d("2026-03-15")), "Paris");
        assert_eq!(cal.overlaps(), vec![(0, 1)]);
    }

    #[test]
    fn test_sentinel_city_always_validates() {
        let cal = calendar();
        assert_eq!(cal.validate_city(d("2027-01-01"), "  Fly ME   to you "), Ok(()));
        assert_eq!(cal.validate_city(d("2026-02-16"), "Fly me to you"), Ok(()));
    }

    #[test]
    fn test_city_mismatch_and_missing_tour() {
        let cal = calendar();
        assert_eq!(cal.validate_city(d("2026-02-16"), " toronto "), Ok(()));
        assert_eq!(
            cal.validate_city(d("2026-02-16"), "Paris"),
            Err(CityCheck::Mismatch { city: "Toronto".into(), date: d("2026-02-16") })
        );
        assert_eq!(
            cal.validate_city(d("2026-06-01"), "Paris"),
            Err(CityCheck::NoTourOnDate(d("2026-06-01")))
        );
    }

    #[test]
    fn test_reversed_stops_are_ignored() {
        let cal = TourCalendar::new(vec![TourStop::new("Oslo", d("2026-05-10"), d("2026-05-01"))]);
        assert!(cal.stops().is_empty());
    }
}
