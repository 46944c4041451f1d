use crate::domain::models::block::{BlockKind, BlockedRange};
use crate::domain::models::schedule::CityScheduleTemplate;
use crate::domain::models::time::TimeOfDay;
use crate::domain::services::block_store::split_into_cells;
use crate::domain::services::time_grid::{dates_between, next_day};
use chrono::NaiveDate;

pub const SLEEP_REASON: &str = "Sleep";
pub const BREAK_REASON: &str = "Break";

pub fn generate_blocks(schedule: &CityScheduleTemplate) -> Vec<BlockedRange> {
    let mut blocks = Vec::new();
    for date in dates_between(schedule.start, schedule.end) {
        if schedule.sleeps_on(date) {
            push_window(&mut blocks, schedule, date, schedule.sleep_start, schedule.sleep_end, SLEEP_REASON);
        }
        if schedule.breaks_on(date) {
            push_window(&mut blocks, schedule, date, schedule.break_start, schedule.break_end, BREAK_REASON);
        }
    }
    blocks
}

pub fn generate_all(schedules: &[CityScheduleTemplate]) -> Vec<BlockedRange> {
    schedules.iter().flat_map(generate_blocks).collect()
}

fn push_window(
    target: &mut Vec<BlockedRange>,
    schedule: &CityScheduleTemplate,
    date: NaiveDate,
    start: Option<TimeOfDay>,
    end: Option<TimeOfDay>,
    reason: &str,
) {
    let (Some(start), Some(end)) = (start, end) else {
        return;
    };

    if start < end {
        push_range(target, schedule, date, start, end, reason);
    } else if start > end {
        push_range(target, schedule, date, start, TimeOfDay::END_OF_DAY, reason);
        // the morning half only exists if the stay continues past midnight
        if let Some(next) = next_day(date)
            && schedule.covers(next)
        {
            push_range(target, schedule, next, TimeOfDay::MIDNIGHT, end, reason);
        }
    }
}

fn push_range(
    target: &mut Vec<BlockedRange>,
    schedule: &CityScheduleTemplate,
    date: NaiveDate,
    start: TimeOfDay,
    end: TimeOfDay,
    reason: &str,
) {
    let range = BlockedRange::new(date, start, end, BlockKind::Template, reason).with_city(&schedule.city);
    target.extend(split_into_cells(&range));
}
