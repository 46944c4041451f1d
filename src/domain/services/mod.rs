pub mod availability;
pub mod block_store;
pub mod calendar;
pub mod projector;
pub mod render;
pub mod snapshot;
pub mod template;
pub mod time_grid;
pub mod timezone;
pub mod tour_calendar;
pub mod validation;
