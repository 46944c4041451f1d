pub mod availability;
pub mod block;
pub mod booking;
pub mod schedule;
pub mod session_length;
pub mod time;
pub mod tour;
