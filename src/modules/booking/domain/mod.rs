pub mod calendar;
pub mod entities;
