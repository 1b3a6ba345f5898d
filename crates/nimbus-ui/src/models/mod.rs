pub mod day_night;
pub mod main_model;
