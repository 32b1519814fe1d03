pub mod category;
pub mod dashboard;
pub mod profile;
pub mod proposal;
pub mod setting;
