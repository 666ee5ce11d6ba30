pub mod activity;
pub mod dashboard;
pub mod lesson;
pub mod skills_grid;
pub mod splash;
pub mod technique;
