pub mod standings;
pub mod stat_bar;
