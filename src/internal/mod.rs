pub mod anchors;
pub mod catalog;
pub mod models;
pub mod notification;
pub mod search;
pub mod theme;
pub mod ui;
