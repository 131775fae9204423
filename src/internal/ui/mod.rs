pub mod app;
pub mod sort;
pub mod view;
