pub mod palette;
pub mod title;
pub mod url;
