pub mod actions;
pub mod app;
pub mod editor;
pub mod model;
pub mod removal;
pub mod view;

pub use app::run;
