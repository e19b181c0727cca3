mod app;
mod defaults;
mod effects;
mod surface;

pub use app::run_app;
