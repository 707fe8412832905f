pub mod analysis;
pub mod area;
pub mod calc;
pub mod draw;
pub mod format;
pub mod mercator;
pub mod models;
pub mod store;
pub mod suggest;
