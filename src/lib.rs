pub mod celestial;
pub mod constants;
pub mod geomag;
pub mod great_circle;
pub mod hull;
pub mod nav_errors;
pub mod navigator;
pub mod render;
pub mod scan;
pub mod sight;
pub mod time;
