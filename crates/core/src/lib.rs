mod assets;

pub mod config;
pub mod credential;
pub mod dispatch;
pub mod mode;
pub mod normalize;
pub mod session;

pub use crate::assets::get_data_dir;
