pub mod ids;
pub mod rate;
pub mod timestamp;
