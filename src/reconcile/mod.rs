pub mod best_option;
pub mod change_detector;
pub mod spread;
