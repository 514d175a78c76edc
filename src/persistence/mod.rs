pub mod history_log;
pub mod record;
pub mod schema;
