pub mod codec;
pub mod ports;
pub mod sqlite;

pub use sqlite::SqliteDatabase;
