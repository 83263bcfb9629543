pub mod booking;
pub mod catalog;
pub mod point_transaction;
pub mod user;

pub use booking::SqliteBookingRepository;
pub use catalog::SqliteCatalogRepository;
pub use point_transaction::SqlitePointTransactionRepository;
pub use user::SqliteUserRepository;
