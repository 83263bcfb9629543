pub mod sqlite;

pub use dudedirt_common::traits::repository_traits::{
    BookingRepository, CatalogRepository, PointTransactionRepository, UserRepository,
};
