pub mod booking;
pub mod catalog;
pub mod points;
pub mod user;
pub mod weather;

pub use booking::{Booking, BookingStatus};
pub use catalog::{Product, RedemptionOption, Service};
pub use points::{
    BOOKING_CONFIRMED_SEEDS, PointReason, PointTransaction, SERVICE_COMPLETED_SEEDS,
    WELCOME_BONUS_SEEDS,
};
pub use user::User;
pub use weather::WeatherSnapshot;
