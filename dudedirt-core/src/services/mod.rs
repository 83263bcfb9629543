pub mod booking_finalizer;
pub mod booking_service;
pub mod booking_wizard;
pub mod rewards;

pub use booking_finalizer::BookingFinalizer;
pub use booking_service::{BookingService, BookingStats};
pub use booking_wizard::{StepData, WizardHandle, WizardState, WizardStatus, WizardStep, WizardStore};
pub use rewards::RewardsLedger;
