pub mod wizard_sweeper;

pub use wizard_sweeper::spawn_wizard_sweeper;
