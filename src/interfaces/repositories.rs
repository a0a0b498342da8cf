pub mod clock;
pub mod notifier;
