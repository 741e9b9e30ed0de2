pub mod bonuses;
pub mod deposit;
pub mod health;
pub mod payments;
pub mod progress;
pub mod session;
pub mod widgets;
