pub mod activity;
pub mod health;
pub mod incidents;
pub mod stats;
