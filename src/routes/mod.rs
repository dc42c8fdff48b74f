pub mod export;
pub mod health;
pub mod integrations;
pub mod queries;
pub mod weather;
