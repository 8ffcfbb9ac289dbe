pub mod health;
pub mod tours;
pub mod upload;
