pub mod catalog;
pub mod health;
pub mod orders;
pub mod partners;
pub mod security;
pub mod settings;
