pub mod admin;
pub mod api;
pub mod error;
pub mod flash;
pub mod health;
pub mod login;
pub mod pages;
