mod admin;
mod health;
mod helpers;
mod mocks;
mod target;
mod triggers;
