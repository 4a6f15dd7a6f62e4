pub mod history;
pub mod live;
pub mod login;
pub mod not_found;
