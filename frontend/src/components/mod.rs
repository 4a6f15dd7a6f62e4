pub mod header;
pub mod route_guard;
