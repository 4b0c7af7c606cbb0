mod console;
pub mod routes;

pub use console::{Console, Dashboard, Removal};
