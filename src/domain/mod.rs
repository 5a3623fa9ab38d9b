pub mod qa;
pub mod schema;
