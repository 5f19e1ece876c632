pub mod api;
pub mod response;


pub use api::{start, Api};
pub use response::*;
