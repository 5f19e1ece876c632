mod renderer;
mod types;


pub use renderer::*;
pub use types::*;
