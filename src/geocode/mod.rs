mod client;
mod resolver;
mod types;

#[cfg(test)]
mod tests;

pub use client::*;
pub use resolver::*;
pub use types::*;
