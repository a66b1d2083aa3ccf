pub mod client;
pub mod movement;
pub mod product;
pub mod report;
pub mod sale;

pub use client::*;
pub use movement::*;
pub use product::*;
pub use report::*;
pub use sale::*;
