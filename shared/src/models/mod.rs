//! Domain models for the ChemStock inventory & dispatch platform

mod customer;
mod dispatch;
mod invoice;
mod location;
mod movement;
mod product;

pub use customer::*;
pub use dispatch::*;
pub use invoice::*;
pub use location::*;
pub use movement::*;
pub use product::*;
