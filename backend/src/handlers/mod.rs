//! HTTP handlers for the ChemStock platform

pub mod customers;
pub mod dispatches;
pub mod health;
pub mod invoices;
pub mod locations;
pub mod maintenance;
pub mod products;
pub mod stock;

pub use customers::*;
pub use dispatches::*;
pub use health::*;
pub use invoices::*;
pub use locations::*;
pub use maintenance::*;
pub use products::*;
pub use stock::*;
