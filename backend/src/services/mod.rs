//! Business logic services for the ChemStock platform

pub mod customer;
pub mod dispatch;
pub mod invoice;
pub mod location;
pub mod product;
pub mod reconciliation;
pub mod stock;

pub use customer::CustomerService;
pub use dispatch::DispatchService;
pub use invoice::InvoiceService;
pub use location::LocationService;
pub use product::ProductService;
pub use reconciliation::ReconciliationService;
pub use stock::StockService;
