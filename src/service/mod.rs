//! Request-side checks applied before a store is called.

mod validation;
pub use validation::RequestValidator;
