//! Safe SQL builder: identifiers from validated models only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
