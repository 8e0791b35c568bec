pub mod set;
pub mod types;
pub mod validator;

pub use set::*;
pub use types::*;
pub use validator::*;
