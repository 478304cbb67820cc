//! Commands exposed to front-ends
//!
//! Each command names its database (and passphrase or key) explicitly.

pub mod crypto;
pub mod params;
pub mod records;
pub mod session;

pub use crypto::*;
pub use params::*;
pub use records::*;
pub use session::*;
