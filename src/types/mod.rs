//! Value types shared by every file organization.

mod key;
mod record;

pub use key::Key;
pub use record::Record;
