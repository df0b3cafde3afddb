mod active_value;
mod identity;
mod record;
mod schema;

pub use active_value::*;
pub use identity::*;
pub use record::*;
pub use schema::*;
