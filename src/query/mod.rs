mod clause;
mod context;
mod statement;

pub use clause::*;
pub use context::*;
pub use statement::*;
