mod map;
mod operation;

pub use map::OperationsMap;
pub use operation::{AuthMode, HttpMethod, OperationDefinition};
