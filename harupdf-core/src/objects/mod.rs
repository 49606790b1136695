mod dictionary;
mod primitive;
mod registry;
mod stream;

pub use dictionary::Dictionary;
pub use primitive::{Object, ObjectId};
pub use registry::ObjectRegistry;
pub use stream::Stream;
