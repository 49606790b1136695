//! Document navigation structures: destinations, outlines and the page tree.

mod destination;
mod outline;
mod page_tree;

pub use destination::{Destination, DestinationView};
pub use outline::Outline;

pub(crate) use outline::{outline_objects, text_string};
pub(crate) use page_tree::PageTree;
