mod display;
mod pod;
mod query;

pub use display::{DisplayEntry, DisplayList};
pub use pod::{ContentElement, Image, Pod, PodBuilder, Sound, Subpod};
pub use query::{Query, QueryResult};
