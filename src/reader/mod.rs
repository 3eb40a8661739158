//! XML event reader
//!
//! Forward-only pull parsing over a byte slice:
//! - events: the event types handed to the splitter
//! - pull: EventReader, the single-pass event cursor

pub mod events;
pub mod pull;

pub use events::{EndElement, StartElement, XmlEvent};
pub use pull::EventReader;
