pub mod completion;
pub mod error;
pub mod target;
pub mod trial;
pub mod view;

pub use completion::Completion;
pub use error::ConfigError;
pub use target::{Container, DisplayTarget, MountToken};
pub use trial::{EventOutcome, ResponseEcho, ResponseRecord, TrialEvent, TrialState};
pub use view::{Element, Node};
