//! Live-object introspection and preview serialization for remote debugger
//! front-ends.
//!
//! Turns arbitrary, possibly cyclic, possibly huge runtime object graphs
//! into bounded, wire-safe descriptions: opaque handles for later
//! dereference, property enumeration across prototype chains, bounded
//! collection entries, and depth-limited previews with honest
//! `lossless`/`overflow` flags. Host reflection is consumed through the
//! [`host::Host`] capability trait; nothing here touches live objects
//! directly.

mod call_frame;
pub mod collections;
mod describe;
pub mod enumerate;
pub mod error;
pub mod host;
pub mod protocol;
mod preview;
pub mod registry;
mod session;

pub use describe::DescribeOptions;
pub use enumerate::{EnumerateOptions, PropertyFilter};
pub use error::InspectError;
pub use preview::SecondLevel;
#[doc(hidden)]
pub use preview::previewable;
pub use registry::{Registry, CONSOLE_GROUP};
pub use session::Inspector;
