//! Domain layer - the conversion pipeline's pure core.
//!
//! - `event` - inbound `SourceEvent` record and its decoder
//! - `format` - `TargetFormat` and the per-format encoders
//! - `errors` - error taxonomy shared by every stage

pub mod errors;
pub mod event;
pub mod format;

pub use errors::{ConversionError, ErrorCode, PublishError};
pub use event::{decode, SourceEvent};
pub use format::{encode, TargetFormat};
