//! Studio Generate — turns a content brief into a streamed blog draft.
//!
//! - [`brief`]: validated generation parameters
//! - [`prompt`]: the writing prompt and its date source
//! - [`service`]: [`GenerationService`], which relays model output

pub mod brief;
pub mod prompt;
pub mod service;

pub use brief::{BriefRequest, Category, ContentBrief, Tone};
pub use prompt::{Clock, FixedClock, SystemClock, build_prompt};
pub use service::GenerationService;
