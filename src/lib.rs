//! Media note builder for inbound assistant messages
//!
//! Reconciles the attachment fields on an inbound message (paths, URLs, type
//! labels, and prior media-understanding results) into a short annotation
//! that a prompt-assembly pipeline embeds verbatim:
//!
//! ```text
//! [media attached: 2 files]
//! [media attached 1/2: photo.jpg (image/jpeg) | https://cdn/x/photo.jpg]
//! [media attached 2/2: voice.ogg (audio/ogg)]
//! ```
//!
//! Attachments already described by the media-understanding subsystem are
//! left out of the note; when nothing remains, there is no note at all.
//! Building is pure and synchronous. The only fallible surface is parsing a
//! [`MsgContext`] from the pipeline's JSON payload.

pub mod context;
pub mod error;
pub mod note;

pub use context::{
    ChosenOutcome, DecisionAttachment, MediaUnderstanding, MsgContext, UnderstandingDecision,
};
pub use error::{Error, Result};
pub use note::build_inbound_media_note;
