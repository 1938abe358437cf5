//! # Events Module
//!
//! Progress reporting decoupled from presentation.
//!
//! ## Design
//! The pipeline emits events through a channel; the CLI (or a test)
//! subscribes and renders progress however it likes. Workers only ever
//! send, so the channel is the single point of cross-thread interaction.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Load(LoadEvent::Progress(p)) = event {
//!             println!("Loaded {}/{}", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
