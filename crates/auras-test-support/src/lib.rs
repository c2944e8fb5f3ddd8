//! Shared test doubles for the token auras engine.

mod authority;
mod channel;
mod geometry;
mod notifier;
mod scene;

pub use authority::StaticAuthority;
pub use channel::{FailingChannel, HangingChannel, LoopbackChannel, RecordingChannel};
pub use geometry::GridGeometry;
pub use notifier::RecordingNotifier;
pub use scene::InMemoryScene;
