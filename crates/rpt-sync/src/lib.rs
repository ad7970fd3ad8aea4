//! Multi-session change synchronization.
//!
//! A [`SyncBroadcaster`] tells listeners in this session that a configuration
//! changed and mirrors the same notification to other sessions through a
//! [`ChangeNotifier`]. Sessions on the other end decode it and call their own
//! listeners with the identical [`SyncNotification`].
//!
//! Invalidation is separate from notification: callers clear derived state
//! with [`SyncBroadcaster::invalidate`], which reaches every registered
//! [`ScopedCache`].
//!
//! The broadcaster's lifecycle is explicit. Nothing is spawned until
//! [`SyncBroadcaster::start`], and [`SyncBroadcaster::shutdown`] stops it.

mod broadcaster;
mod cache;
mod error;
mod notification;
mod notifier;

pub use broadcaster::{Listener, SyncBroadcaster};
pub use cache::{ScopeInvalidation, ScopedCache};
pub use error::SyncError;
pub use notification::{ChangeKind, SyncNotification};
pub use notifier::{ChangeNotifier, InProcessChangeBus};
