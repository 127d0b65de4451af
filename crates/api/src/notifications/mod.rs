//! Outbound visit notifications.

mod dispatcher;

pub use dispatcher::NotificationDispatcher;
