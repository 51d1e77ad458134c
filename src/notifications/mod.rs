pub mod dispatcher;
pub mod message;
pub mod senders;

pub use dispatcher::NotificationDispatcher;
