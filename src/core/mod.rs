//! Core domain types, errors and collaborator traits

pub mod error;
pub mod events;
pub mod notification;
pub mod order;
pub mod planner;

pub use error::{RejectReason, RowValidationError, UploadError};
pub use events::{NotificationBus, NotificationEnvelope};
pub use notification::{Notification, NotificationVariant, Notifier, TracingNotifier};
pub use order::{Order, RequiredField};
pub use planner::{PendingRoutePlanner, RoutePlanner};
