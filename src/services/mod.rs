//! Backend services.

pub mod api_client;
pub mod eligibility;
pub mod monitor;
pub mod notifier;
pub mod report;

pub use api_client::{CowinClient, SearchArea};
pub use eligibility::SlotFilter;
pub use monitor::{Monitor, WatchOptions};
pub use notifier::DesktopNotifier;
