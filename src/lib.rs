// TrashFlow - Waste-Bank Capacity Monitor
// Exposes all modules for use in the TUI, the API server, and tests

pub mod config;
pub mod dashboard;
pub mod error;
pub mod facility;
pub mod logging;
pub mod notification;
pub mod redistribution;
pub mod refresh;
pub mod registry;
pub mod status;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::AppConfig;
pub use dashboard::Dashboard;
pub use error::{RedistributionError, RedistributionResult};
pub use facility::{default_seed, load_seed_csv, FacilityId, FacilityRecord, FacilitySeed};
pub use notification::{Notification, NotificationKind};
pub use redistribution::{apply_redistribution, plan_redistribution, RedistributionPlan};
pub use refresh::{perturb, RefreshSummary, Refresher};
pub use registry::{FacilityRegistry, StatusSummary};
pub use status::{classify, Presentation, Status};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
