//! Journey log engine.
//!
//! Domain types, the pure metric/budget/graph computations and the
//! database-backed operations exposed through [`Engine`].

pub use budget::{BudgetPeriod, BudgetPoint, BudgetRange, BudgetStatus};
pub use commands::{JourneyNewCmd, JourneyUpdateCmd, UserSettingsCmd};
pub use error::EngineError;
pub use graph::{GraphData, GraphField, GraphPoint, GraphValue};
pub use import::ImportRow;
pub use journeys::{Condition, Journey};
pub use log_book::LogEntry;
pub use metrics::{DerivedMetrics, GallonUnit, PrimaryInputs, TimeUnit, VehicleProfile};
pub use ops::{Engine, EngineBuilder, EngineConfig, JourneyPage};
pub use statistics::{CostWindows, DateRange, FullStats, Summary};
pub use users::UserProfile;
pub use util::{end_of_day, normalize_username, parse_date_time};

pub mod budget;
mod commands;
mod error;
pub mod graph;
pub mod import;
mod journeys;
mod log_book;
pub mod metrics;
mod ops;
pub mod statistics;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
