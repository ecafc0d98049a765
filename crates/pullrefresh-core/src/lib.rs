pub mod animation;
pub mod config;
pub mod controller;
pub mod error;
pub mod gesture;
pub mod invoker;
pub mod phase;
pub mod progress;

pub use config::{AppConfig, EasingType, IndicatorConfig, IndicatorStyle, PullConfig};
pub use controller::{PullController, PullEvent};
pub use error::{Error, Result};
pub use gesture::{GestureEvent, PullSession};
pub use invoker::{FnAction, RefreshAction, RefreshInvoker, RefreshOutcome, RefreshTicket};
pub use phase::Phase;
pub use progress::{IndicatorFrame, IndicatorTransform, ProgressReporter};
