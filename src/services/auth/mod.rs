pub mod claims;
pub mod gate;
pub mod pipeline;
pub mod roles;
pub mod session;

pub use gate::{GateOutcome, decide, permits};
pub use pipeline::{AuthPipeline, PipelineError};
pub use roles::{ADMIN, GuardRule, RoleSet, USER};
pub use session::{Session, SessionContext, TokenSet};
