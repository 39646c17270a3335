// Collaborators around the decision core: order execution and the session
// loop that drives decision cycles.
pub mod execution;
pub mod session;

pub use execution::{ExecutionVenue, OrderReceipt, OrderRequest, SimulatedVenue};
pub use session::{Session, SessionSummary};
