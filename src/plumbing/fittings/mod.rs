//! Built-in fittings.

pub mod chain;
pub mod filter;
pub mod listener;
pub mod pipe;
pub mod queue;
pub mod tee_merge;
pub mod tee_split;

pub use chain::PipeChain;
pub use filter::{filter_fn, param_as, Filter, FilterFn, FilterMode, PipeFilter};
pub use listener::{PipeListener, PipeMessageHandler};
pub use pipe::Pipe;
pub use queue::{Queue, QueueMode};
pub use tee_merge::TeeMerge;
pub use tee_split::TeeSplit;
