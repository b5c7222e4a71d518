pub mod block;
pub mod gui;
pub mod sentinel;
pub mod serialized;
pub mod session;
pub mod statistics;
pub mod tree;

pub use block::{Block, BlockIndex, ThreadId, Walk};
pub use gui::{GuiBlock, Selection};
pub use serialized::{DataRef, SerializedData};
pub use session::{Session, SessionError};
pub use statistics::{BlockStatistics, StatsId};
pub use tree::{ThreadBlocksTree, ThreadTree};
