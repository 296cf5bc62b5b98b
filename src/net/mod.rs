// Traffic classification pipeline
//
// Read-only view of captured frames: decode, then classify by address.
// Nothing in here performs I/O.

pub mod addr;
pub mod flow;
pub mod frame;

pub use flow::{classify, Direction, FlowVerdict, IgnoreReason};
pub use frame::{decode_frame, LinkKind, Packet};
