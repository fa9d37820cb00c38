//! Editor host seam and the Monolithium commands built on it.
//! 編輯器宿主介面與建立於其上的 Monolithium 指令。

mod commands;
mod host;

pub use commands::{AbortReason, CommandError, CommandOutcome, Commands};
pub use host::{Host, HostError, PackageAction};
