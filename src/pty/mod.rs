//! PTY Proxy: the wrapped child on a pseudo-terminal.

mod handle;
mod resolve;
mod session;
mod subscription;

pub use handle::PtyHandle;
pub use resolve::resolve_executable;
pub use session::{PtyEvent, PtyProxy};
pub use subscription::Subscription;
