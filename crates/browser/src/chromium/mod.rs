mod session;
mod wait;

pub use session::ChromiumSession;
pub use wait::WaitStrategy;
