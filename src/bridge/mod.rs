//! Polling core: watermark bookkeeping and the poll-deliver loop

mod poller;
mod watermark;

pub use poller::EventPoller;
pub use watermark::{PollWindow, Watermark};
