//! Deferred transmission of two-step PTP frames.
//!
//! A frame carrying a two-step clone must not reach the switch before the PTP
//! subsystem has dealt with the clone. Such frames are parked in one FIFO
//! queue per message class and released by a worker task per class once the
//! clone's timestamp has been reported or the clone was discarded.
//!
//! ```text
//! attachment --dispatch()--> [Sync queue]        --worker--\
//!                            [Pdelay_Req queue]  --worker---> FrameTransmitter
//!                            [Pdelay_Resp queue] --worker--/
//! ```

mod dispatcher;
mod queue;


pub use dispatcher::{DeferredDispatcher, DispatchOutcome};
