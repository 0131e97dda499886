//! Request handlers, grouped by route module.

pub mod ask;
pub mod widgets;
