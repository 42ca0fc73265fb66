//! Weekly hours reports over tracked work.
//!
//! Tasks come from a [`source::TaskSource`], get bucketed into ISO-week
//! [`period::Period`]s, and are summarised by [`report::Report`]s rendered as
//! plain text or wiki markup.

pub mod calendar;
pub mod cli;
pub mod links;
pub mod manifest;
pub mod model;
pub mod period;
pub mod render;
pub mod report;
pub mod report_processor;
pub mod source;
pub mod util;
pub mod weeks;
