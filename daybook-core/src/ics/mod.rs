//! ICS file generation and parsing.
//!
//! Each event is stored as a single-VEVENT `.ics` file. Fields iCalendar has
//! no property for travel as `X-DAYBOOK-*` properties.

mod generate;
mod parse;

pub use generate::generate_ics;
pub use parse::parse_event;

pub(crate) const PROP_TIME_STATUS: &str = "X-DAYBOOK-TIME-STATUS";
pub(crate) const PROP_RECURSION_ID: &str = "X-DAYBOOK-RECURSION-ID";
pub(crate) const PROP_CATEGORY: &str = "X-DAYBOOK-CATEGORY";

const ICS_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
