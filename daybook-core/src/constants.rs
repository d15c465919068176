//! Layout and recurrence constants.

/// Width of one layout slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// Number of layout slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

/// Span assumed for layout when an event has no end.
pub const DEFAULT_DURATION_MINUTES: i64 = 15;

/// Bounds on the number of occurrences a recurrence rule may generate.
pub const MIN_OCCURRENCES: u32 = 1;
pub const MAX_OCCURRENCES: u32 = 365;

/// Hour untimed and all-day events are normalized to.
pub const UNTIMED_HOUR: u32 = 12;

/// Name of the per-calendar metadata directory.
pub const METADATA_DIR: &str = ".daybook";
