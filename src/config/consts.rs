/// Prefix marking a forbidden tag in a selector expression
pub const NEGATION_PREFIX: char = '-';
/// Lookback used when a declaration doesn't give one
pub const DEFAULT_LOOKBACK: u32 = 0;
