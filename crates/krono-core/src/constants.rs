/// Zone applied when a schedule does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Last calendar year the recurrence expander will scan.
///
/// Rules whose filters can never match (e.g. February 30th) end here.
pub const MAX_EXPANSION_YEAR: i32 = 9999;

/// Name of the optional configuration file read by [`crate::config::load_config`].
pub const CONFIG_FILE_NAME: &str = "krono.toml";
