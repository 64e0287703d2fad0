/// Shortest password length the configuration accepts.
pub const MIN_PASSWORD_LENGTH: u32 = 11;

/// Longest password length the configuration and the generators accept.
pub const MAX_PASSWORD_LENGTH: u32 = 4096;

/// Default upper bound of concurrently borrowed cipher handles.
pub const DEFAULT_POOL_CAPACITY: usize = 10;

/// Default location of the file-backed secret store.
pub const DEFAULT_STORAGE_PATH: &str = "passwords.properties";

/// Action names as they appear in the access log.
pub const MODIFICATION: &str = "modification";
pub const CONSULTATION: &str = "consultation";
