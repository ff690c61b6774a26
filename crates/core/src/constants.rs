/// Storage key under which the bearer token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Minimum password length accepted by the backend.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Upper bound of a goal progress percentage.
pub const MAX_PROGRESS_PERCENTAGE: u32 = 100;

/// Canonical wire format for calendar dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";
