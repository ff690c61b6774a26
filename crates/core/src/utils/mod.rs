pub mod decimal_serde;
pub mod number_utils;
pub mod time_utils;
