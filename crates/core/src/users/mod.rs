//! Users module - account and credential models.

mod users_model;

pub use users_model::{AccessToken, NewUser, PasswordUpdate, ThemePreference, User, UserUpdate};
