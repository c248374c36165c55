//! Data models for CoWIN API responses.

pub mod auth;
pub mod center;
pub mod location;

pub use auth::{OtpConfirmation, OtpRequest, OtpResponse, TokenResponse};
pub use center::{CalendarResponse, Center, DaySessionsResponse, Session};
pub use location::{District, DistrictsResponse, State, StatesResponse};
