//! HTTP client for the public CoWIN API.
//!
//! Every endpoint is described by an [`Endpoint`], which knows its path
//! template and HTTP method. Metadata and appointment lookups are GETs with
//! query parameters; the authentication API takes JSON bodies over POST.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{
    CalendarResponse, Center, DaySessionsResponse, District, DistrictsResponse, OtpConfirmation,
    OtpRequest, OtpResponse, State, StatesResponse, TokenResponse,
};
use crate::utils::format_api_date;

/// A CoWIN API endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    States,
    Districts { state_id: u32 },
    SessionsByPin,
    SessionsByDistrict,
    CalendarByPin,
    CalendarByDistrict,
    GenerateOtp,
    ConfirmOtp,
}

impl Endpoint {
    fn template(self) -> &'static str {
        match self {
            Endpoint::States => "/v2/admin/location/states",
            Endpoint::Districts { .. } => "/v2/admin/location/districts/{state_id}",
            Endpoint::SessionsByPin => "/v2/appointment/sessions/public/findByPin",
            Endpoint::SessionsByDistrict => "/v2/appointment/sessions/public/findByDistrict",
            Endpoint::CalendarByPin => "/v2/appointment/sessions/public/calendarByPin",
            Endpoint::CalendarByDistrict => "/v2/appointment/sessions/public/calendarByDistrict",
            Endpoint::GenerateOtp => "/v2/auth/public/generateOTP",
            Endpoint::ConfirmOtp => "/v2/auth/public/confirmOTP",
        }
    }

    /// Path relative to the server root, with template variables filled in.
    pub fn path(self) -> String {
        let template = self.template();
        match self {
            Endpoint::Districts { state_id } => {
                template.replace("{state_id}", &state_id.to_string())
            }
            _ => template.to_string(),
        }
    }

    pub fn method(self) -> Method {
        match self {
            Endpoint::GenerateOtp | Endpoint::ConfirmOtp => Method::POST,
            _ => Method::GET,
        }
    }
}

/// Where to look for appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchArea {
    District(u32),
    Pincode(u32),
}

impl SearchArea {
    fn query(self, date: NaiveDate) -> Vec<(&'static str, String)> {
        let date = format_api_date(date);
        match self {
            SearchArea::District(id) => vec![("district_id", id.to_string()), ("date", date)],
            SearchArea::Pincode(pin) => vec![("pincode", pin.to_string()), ("date", date)],
        }
    }
}

impl fmt::Display for SearchArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchArea::District(id) => write!(f, "district {}", id),
            SearchArea::Pincode(pin) => write!(f, "pincode {}", pin),
        }
    }
}

/// The calls the watch loop needs from the API.
#[async_trait]
pub trait AppointmentSource: Send + Sync {
    /// Seven days of centers starting at `from`.
    async fn fetch_centers(&self, area: SearchArea, from: NaiveDate)
        -> Result<Vec<Center>, ApiError>;

    /// Ask the API to text an OTP to `mobile`.
    async fn request_otp(&self, mobile: &str) -> Result<OtpResponse, ApiError>;
}

/// HTTP client for the CoWIN API.
#[derive(Clone, Debug)]
pub struct CowinClient {
    client: Client,
    base_url: String,
}

impl CowinClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn build_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// GET request with query parameters. Deserializes JSON response.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        tracing::debug!(%url, ?query, "GET");

        let mut request = self.client.request(endpoint.method(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }

        self.send(request, url).await
    }

    /// POST JSON body and deserialize response.
    async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: Endpoint,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.build_url(endpoint);
        tracing::debug!(%url, "POST");

        let request = self
            .client
            .request(endpoint.method(), &url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(body);

        self.send(request, url).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: String,
    ) -> Result<T, ApiError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => return Err(ApiError::Request { url, source }),
        };

        let status = response.status();
        tracing::debug!(status = status.as_u16(), %url, "response");

        let text = match response.text().await {
            Ok(text) => text,
            Err(source) => return Err(ApiError::Request { url, source }),
        };

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url,
                body: text,
            });
        }

        tracing::trace!(body = %text, "response body");
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { url, source })
    }

    /// List every state.
    pub async fn get_states(&self) -> Result<Vec<State>, ApiError> {
        let response: StatesResponse = self.get(Endpoint::States, &[]).await?;
        Ok(response.states)
    }

    /// List the districts of a state.
    pub async fn get_districts(&self, state_id: u32) -> Result<Vec<District>, ApiError> {
        let response: DistrictsResponse =
            self.get(Endpoint::Districts { state_id }, &[]).await?;
        Ok(response.districts)
    }

    /// Sessions on a single day for a pincode.
    pub async fn find_by_pin(&self, pincode: u32, date: NaiveDate) -> Result<Vec<Center>, ApiError> {
        self.find_day(SearchArea::Pincode(pincode), date).await
    }

    /// Sessions on a single day for a district.
    pub async fn find_by_district(
        &self,
        district_id: u32,
        date: NaiveDate,
    ) -> Result<Vec<Center>, ApiError> {
        self.find_day(SearchArea::District(district_id), date).await
    }

    /// Seven days of sessions starting at `date` for a pincode.
    pub async fn calendar_by_pin(
        &self,
        pincode: u32,
        date: NaiveDate,
    ) -> Result<Vec<Center>, ApiError> {
        self.find_week(SearchArea::Pincode(pincode), date).await
    }

    /// Seven days of sessions starting at `date` for a district.
    pub async fn calendar_by_district(
        &self,
        district_id: u32,
        date: NaiveDate,
    ) -> Result<Vec<Center>, ApiError> {
        self.find_week(SearchArea::District(district_id), date).await
    }

    /// Single-day lookup for either kind of area.
    async fn find_day(&self, area: SearchArea, date: NaiveDate) -> Result<Vec<Center>, ApiError> {
        let endpoint = match area {
            SearchArea::District(_) => Endpoint::SessionsByDistrict,
            SearchArea::Pincode(_) => Endpoint::SessionsByPin,
        };
        let response: DaySessionsResponse = self.get(endpoint, &area.query(date)).await?;
        Ok(response.into_centers())
    }

    /// Seven-day lookup for either kind of area.
    async fn find_week(&self, area: SearchArea, date: NaiveDate) -> Result<Vec<Center>, ApiError> {
        let endpoint = match area {
            SearchArea::District(_) => Endpoint::CalendarByDistrict,
            SearchArea::Pincode(_) => Endpoint::CalendarByPin,
        };
        let response: CalendarResponse = self.get(endpoint, &area.query(date)).await?;
        tracing::info!("Received {} centers for {}", response.centers.len(), area);
        Ok(response.centers)
    }

    /// Send an OTP to a registered mobile number.
    pub async fn generate_otp(&self, mobile: &str) -> Result<OtpResponse, ApiError> {
        let body = OtpRequest {
            mobile: mobile.to_string(),
        };
        self.post_json(Endpoint::GenerateOtp, &body).await
    }

    /// Exchange an OTP for a session token.
    pub async fn confirm_otp(&self, otp: &str, txn_id: &str) -> Result<TokenResponse, ApiError> {
        let body = OtpConfirmation::new(otp, txn_id);
        self.post_json(Endpoint::ConfirmOtp, &body).await
    }
}

#[async_trait]
impl AppointmentSource for CowinClient {
    async fn fetch_centers(
        &self,
        area: SearchArea,
        from: NaiveDate,
    ) -> Result<Vec<Center>, ApiError> {
        self.find_week(area, from).await
    }

    async fn request_otp(&self, mobile: &str) -> Result<OtpResponse, ApiError> {
        self.generate_otp(mobile).await
    }
}
