use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Field values as they stand when the user hits submit.
#[derive(Debug, Clone)]
pub struct FormFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub gender: String,
    pub dob: NaiveDate,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
    pub position: Option<Coordinates>,
}

impl FormFields {
    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }

    /// Fills the coordinate fields from `provider`. A refused or missing
    /// position leaves whatever was there before and never blocks submission.
    pub async fn apply_position(&mut self, provider: &dyn GeolocationProvider) {
        match provider.current_position().await {
            Ok(position) => self.position = Some(position),
            Err(e) => warn!("Error getting location: {}", e),
        }
    }
}

#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, String>;
}

/// A position the caller already knows, e.g. passed on the command line.
pub struct FixedPosition(pub Coordinates);

#[async_trait]
impl GeolocationProvider for FixedPosition {
    async fn current_position(&self) -> Result<Coordinates, String> {
        Ok(self.0)
    }
}

pub struct NoGeolocation;

#[async_trait]
impl GeolocationProvider for NoGeolocation {
    async fn current_position(&self) -> Result<Coordinates, String> {
        Err("Geolocation is not supported on this client".to_string())
    }
}

/// Client environment metadata. Never user-entered.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceContext {
    pub user_agent: String,
    pub platform: String,
    pub screen_width: u32,
    pub screen_height: u32,
}

impl DeviceContext {
    pub fn current(screen_width: u32, screen_height: u32) -> Self {
        Self {
            user_agent: format!("customer-registration/{}", env!("CARGO_PKG_VERSION")),
            platform: std::env::consts::OS.to_string(),
            screen_width,
            screen_height,
        }
    }

    pub fn screen_resolution(&self) -> String {
        format!("{}x{}", self.screen_width, self.screen_height)
    }
}
