use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use log::{error, info};
use serde::Serialize;
use sqlx::AnyPool;

use crate::config::RuntimeMode;
use crate::db::customers::{insert_customer, latest_customer_by_phone};
use crate::error::ApiError;
use crate::registration_backend::record::types::{CustomerLookupResult, SubmissionRecord};

#[derive(Clone)]
pub struct AppState {
    pub pool: AnyPool,
    pub mode: RuntimeMode,
}

impl AppState {
    fn database_error(&self, message: &'static str, detail: String) -> ApiError {
        error!("{}: {}", message, detail);
        ApiError::Database {
            message,
            detail: self.mode.exposes_error_detail().then_some(detail),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

const REGISTER_FAILED: &str = "Failed to save customer data";
const LOOKUP_FAILED: &str = "Failed to fetch customer data";

// Each handler holds one pooled connection for one statement; the
// connection goes back to the pool when it drops, on every exit path.

pub async fn register_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmissionRecord>, JsonRejection>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let Json(record) = payload.map_err(|e| ApiError::MalformedPayload(e.body_text()))?;

    let mut conn = state
        .pool
        .acquire()
        .await
        .map_err(|e| state.database_error(REGISTER_FAILED, e.to_string()))?;

    insert_customer(&mut conn, &record)
        .await
        .map_err(|e| state.database_error(REGISTER_FAILED, e))?;

    info!("Registered customer {}", record.id);
    Ok(Json(ApiResponse {
        success: true,
        message: Some("Customer registration successful".to_string()),
        data: None,
    }))
}

pub async fn customer_handler(
    State(state): State<AppState>,
    Path(phone): Path<String>,
) -> Result<Json<ApiResponse<CustomerLookupResult>>, ApiError> {
    let mut conn = state
        .pool
        .acquire()
        .await
        .map_err(|e| state.database_error(LOOKUP_FAILED, e.to_string()))?;

    let customer = latest_customer_by_phone(&mut conn, &phone)
        .await
        .map_err(|e| state.database_error(LOOKUP_FAILED, e))?;

    Ok(Json(match customer {
        Some(customer) => ApiResponse {
            success: true,
            message: None,
            data: Some(customer),
        },
        None => ApiResponse {
            success: false,
            message: Some("No customer found with this phone number".to_string()),
            data: None,
        },
    }))
}
