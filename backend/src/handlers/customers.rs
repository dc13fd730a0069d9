//! HTTP handlers for customer endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::{Customer, CustomerInput};

use crate::error::AppResult;
use crate::services::CustomerService;
use crate::AppState;

/// Create a customer
pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CustomerInput>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerService::new(state.db).create_customer(input).await?;
    Ok(Json(customer))
}

/// List all customers
pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let customers = CustomerService::new(state.db).list_customers().await?;
    Ok(Json(customers))
}

/// Update a customer
pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<CustomerInput>,
) -> AppResult<Json<Customer>> {
    let customer = CustomerService::new(state.db)
        .update_customer(customer_id, input)
        .await?;
    Ok(Json(customer))
}

/// Delete a customer
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    CustomerService::new(state.db)
        .delete_customer(customer_id)
        .await?;
    Ok(Json(()))
}
