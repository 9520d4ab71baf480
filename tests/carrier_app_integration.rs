//! Integration tests for carrier apps.
//!
//! These tests load a complete carrier app through the public API and drive
//! its methods with in-memory plugin callbacks:
//! 1. Valid input reaches the plugin with references resolved
//! 2. Invalid input never reaches the plugin
//! 3. Plugin failures are normalized and carry the transaction id
//! 4. Omitted outputs are filled with defaults before validation

use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use integration_sdk::application::{CarrierApp, CarrierAppDefinition};
use integration_sdk::config::SdkConfig;
use integration_sdk::domain::definitions::LocalizedDefinition;
use integration_sdk::domain::foundation::{Currency, ErrorCode, SdkError};
use integration_sdk::domain::transaction::Transaction;
use integration_sdk::domain::values::{
    CancellationStatus, PickupRequest, RateCriteria, ShipmentCancellation, ShipmentIdentity,
};
use integration_sdk::ports::{PluginError, PluginResult};

// =============================================================================
// Test Infrastructure
// =============================================================================

const TRANSACTION_ID: &str = "550e8400-e29b-41d4-a716-446655440000";

fn transaction() -> Value {
    json!({ "id": TRANSACTION_ID, "language": "fr-CA" })
}

fn manifest() -> Value {
    json!({
        "id": "0f0e0d0c-0b0a-4090-8070-605040302010",
        "name": "Acme Shipping",
        "websiteURL": "https://acme.example.com",
        "logo": "/assets/app.svg",
        "packaging": [{
            "id": "9a2a7e7e-1c9b-4b55-8a0c-3a2f1b4c5d6e",
            "code": "BOX",
            "name": "Box",
            "requiresWeight": true
        }],
        "carriers": [{
            "id": "e1c7a9a2-5d3b-4c8f-a1e2-b3c4d5e6f7a8",
            "code": "ACME",
            "name": "Acme Freight",
            "websiteURL": "https://acme.example.com",
            "logo": "/assets/acme.svg",
            "deliveryServices": [{
                "id": "3b1f5a4e-8c2d-4e6f-9a0b-1c2d3e4f5a6b",
                "code": "GROUND",
                "name": "Ground",
                "class": "ground",
                "grade": "standard",
                "packaging": ["BOX"],
                "localization": {
                    "fr": { "name": "Sol" },
                    "fr-CA": { "description": "Livraison au sol" }
                }
            }],
            "pickupServices": [{
                "id": "7d8e9f0a-1b2c-4d3e-8f4a-5b6c7d8e9f0a",
                "code": "ONE_TIME",
                "name": "One-time pickup"
            }]
        }]
    })
}

fn address() -> Value {
    json!({
        "addressLines": ["1 Main St"],
        "cityLocality": "Austin",
        "stateProvince": "TX",
        "postalCode": "78701",
        "country": "US"
    })
}

fn rate_criteria() -> Value {
    json!({
        "deliveryServices": ["GROUND"],
        "shipDateTime": "2024-03-01T09:00:00-06:00",
        "shipFrom": address(),
        "shipTo": address(),
        "packages": [{ "packaging": "BOX", "weight": { "value": 2, "unit": "lb" } }]
    })
}

fn one_rate() -> Value {
    json!([{
        "deliveryService": "GROUND",
        "packaging": "BOX",
        "isTrackable": true,
        "charges": [
            { "type": "shipping", "amount": { "value": 12.5, "currency": "USD" } },
            { "type": "fuel", "amount": { "value": 1.25, "currency": "USD" } }
        ]
    }])
}

fn load(definition: CarrierAppDefinition) -> CarrierApp {
    CarrierApp::load(definition, &SdkConfig::default()).unwrap()
}

// =============================================================================
// Input and Output Validation
// =============================================================================

#[tokio::test]
async fn rate_shipment_resolves_references_on_both_sides() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |tx: Transaction, criteria: RateCriteria| async move {
            assert_eq!(tx.language().as_str(), "fr-CA");
            assert_eq!(criteria.delivery_services()[0].name(), "Ground");
            assert_eq!(criteria.packages()[0].packaging().unwrap().name(), "Box");
            PluginResult::Ok(one_rate())
        },
    ));

    let rates = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &rate_criteria())
        .await
        .unwrap();

    assert_eq!(rates.len(), 1);
    assert!(Arc::ptr_eq(
        rates[0].delivery_service(),
        &app.carriers()[0].delivery_services()[0]
    ));
    let total = rates[0].total_amount(&Currency::new("USD").unwrap()).unwrap();
    assert_eq!(total.value, 13.75);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_plugin() {
    let calls = Arc::new(AtomicUsize::new(0));
    let spy = calls.clone();
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        move |_tx: Transaction, _criteria: RateCriteria| {
            spy.fetch_add(1, Ordering::SeqCst);
            async { PluginResult::Ok(json!([])) }
        },
    ));

    let mut criteria = rate_criteria();
    criteria["packages"] = json!([]);
    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &criteria)
        .await
        .unwrap_err();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(err.message, "Invalid input to the `rateShipment` method.");
    assert_eq!(err.transaction_id.unwrap().to_string(), TRANSACTION_ID);
    assert!(err
        .original_message()
        .unwrap()
        .contains("packages must contain at least 1 item(s), got 0"));
}

#[tokio::test]
async fn unknown_reference_is_invalid_input() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |_tx: Transaction, _criteria: RateCriteria| async { PluginResult::Ok(json!([])) },
    ));

    let mut criteria = rate_criteria();
    criteria["deliveryServices"] = json!(["OVERNIGHT"]);
    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &criteria)
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert_eq!(
        err.original_message().as_deref(),
        Some("Unable to find delivery service with ID or code \"OVERNIGHT\".")
    );
}

#[tokio::test]
async fn output_referencing_a_foreign_definition_is_an_app_error() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |_tx: Transaction, _criteria: RateCriteria| async {
            PluginResult::Ok(json!([{ "deliveryService": "ACME", "charges": [] }]))
        },
    ));

    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &rate_criteria())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::AppError);
    assert_eq!(err.original_code, Some(ErrorCode::Invalid));
    assert_eq!(
        err.original_message().as_deref(),
        Some("ACME is a carrier, not a delivery service.")
    );
}

// =============================================================================
// Error Normalization
// =============================================================================

#[tokio::test]
async fn plugin_error_becomes_app_error_with_cause() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |_tx: Transaction, _criteria: RateCriteria| async { PluginResult::Err("boom".into()) },
    ));

    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &rate_criteria())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::AppError);
    assert_eq!(err.message, "Error in the `rateShipment` method.");
    assert_eq!(err.original_message().as_deref(), Some("boom"));
    assert_eq!(err.transaction_id.unwrap().to_string(), TRANSACTION_ID);
    assert_eq!(err.to_string(), "[APP_ERROR] Error in the `rateShipment` method.");
}

#[tokio::test]
async fn plugin_error_code_survives_wrapping() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |_tx: Transaction, _criteria: RateCriteria| async {
            let cause: PluginError = Box::new(SdkError::new(ErrorCode::Unauthorized, "API key revoked"));
            PluginResult::Err(cause)
        },
    ));

    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&transaction(), &rate_criteria())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.original_code, Some(ErrorCode::Unauthorized));
    assert_eq!(err.transaction_id.unwrap().to_string(), TRANSACTION_ID);
}

#[tokio::test]
async fn invalid_transaction_has_no_transaction_id() {
    let app = load(CarrierAppDefinition::new(manifest()).with_rate_shipment(
        |_tx: Transaction, _criteria: RateCriteria| async { PluginResult::Ok(json!([])) },
    ));

    let err = app
        .rate_shipment()
        .unwrap()
        .invoke(&json!({ "id": "not-a-uuid" }), &rate_criteria())
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidInput);
    assert!(err.transaction_id.is_none());
}

// =============================================================================
// Default Filling
// =============================================================================

#[tokio::test]
async fn omitted_cancellation_outcomes_default_to_success() {
    let app = load(CarrierAppDefinition::new(manifest()).with_cancel_shipments(
        |_tx: Transaction, cancellations: Vec<ShipmentCancellation>| async move {
            assert_eq!(cancellations[0].tracking_number(), Some("1Z999"));
            PluginResult::Ok(Value::Null)
        },
    ));

    let outcomes = app
        .cancel_shipments()
        .unwrap()
        .invoke(
            &transaction(),
            &json!([{ "cancellationID": "a1b2c3d4-0000-4000-8000-000000000001", "trackingNumber": "1Z999" }]),
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].status(), CancellationStatus::Success);
    assert_eq!(
        outcomes[0].cancellation_id().to_string(),
        "a1b2c3d4-0000-4000-8000-000000000001"
    );
}

#[tokio::test]
async fn pickup_confirmation_defaults_to_requested_shipments() {
    let app = load(CarrierAppDefinition::new(manifest()).with_schedule_pickup(
        |_tx: Transaction, request: PickupRequest| async move {
            assert_eq!(request.pickup_service().name(), "One-time pickup");
            PluginResult::Ok(json!({
                "id": "PU-42",
                "charges": [],
                "timeWindows": [{
                    "startDateTime": "2024-03-01T13:00:00-06:00",
                    "endDateTime": "2024-03-01T17:00:00-06:00"
                }]
            }))
        },
    ));

    let confirmation = app
        .schedule_pickup()
        .unwrap()
        .invoke(
            &transaction(),
            &json!({
                "pickupService": "ONE_TIME",
                "timeWindow": {
                    "startDateTime": "2024-03-01T12:00:00-06:00",
                    "endDateTime": "2024-03-01T18:00:00-06:00"
                },
                "address": address(),
                "shipments": [{ "trackingNumber": "1Z1", "deliveryService": "GROUND" }]
            }),
        )
        .await
        .unwrap();

    assert_eq!(confirmation.id(), "PU-42");
    assert_eq!(confirmation.shipments().len(), 1);
    assert_eq!(confirmation.shipments()[0].tracking_number(), Some("1Z1"));
    assert_eq!(
        confirmation.shipments()[0].delivery_service().unwrap().name(),
        "Ground"
    );
}

// =============================================================================
// Loaded Graph
// =============================================================================

#[test]
fn loaded_graph_is_sealed_and_localizable() {
    let app = load(CarrierAppDefinition::new(manifest()));
    assert!(app.registry().is_sealed());

    let ground = &app.carriers()[0].delivery_services()[0];
    let localized = ground.localize("fr-CA").unwrap();
    assert_eq!(localized.name(), "Sol");
    assert_eq!(localized.description(), Some("Livraison au sol"));

    // The registered instance keeps its default text.
    assert_eq!(ground.name(), "Ground");
}

#[test]
fn duplicate_codes_are_rejected_at_load() {
    let mut raw = manifest();
    raw["carriers"][0]["pickupServices"][0]["code"] = json!("GROUND");

    let err = CarrierApp::load(CarrierAppDefinition::new(raw), &SdkConfig::default()).unwrap_err();
    assert_eq!(err.code, ErrorCode::Invalid);
    assert!(err.message.starts_with("Duplicate code: \"GROUND\""));
}
