use anyhow::Result;
use order_tracking::domain::ports::OrderStore;
use order_tracking::{
    Dispatcher, InMemoryOrderStore, OrderId, RoleGate, TrackingCollectionManager, TrackingService,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::BufReader;

const FIRST: &str = "9400100000000000000000";
const SECOND: &str = "9205500000000000000001";

fn dispatcher(store: Arc<InMemoryOrderStore>) -> Dispatcher {
    let gate = Arc::new(RoleGate::new(
        vec!["shop_manager".to_string()],
        vec!["customer".to_string()],
    ));
    let service = TrackingService::new(TrackingCollectionManager::default(), store, gate);
    Dispatcher::with_default_actions(service)
}

fn staff_request(action: &str, fields: Value) -> String {
    let mut request = json!({
        "action": action,
        "caller": {"id": "manager-1", "roles": ["shop_manager"]},
    });
    if let (Some(target), Some(extra)) = (request.as_object_mut(), fields.as_object()) {
        for (key, value) in extra {
            target.insert(key.clone(), value.clone());
        }
    }
    request.to_string()
}

#[tokio::test]
async fn test_registered_actions() {
    let dispatcher = dispatcher(Arc::new(InMemoryOrderStore::new()));
    assert_eq!(
        dispatcher.actions(),
        vec![
            "add_tracking_number",
            "bulk_add_tracking_numbers",
            "delete_tracking_number",
            "list_tracking_numbers"
        ]
    );
}

#[tokio::test]
async fn test_add_one_success_and_duplicate() -> Result<()> {
    let store = Arc::new(InMemoryOrderStore::new());
    let dispatcher = dispatcher(store.clone());

    let request = staff_request(
        "add_tracking_number",
        json!({"order_id": "1042", "tracking_number": "9400-1000-0000-0000-0000-00"}),
    );
    let response = dispatcher.handle_json(&request).await;
    assert_eq!(response["ok"], true);
    assert_eq!(response["number"], FIRST);

    let response = dispatcher.handle_json(&request).await;
    assert_eq!(response["ok"], false);
    assert_eq!(response["error_kind"], "duplicate");
    assert!(response["message"].is_string());

    assert_eq!(store.get(&OrderId::parse("1042")?).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_bulk_add_response_shape() {
    let dispatcher = dispatcher(Arc::new(InMemoryOrderStore::new()));

    let request = staff_request(
        "bulk_add_tracking_numbers",
        json!({"order_id": "8", "raw_block": format!("{}\n{},{}", FIRST, FIRST, "oops")}),
    );
    let response = dispatcher.handle_json(&request).await;
    assert_eq!(
        response,
        json!({
            "ok": true,
            "added": 1,
            "skipped": 1,
            "invalid": 1,
            "errors": [format!("Already exists: {}", FIRST), "Invalid format: oops"]
        })
    );
}

#[tokio::test]
async fn test_delete_and_list() -> Result<()> {
    let store = Arc::new(InMemoryOrderStore::new());
    store
        .insert(OrderId::parse("5")?, [FIRST, SECOND].into_iter().collect())
        .await;
    let dispatcher = dispatcher(store);

    let response = dispatcher
        .handle_json(&staff_request(
            "delete_tracking_number",
            json!({"order_id": "5", "index": 0}),
        ))
        .await;
    assert_eq!(response, json!({"ok": true}));

    let response = dispatcher
        .handle_json(&staff_request(
            "delete_tracking_number",
            json!({"order_id": "5", "index": -1}),
        ))
        .await;
    assert_eq!(response["error_kind"], "index_not_found");

    let list = json!({
        "action": "list_tracking_numbers",
        "caller": {"id": "customer-9", "roles": ["customer"]},
        "order_id": "5"
    });
    let response = dispatcher.handle_json(&list.to_string()).await;
    assert_eq!(response["ok"], true);
    assert_eq!(response["tracking_numbers"][0]["index"], 0);
    assert_eq!(response["tracking_numbers"][0]["number"], SECOND);
    assert_eq!(
        response["tracking_numbers"][0]["tracking_url"],
        format!(
            "https://tools.usps.com/go/TrackConfirmAction?tLabels={}",
            SECOND
        )
    );
    Ok(())
}

#[tokio::test]
async fn test_numeric_order_id_matches_string_id() -> Result<()> {
    let store = Arc::new(InMemoryOrderStore::new());
    let dispatcher = dispatcher(store.clone());

    let response = dispatcher
        .handle_json(&staff_request(
            "add_tracking_number",
            json!({"order_id": 5, "tracking_number": FIRST}),
        ))
        .await;
    assert_eq!(response["ok"], true);

    let response = dispatcher
        .handle_json(&staff_request("list_tracking_numbers", json!({"order_id": "5"})))
        .await;
    assert_eq!(response["tracking_numbers"][0]["number"], FIRST);
    assert_eq!(store.get(&OrderId::parse("5")?).await?.len(), 1);

    let response = dispatcher
        .handle_json(&staff_request("list_tracking_numbers", json!({"order_id": 5.5})))
        .await;
    assert_eq!(response["error_kind"], "invalid_request");
    Ok(())
}

#[tokio::test]
async fn test_index_beyond_i64_is_index_not_found() -> Result<()> {
    let store = Arc::new(InMemoryOrderStore::new());
    store
        .insert(OrderId::parse("5")?, [FIRST].into_iter().collect())
        .await;
    let dispatcher = dispatcher(store.clone());

    let response = dispatcher
        .handle_json(&staff_request(
            "delete_tracking_number",
            json!({"order_id": "5", "index": u64::MAX}),
        ))
        .await;
    assert_eq!(response["ok"], false);
    assert_eq!(response["error_kind"], "index_not_found");

    let response = dispatcher
        .handle_json(&staff_request(
            "delete_tracking_number",
            json!({"order_id": "5", "index": 0.5}),
        ))
        .await;
    assert_eq!(response["error_kind"], "invalid_request");

    assert_eq!(store.get(&OrderId::parse("5")?).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_rejections_use_error_envelope() {
    let dispatcher = dispatcher(Arc::new(InMemoryOrderStore::new()));

    let response = dispatcher.handle_json("not json").await;
    assert_eq!(response["error_kind"], "invalid_request");

    let response = dispatcher
        .handle_json(&staff_request("rename_order", json!({"order_id": "1"})))
        .await;
    assert_eq!(response["error_kind"], "unknown_action");

    let response = dispatcher
        .handle_json(&staff_request("add_tracking_number", json!({"order_id": "1"})))
        .await;
    assert_eq!(response["error_kind"], "invalid_request");

    let response = dispatcher
        .handle_json(&staff_request(
            "add_tracking_number",
            json!({"order_id": "  ", "tracking_number": FIRST}),
        ))
        .await;
    assert_eq!(response["error_kind"], "invalid_request");

    let customer_add = json!({
        "action": "add_tracking_number",
        "caller": {"id": "customer-9", "roles": ["customer"]},
        "order_id": "1",
        "tracking_number": FIRST
    });
    let response = dispatcher.handle_json(&customer_add.to_string()).await;
    assert_eq!(response["ok"], false);
    assert_eq!(response["error_kind"], "unauthorized");
}

#[tokio::test]
async fn test_serve_answers_one_line_per_request() -> Result<()> {
    let dispatcher = dispatcher(Arc::new(InMemoryOrderStore::new()));

    let input = format!(
        "{}\n\n{}\n",
        staff_request(
            "add_tracking_number",
            json!({"order_id": "1", "tracking_number": FIRST})
        ),
        staff_request("list_tracking_numbers", json!({"order_id": "1"}))
    );
    let mut output: Vec<u8> = Vec::new();

    let served = dispatcher
        .serve(BufReader::new(input.as_bytes()), &mut output)
        .await?;
    assert_eq!(served, 2);

    let text = String::from_utf8(output)?;
    let responses: Vec<Value> = text
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["ok"], true);
    assert_eq!(responses[1]["tracking_numbers"][0]["number"], FIRST);
    Ok(())
}
