//! Line-oriented request transport.
//!
//! A [`Dispatcher`] owns the action-name → handler table. It is built once at
//! startup and only read afterwards. Each request is one JSON object:
//!
//! ```json
//! {"action": "add_tracking_number", "caller": {"id": "u1", "roles": ["shop_manager"]},
//!  "order_id": "1042", "tracking_number": "9400 1000 0000 0000 0000 00"}
//! ```
//!
//! Every request gets exactly one JSON object back. Failures use the envelope
//! `{"ok": false, "error_kind": ..., "message": ...}`.

use crate::core::service::TrackingService;
use crate::domain::model::{Action, BulkAddResult, Caller, OrderId, TrackingView};
use crate::utils::error::{ErrorKind, Result, TrackingError};
use async_trait::async_trait;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

#[derive(Debug, Clone, Deserialize)]
pub struct TransportRequest {
    pub action: String,
    pub caller: Caller,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

/// Order ids arrive as JSON strings or integers depending on the platform.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireOrderId {
    Text(String),
    Number(Number),
}

impl WireOrderId {
    fn into_order_id(self) -> Result<OrderId> {
        match self {
            WireOrderId::Text(text) => OrderId::parse(&text),
            WireOrderId::Number(number) if !number.is_f64() => OrderId::parse(&number.to_string()),
            WireOrderId::Number(number) => Err(TrackingError::InvalidOrderId {
                value: number.to_string(),
            }),
        }
    }
}

/// Any integral JSON number is a position; values beyond `i64` saturate so they
/// miss every entry instead of failing to decode.
fn deserialize_index<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(index) = number.as_i64() {
        return Ok(index);
    }
    if number.as_u64().is_some() {
        return Ok(i64::MAX);
    }
    match number.as_f64() {
        Some(value) if value.fract() == 0.0 => Ok(value as i64),
        _ => Err(D::Error::custom("index must be an integer")),
    }
}

#[derive(Debug, Deserialize)]
struct AddOnePayload {
    order_id: WireOrderId,
    tracking_number: String,
}

#[derive(Debug, Deserialize)]
struct AddBulkPayload {
    order_id: WireOrderId,
    raw_block: String,
}

#[derive(Debug, Deserialize)]
struct DeleteAtPayload {
    order_id: WireOrderId,
    #[serde(deserialize_with = "deserialize_index")]
    index: i64,
}

#[derive(Debug, Deserialize)]
struct ListPayload {
    order_id: WireOrderId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddOneResponse {
    pub ok: bool,
    pub message: String,
    pub number: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddBulkResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub result: BulkAddResult,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteAtResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub ok: bool,
    pub tracking_numbers: Vec<TrackingView>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error_kind: ErrorKind,
    pub message: String,
}

impl From<&TrackingError> for ErrorResponse {
    fn from(e: &TrackingError) -> Self {
        Self {
            ok: false,
            error_kind: e.kind(),
            message: e.user_friendly_message(),
        }
    }
}

fn parse_payload<T: DeserializeOwned>(payload: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(payload)).map_err(|e| TrackingError::InvalidRequest {
        message: e.to_string(),
    })
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(
        &self,
        service: &TrackingService,
        caller: &Caller,
        payload: Map<String, Value>,
    ) -> Result<Value>;
}

pub struct AddOneHandler;
pub struct AddBulkHandler;
pub struct DeleteAtHandler;
pub struct ListHandler;

#[async_trait]
impl ActionHandler for AddOneHandler {
    async fn handle(
        &self,
        service: &TrackingService,
        caller: &Caller,
        payload: Map<String, Value>,
    ) -> Result<Value> {
        let request: AddOnePayload = parse_payload(payload)?;
        let order_id = request.order_id.into_order_id()?;
        let number = service
            .add_one(caller, &order_id, &request.tracking_number)
            .await?;
        Ok(serde_json::to_value(AddOneResponse {
            ok: true,
            message: "Tracking number added".to_string(),
            number,
        })?)
    }
}

#[async_trait]
impl ActionHandler for AddBulkHandler {
    async fn handle(
        &self,
        service: &TrackingService,
        caller: &Caller,
        payload: Map<String, Value>,
    ) -> Result<Value> {
        let request: AddBulkPayload = parse_payload(payload)?;
        let order_id = request.order_id.into_order_id()?;
        let result = service.add_bulk(caller, &order_id, &request.raw_block).await?;
        Ok(serde_json::to_value(AddBulkResponse { ok: true, result })?)
    }
}

#[async_trait]
impl ActionHandler for DeleteAtHandler {
    async fn handle(
        &self,
        service: &TrackingService,
        caller: &Caller,
        payload: Map<String, Value>,
    ) -> Result<Value> {
        let request: DeleteAtPayload = parse_payload(payload)?;
        let order_id = request.order_id.into_order_id()?;
        service.delete_at(caller, &order_id, request.index).await?;
        Ok(serde_json::to_value(DeleteAtResponse { ok: true })?)
    }
}

#[async_trait]
impl ActionHandler for ListHandler {
    async fn handle(
        &self,
        service: &TrackingService,
        caller: &Caller,
        payload: Map<String, Value>,
    ) -> Result<Value> {
        let request: ListPayload = parse_payload(payload)?;
        let order_id = request.order_id.into_order_id()?;
        let tracking_numbers = service.list(caller, &order_id).await?;
        Ok(serde_json::to_value(ListResponse {
            ok: true,
            tracking_numbers,
        })?)
    }
}

pub struct Dispatcher {
    service: TrackingService,
    handlers: HashMap<String, Box<dyn ActionHandler>>,
}

impl Dispatcher {
    /// Empty table; add actions with [`Dispatcher::register`].
    pub fn new(service: TrackingService) -> Self {
        Self {
            service,
            handlers: HashMap::new(),
        }
    }

    /// Table with the four tracking actions under their transport names.
    pub fn with_default_actions(service: TrackingService) -> Self {
        Self::new(service)
            .register(Action::AddOne.name(), AddOneHandler)
            .register(Action::AddBulk.name(), AddBulkHandler)
            .register(Action::DeleteAt.name(), DeleteAtHandler)
            .register(Action::List.name(), ListHandler)
    }

    pub fn register(mut self, name: &str, handler: impl ActionHandler + 'static) -> Self {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    pub fn actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub async fn dispatch(&self, request: TransportRequest) -> Result<Value> {
        let handler =
            self.handlers
                .get(&request.action)
                .ok_or_else(|| TrackingError::UnknownAction {
                    action: request.action.clone(),
                })?;
        tracing::debug!("Dispatching {} for caller {}", request.action, request.caller.id);
        handler
            .handle(&self.service, &request.caller, request.payload)
            .await
    }

    /// Decodes one JSON request and always produces one JSON response.
    pub async fn handle_json(&self, line: &str) -> Value {
        let outcome = match serde_json::from_str::<TransportRequest>(line) {
            Ok(request) => self.dispatch(request).await,
            Err(e) => Err(TrackingError::InvalidRequest {
                message: e.to_string(),
            }),
        };

        match outcome {
            Ok(value) => value,
            Err(e) => {
                if e.kind() == ErrorKind::Internal {
                    tracing::error!("❌ Request failed: {}", e);
                    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                } else {
                    tracing::debug!("Request rejected: {}", e);
                }
                serde_json::to_value(ErrorResponse::from(&e)).unwrap_or_else(|_| {
                    serde_json::json!({"ok": false, "error_kind": "internal", "message": e.to_string()})
                })
            }
        }
    }

    /// Serves newline-delimited requests until the reader is exhausted.
    /// Blank lines are ignored.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut served = 0;

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let response = self.handle_json(&line).await;
            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
            served += 1;
        }

        tracing::info!("Transport closed after {} requests", served);
        Ok(served)
    }
}
