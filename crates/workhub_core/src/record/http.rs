//! HTTP client for a remote record service.
//!
//! Every operation is a JSON `POST` to `{base_url}/records/{collection}/{op}`
//! with an optional bearer token. No request timeout is configured, so a
//! hung call blocks its caller until the service answers.

use super::{
    FetchQuery, FetchResponse, FieldMap, MutationResponse, Record, RecordClient, RecordResponse,
    TransportError, TransportResult,
};
use crate::model::RecordId;
use log::debug;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::time::{Duration, Instant};

pub struct HttpRecordClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpRecordClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> TransportResult<Self> {
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, collection: &str, operation: &str) -> String {
        format!("{}/records/{collection}/{operation}", self.base_url)
    }

    fn post<B, R>(&self, collection: &str, operation: &str, body: &B) -> TransportResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let started_at = Instant::now();
        let mut request = self.client.post(self.endpoint(collection, operation)).json(body);
        if let Some(key) = self.api_key.as_deref() {
            request = request.bearer_auth(key);
        }

        let response = request.send()?;
        let status = response.status();
        debug!(
            "event=record_http module=record status={} collection={} op={} duration_ms={}",
            status.as_u16(),
            collection,
            operation,
            started_at.elapsed().as_millis()
        );
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text()?;
        serde_json::from_str(&text).map_err(|err| TransportError::Decode(err.to_string()))
    }
}

impl RecordClient for HttpRecordClient {
    fn fetch_records(
        &self,
        collection: &str,
        query: &FetchQuery,
    ) -> TransportResult<FetchResponse> {
        self.post(collection, "fetch", query)
    }

    fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        fields: &[String],
    ) -> TransportResult<RecordResponse> {
        self.post(collection, "get", &json!({ "RecordId": id, "fields": fields }))
    }

    fn create_records(
        &self,
        collection: &str,
        records: Vec<FieldMap>,
    ) -> TransportResult<MutationResponse> {
        self.post(collection, "create", &json!({ "records": records }))
    }

    fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> TransportResult<MutationResponse> {
        self.post(collection, "update", &json!({ "records": records }))
    }

    fn delete_records(
        &self,
        collection: &str,
        ids: &[RecordId],
    ) -> TransportResult<MutationResponse> {
        self.post(collection, "delete", &json!({ "RecordIds": ids }))
    }
}
