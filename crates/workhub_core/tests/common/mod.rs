#![allow(dead_code)]

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use workhub_core::adapter::portal_schemas;
use workhub_core::record::{
    FetchQuery, FetchResponse, FieldMap, MutationResponse, Record, RecordResponse, RecordResult,
    TransportResult,
};
use workhub_core::{LocalRecordStore, Portal, RecordClient, RecordId, RecordingNotifier, TransportError};

pub struct Harness {
    pub portal: Portal,
    pub notifier: Arc<RecordingNotifier>,
    pub client: Arc<ScriptedClient>,
}

/// Portal over an in-memory local store wrapped in a scriptable client.
pub fn harness() -> Harness {
    let store = LocalRecordStore::open_in_memory(portal_schemas()).unwrap();
    let client = Arc::new(ScriptedClient::new(store));
    let notifier = Arc::new(RecordingNotifier::new());
    let portal = Portal::new(client.clone(), notifier.clone());
    Harness {
        portal,
        notifier,
        client,
    }
}

/// Delegates to a local store unless told to fail.
pub struct ScriptedClient {
    inner: LocalRecordStore,
    fetch_failure: Mutex<Option<String>>,
    transport_down: Mutex<bool>,
    refused_deletes: Mutex<HashSet<RecordId>>,
    updates: Mutex<Vec<(String, Vec<Record>)>>,
}

impl ScriptedClient {
    pub fn new(inner: LocalRecordStore) -> Self {
        Self {
            inner,
            fetch_failure: Mutex::new(None),
            transport_down: Mutex::new(false),
            refused_deletes: Mutex::new(HashSet::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    /// Fetches answer `success: false` with `message` until cleared.
    pub fn fail_fetches(&self, message: Option<&str>) {
        *self.fetch_failure.lock() = message.map(str::to_string);
    }

    pub fn set_transport_down(&self, down: bool) {
        *self.transport_down.lock() = down;
    }

    /// Deletes of `id` are reported as failed and not applied.
    pub fn refuse_delete(&self, id: RecordId) {
        self.refused_deletes.lock().insert(id);
    }

    /// Every update request seen, oldest first.
    pub fn updates(&self) -> Vec<(String, Vec<Record>)> {
        self.updates.lock().clone()
    }

    fn check_transport(&self) -> TransportResult<()> {
        if *self.transport_down.lock() {
            return Err(TransportError::Status {
                status: 503,
                body: "service unavailable".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordClient for ScriptedClient {
    fn fetch_records(&self, collection: &str, query: &FetchQuery) -> TransportResult<FetchResponse> {
        self.check_transport()?;
        if let Some(message) = self.fetch_failure.lock().clone() {
            return Ok(FetchResponse {
                success: false,
                message: Some(message),
                data: Vec::new(),
            });
        }
        self.inner.fetch_records(collection, query)
    }

    fn get_record_by_id(
        &self,
        collection: &str,
        id: RecordId,
        fields: &[String],
    ) -> TransportResult<RecordResponse> {
        self.check_transport()?;
        self.inner.get_record_by_id(collection, id, fields)
    }

    fn create_records(
        &self,
        collection: &str,
        records: Vec<FieldMap>,
    ) -> TransportResult<MutationResponse> {
        self.check_transport()?;
        self.inner.create_records(collection, records)
    }

    fn update_records(
        &self,
        collection: &str,
        records: Vec<Record>,
    ) -> TransportResult<MutationResponse> {
        self.check_transport()?;
        self.updates
            .lock()
            .push((collection.to_string(), records.clone()));
        self.inner.update_records(collection, records)
    }

    fn delete_records(&self, collection: &str, ids: &[RecordId]) -> TransportResult<MutationResponse> {
        self.check_transport()?;
        let refused = self.refused_deletes.lock().clone();
        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            if refused.contains(id) {
                results.push(RecordResult::failed("delete refused", Vec::new()));
                continue;
            }
            let response = self.inner.delete_records(collection, &[*id])?;
            if !response.success {
                return Ok(response);
            }
            results.extend(response.results);
        }
        Ok(MutationResponse {
            success: true,
            message: None,
            results,
        })
    }
}
