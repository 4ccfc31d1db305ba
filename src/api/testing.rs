//! Scripted transport shared by the endpoint wrapper tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::Method;

use crate::config::{ClientConfig, Timeouts};
use crate::error::TransportError;
use crate::http::{ApiClient, HttpResponse, OutboundRequest, Transport};
use crate::session::{MemoryStorage, Role, Session, SessionStore};

pub const BASE: &str = "http://cms.test";

/// Replies with canned responses keyed by method and path; anything else is
/// a 404. Every request is recorded.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(Method, String), HttpResponse>>,
    seen: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    pub fn reply(&self, method: Method, path: &str, status: u16, body: &str) {
        self.replies
            .lock()
            .unwrap()
            .insert((method, path.to_owned()), HttpResponse::new(status, body));
    }

    pub fn seen(&self) -> Vec<OutboundRequest> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> OutboundRequest {
        self.seen().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: OutboundRequest) -> Result<HttpResponse, TransportError> {
        let path = request.url.strip_prefix(BASE).unwrap_or(&request.url).to_owned();
        let reply = self.replies.lock().unwrap().get(&(request.method.clone(), path)).cloned();
        self.seen.lock().unwrap().push(request);
        Ok(reply.unwrap_or_else(|| HttpResponse::new(404, r#"{"detail":"Not Found"}"#)))
    }
}

pub fn signed_in_client(role: Role) -> (ApiClient, Arc<ScriptedTransport>) {
    client(Some(Session::new("access-1", "refresh-1", "E1001", role)))
}

pub fn client(session: Option<Session>) -> (ApiClient, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::default());
    let store = Arc::new(SessionStore::open(Arc::new(MemoryStorage::new())));
    if let Some(session) = session {
        store.login(session).unwrap();
    }
    let config = ClientConfig::new(BASE, "unused.json", Timeouts::default()).unwrap();
    let client = ApiClient::new(config, transport.clone(), store, Arc::new(|| {}));
    (client, transport)
}
