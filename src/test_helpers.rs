//! Scripted `HttpClient` double shared by unit tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use tokio::sync::oneshot;

use crate::config::ClientConfig;
use crate::net::api::AuthApi;
use crate::net::transport::{HttpClient, Transport, WireError, WireRequest, WireResponse};
use crate::net::types::User;
use crate::state::session::SessionStore;

pub enum Scripted {
    Reply(u16, String),
    Fail(String),
    Gate(oneshot::Receiver<WireResponse>),
}

/// Responses are queued per endpoint path and consumed in order. Unscripted
/// paths answer 404.
#[derive(Default)]
pub struct ScriptedClient {
    routes: RefCell<HashMap<String, VecDeque<Scripted>>>,
    requests: RefCell<Vec<WireRequest>>,
}

impl ScriptedClient {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn push(&self, path: &str, scripted: Scripted) {
        self.routes.borrow_mut().entry(path.to_owned()).or_default().push_back(scripted);
    }

    pub fn reply(&self, path: &str, status: u16, body: Value) {
        self.push(path, Scripted::Reply(status, body.to_string()));
    }

    pub fn reply_raw(&self, path: &str, status: u16, body: &str) {
        self.push(path, Scripted::Reply(status, body.to_owned()));
    }

    pub fn fail(&self, path: &str) {
        self.push(path, Scripted::Fail("connection refused".to_owned()));
    }

    /// Hold the next response on `path` until the returned sender fires.
    pub fn gate(&self, path: &str) -> oneshot::Sender<WireResponse> {
        let (tx, rx) = oneshot::channel();
        self.push(path, Scripted::Gate(rx));
        tx
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|r| r.url.ends_with(path)).count()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for ScriptedClient {
    async fn execute(&self, request: WireRequest) -> Result<WireResponse, WireError> {
        self.requests.borrow_mut().push(request.clone());
        let next = {
            let mut routes = self.routes.borrow_mut();
            routes
                .iter_mut()
                .find(|(path, _)| request.url.ends_with(path.as_str()))
                .and_then(|(_, queue)| queue.pop_front())
        };
        match next {
            Some(Scripted::Reply(status, body)) => Ok(WireResponse { status, body }),
            Some(Scripted::Fail(msg)) => Err(WireError(msg)),
            Some(Scripted::Gate(rx)) => rx.await.map_err(|_| WireError("gate dropped".to_owned())),
            None => Ok(WireResponse { status: 404, body: String::new() }),
        }
    }
}

pub fn response(status: u16, body: Value) -> WireResponse {
    WireResponse { status, body: body.to_string() }
}

pub fn test_config() -> ClientConfig {
    ClientConfig::with_base_url("http://test.local/api")
}

pub fn transport(client: &Rc<ScriptedClient>) -> Rc<Transport> {
    Rc::new(Transport::new(test_config(), client.clone()))
}

pub fn api(client: &Rc<ScriptedClient>) -> AuthApi {
    AuthApi::new(transport(client))
}

pub fn store(client: &Rc<ScriptedClient>) -> SessionStore {
    SessionStore::new(transport(client))
}

pub fn alice() -> User {
    User {
        id: None,
        username: "alice".to_owned(),
        name: "Alice".to_owned(),
        email: "a@x.com".to_owned(),
        role: "USER".to_owned(),
    }
}

pub fn alice_json() -> Value {
    serde_json::json!({ "username": "alice", "name": "Alice", "email": "a@x.com", "role": "USER" })
}

pub fn expired_body() -> Value {
    serde_json::json!({
        "message": "토큰이 만료되었습니다. 다시 로그인해 주세요.",
        "status": 401,
        "error": "Expired JWT Token",
        "path": "/api/home"
    })
}
