//! HTTP front end
//!
//! One thread per request; the proxy itself is immutable and shared.

use super::{ChatError, ChatProxy, ChatReply, FAILURE_REPLY};

use std::io::{Cursor, Read};
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Method, Request, Response, Server};

pub const CHAT_PATH: &str = "/api/chat";

/// Request bodies above this are rejected unread
const MAX_BODY: u64 = 64 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Chat,
    NotFound,
    MethodNotAllowed,
}

fn route(method: &Method, url: &str) -> Route {
    let path = url.split('?').next().unwrap_or(url);
    if path != CHAT_PATH {
        Route::NotFound
    } else if *method != Method::Post {
        Route::MethodNotAllowed
    } else {
        Route::Chat
    }
}

fn json_response(status: u16, reply: &ChatReply) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::to_vec(reply).unwrap_or_default();
    let mut response = Response::from_data(body).with_status_code(status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        response.add_header(header);
    }
    response
}

fn read_body(request: &mut Request) -> Result<Option<Vec<u8>>, ChatError> {
    let mut body = Vec::new();
    request.as_reader().take(MAX_BODY + 1).read_to_end(&mut body)?;
    Ok((body.len() as u64 <= MAX_BODY).then_some(body))
}

fn handle(proxy: &ChatProxy, mut request: Request) {
    let (status, reply) = match route(request.method(), request.url()) {
        Route::NotFound => (404, ChatReply::new("Not found")),
        Route::MethodNotAllowed => (405, ChatReply::new("Method not allowed")),
        Route::Chat => match read_body(&mut request) {
            Ok(Some(body)) => proxy.handle(&body),
            Ok(None) => (413, ChatReply::new("Request body too large")),
            Err(e) => {
                log::error!("failed to read request body: {}", e);
                (500, ChatReply::new(FAILURE_REPLY))
            },
        },
    };

    log::debug!("{} {} -> {}", request.method(), request.url(), status);
    if let Err(e) = request.respond(json_response(status, &reply)) {
        log::warn!("failed to send response: {}", e);
    }
}

/// Bind the listening socket
pub fn bind(addr: &str) -> Result<Server, ChatError> {
    Server::http(addr).map_err(|e| ChatError::Bind {
        addr: addr.to_string(),
        reason: e.to_string(),
    })
}

/// Serve requests until the server is dropped
pub fn serve(server: Server, proxy: Arc<ChatProxy>) {
    for request in server.incoming_requests() {
        let proxy = Arc::clone(&proxy);
        thread::spawn(move || handle(&proxy, request));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{
        Choice, ChoiceMessage, CompletionClient, CompletionRequest, CompletionResponse, Resume,
    };

    struct Echo;

    impl CompletionClient for Echo {
        fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
            let last = request.messages.last().map(|m| m.content.clone());
            Ok(CompletionResponse {
                choices: vec![Choice {
                    message: Some(ChoiceMessage { content: last }),
                }],
            })
        }
    }

    #[test]
    fn test_routes() {
        assert_eq!(route(&Method::Post, "/api/chat"), Route::Chat);
        assert_eq!(route(&Method::Post, "/api/chat?x=1"), Route::Chat);
        assert_eq!(route(&Method::Get, "/api/chat"), Route::MethodNotAllowed);
        assert_eq!(route(&Method::Post, "/api/chat/"), Route::NotFound);
        assert_eq!(route(&Method::Get, "/"), Route::NotFound);
    }

    #[test]
    fn test_json_response_shape() {
        let response = json_response(404, &ChatReply::new("Not found"));
        assert_eq!(response.status_code().0, 404);
        assert!(response
            .headers()
            .iter()
            .any(|h| h.field.equiv("Content-Type") && h.value.as_str() == "application/json"));
    }

    #[test]
    fn test_serves_chat_over_http() {
        let server = bind("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let resume = Resume::builtin().unwrap();
        let proxy = Arc::new(ChatProxy::new(Box::new(Echo), "echo", &resume));
        thread::spawn(move || serve(server, proxy));

        let url = format!("http://{}{}", addr, CHAT_PATH);
        let reply: ChatReply = ureq::post(&url)
            .send_json(serde_json::json!({ "message": "ping" }))
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(reply.message, "ping");

        match ureq::get(&url).call() {
            Err(ureq::Error::Status(405, response)) => {
                let reply: ChatReply = response.into_json().unwrap();
                assert_eq!(reply.message, "Method not allowed");
            },
            other => panic!("expected 405, got {:?}", other.map(|r| r.status())),
        }

        match ureq::post(&format!("http://{}/nope", addr)).send_string("{}") {
            Err(ureq::Error::Status(404, _)) => {},
            other => panic!("expected 404, got {:?}", other.map(|r| r.status())),
        }

        // A body of exactly the limit is still answered
        let envelope = r#"{"message":""}"#.len();
        let text = "a".repeat(MAX_BODY as usize - envelope);
        let at_limit = format!(r#"{{"message":"{}"}}"#, text);
        assert_eq!(at_limit.len() as u64, MAX_BODY);
        let reply: ChatReply = ureq::post(&url)
            .set("Content-Type", "application/json")
            .send_string(&at_limit)
            .unwrap()
            .into_json()
            .unwrap();
        assert_eq!(reply.message, text);

        let oversized = format!(r#"{{"message":"{}"}}"#, "a".repeat(100 * 1024));
        match ureq::post(&url).set("Content-Type", "application/json").send_string(&oversized) {
            Err(ureq::Error::Status(413, response)) => {
                let body = response.into_string().unwrap();
                assert_eq!(body, r#"{"message":"Request body too large"}"#);
            },
            other => panic!("expected 413, got {:?}", other.map(|r| r.status())),
        }
    }
}
