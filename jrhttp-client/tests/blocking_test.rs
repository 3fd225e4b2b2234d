//! Blocking client integration tests
//!
//! The mock server runs on its own multi-threaded runtime while the blocking
//! client drives its calls from the test thread.

mod common;

use common::{echo_params, MockHttpServer, MockReply};
use jrhttp_client::blocking::HttpClient;
use jrhttp_client::BatchRequest;
use jrhttp_core::{Error, Id, Request};
use serde_json::json;
use std::time::Duration;
use tokio::runtime::Runtime;

#[test]
fn test_blocking_call() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockHttpServer::with_handler(echo_params));

    let client = HttpClient::new(&server.url()).unwrap();
    let response = client.call("sum", [2, 3]).unwrap();

    assert_eq!(response.id(), &Id::Number(1));
    assert_eq!(response.result(), Some(&json!([2, 3])));

    rt.block_on(server.shutdown());
}

#[test]
fn test_blocking_batch_and_notify() {
    let rt = Runtime::new().unwrap();
    let mut server = rt.block_on(MockHttpServer::with_handler(echo_params));

    let client = HttpClient::new(&server.url()).unwrap();

    let mut batch = BatchRequest::new();
    batch.add_call("a", json!(["x"])).unwrap();
    batch.add_call("b", json!(["y"])).unwrap();
    let reply = client.batch(batch).unwrap();
    assert_eq!(reply.responses()[0].result(), Some(&json!(["x"])));
    assert_eq!(reply.responses()[1].result(), Some(&json!(["y"])));

    client
        .notify(Request::notification("log", json!([])).unwrap())
        .unwrap();

    rt.block_on(async {
        assert!(server.wait_for_message().await.is_some());
        let notification = server.wait_for_message().await.unwrap();
        assert!(notification.json().get("id").is_none());
    });

    rt.block_on(server.shutdown());
}

#[test]
fn test_blocking_timeout() {
    let rt = Runtime::new().unwrap();
    let server = rt.block_on(MockHttpServer::replying(MockReply::Stall));

    let mut client = HttpClient::new(&server.url()).unwrap();
    client.set_timeout(Duration::from_millis(150));

    let err = client.call("slow", ()).unwrap_err();
    assert!(matches!(err, Error::TransportTimeout(_)));

    rt.block_on(server.shutdown());
}
