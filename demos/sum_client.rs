//! Calls, a notification and a batch against a tiny in-process server
//!
//! The server answers batches in reverse order to show that the client puts
//! the responses back in request order.
//!
//! Run with: cargo run --example sum_client

use jrhttp::core::codec;
use jrhttp::{BatchRequest, ClientBuilder, Request, Response};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Serialize)]
struct SumParams {
    a: i64,
    b: i64,
}

fn answer(request: &Request) -> Option<Value> {
    let id = request.id()?.clone();
    let response = match request.method() {
        "sum" => {
            let params = request.params();
            let total: i64 = match params {
                Value::Array(items) => items.iter().filter_map(Value::as_i64).sum(),
                Value::Object(map) => map.values().filter_map(Value::as_i64).sum(),
                _ => 0,
            };
            Response::success(json!(total), id)
        }
        other => Response::error(
            jrhttp::core::RpcErrorData::new(-32601, format!("Method not found: {}", other)),
            id,
        ),
    };
    Some(response.to_value())
}

async fn handle(mut socket: TcpStream) -> Result<(), Box<dyn std::error::Error>> {
    let mut raw = Vec::new();
    let mut chunk = [0u8; 4096];
    let body = loop {
        let n = socket.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        raw.extend_from_slice(&chunk[..n]);
        if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&raw[..pos]).to_string();
            let length: usize = head
                .lines()
                .find_map(|l| l.strip_prefix("Content-Length: "))
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0);
            if raw.len() >= pos + 4 + length {
                break raw[pos + 4..pos + 4 + length].to_vec();
            }
        }
    };

    let reply = if body.first() == Some(&b'[') {
        let requests = codec::decode_batch_requests(&body)?;
        println!("[SERVER] batch of {}", requests.len());
        let mut replies: Vec<Value> = requests.iter().filter_map(answer).collect();
        replies.reverse();
        if replies.is_empty() {
            return Ok(());
        }
        Value::Array(replies)
    } else {
        let request = codec::decode_request(&body)?;
        println!("[SERVER] {}", request.method());
        match answer(&request) {
            Some(reply) => reply,
            None => return Ok(()),
        }
    };

    let reply = serde_json::to_vec(&reply)?;
    socket
        .write_all(b"HTTP/1.0 200 OK\r\nContent-Type: application/json\r\n\r\n")
        .await?;
    socket.write_all(&reply).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new("jrhttp_client=debug"))
        .init();

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let url = format!("http://demo:secret@{}/rpc", listener.local_addr()?);
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                if let Err(e) = handle(socket).await {
                    eprintln!("[SERVER] {}", e);
                }
            });
        }
    });

    let client = ClientBuilder::new(url)
        .timeout(Duration::from_secs(5))
        .build()?;

    let response = client.call("sum", [2, 3]).await?;
    println!("[CLIENT] sum(2, 3) = {:?}", response.result());

    let response = client.call("sum", SumParams { a: 40, b: 2 }).await?;
    println!("[CLIENT] sum(a=40, b=2) = {:?}", response.result());

    let response = client.call("divide", [1, 0]).await?;
    if let Some(error) = response.error_data() {
        println!("[CLIENT] divide failed on the server: {}", error);
    }

    client
        .notify(Request::notification("log", json!(["demo finished the calls"]))?)
        .await?;

    let mut batch = BatchRequest::new();
    let first = batch.add_call("sum", [1, 1])?;
    batch.add_notification("log", json!(["inside a batch"]))?;
    let second = batch.add_call("sum", [10, 20])?;

    let reply = client.batch(batch).await?;
    for response in reply.responses() {
        println!("[CLIENT] {} => {:?}", response.id(), response.result());
    }
    assert_eq!(reply.responses()[0].id(), &first);
    assert_eq!(reply.responses()[1].id(), &second);

    Ok(())
}
