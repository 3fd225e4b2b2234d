//! Blocking client from plain synchronous code
//!
//! Expects a JSON-RPC server on 127.0.0.1:8080 that implements `sum`.
//!
//! Run with: cargo run --example blocking_client

use jrhttp::client::blocking::HttpClient;
use jrhttp::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut client = HttpClient::new("http://127.0.0.1:8080/")?;
    client.set_timeout(Duration::from_secs(2));

    match client.call("sum", [2, 3]) {
        Ok(response) => println!("sum(2, 3) = {:?}", response.result()),
        Err(Error::Connection { message, code }) => {
            println!("no server listening ({}, os code {:?})", message, code)
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
