//! Walks through the full platform workflow: token, public message, search,
//! private message, search again, channel.
//!
//! Run against the public platform, or pass a base URL to target a local
//! mock server:
//!
//! ```text
//! cargo run -p mock-server &
//! cargo run -p kwikdesk-core --example workflow -- http://127.0.0.1:3000
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use kwikdesk_core::{ApiError, BlockingClient, ClientConfig};

fn heading(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "-".repeat(title.len()));
}

fn main() -> Result<(), ApiError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut client = match std::env::args().nth(1) {
        Some(base_url) => BlockingClient::with_config(ClientConfig::with_base_url(&base_url), ""),
        None => BlockingClient::new(""),
    };

    let marker = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let public_message = format!("Token-Level Searchable Content {marker:x} #test");
    let private_message = format!("Private Channel-Only Content {marker:x} #test");

    println!("Workflow against {}", client.base_url());

    heading("Create a token for message and channel calls:");
    let token = client.create_token("YourAppName")?;
    println!("{:?}", token.envelope);

    heading("Post a searchable message tied to the token:");
    println!("{:?}", client.messages(&public_message, 100000, false)?);

    heading("Search for the new message:");
    println!("{:?}", client.search("#test")?.into_inner());

    heading("Post a private message that search must not return:");
    println!("{:?}", client.messages(&private_message, 100000, true)?);

    heading("Search again; the private message is absent:");
    println!("{:?}", client.search("#test")?.into_inner());

    heading("The channel lists the private message:");
    println!("{:?}", client.channel()?.into_inner());

    heading("Server time:");
    println!("{:?}", client.server_time()?);

    Ok(())
}
