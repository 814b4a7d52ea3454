use std::time::Duration;

use serde_json::json;
use sseline::config::Config;
use sseline::{EventSender, HandlerError, Payload, Request, Route, RouteTable};
use tracing_subscriber::EnvFilter;

async fn hello(_req: Request) -> Result<Payload, HandlerError> {
    Ok(Payload::from(json!({"message": "Hello, World!"})))
}

async fn greet(req: Request) -> Result<Payload, HandlerError> {
    let name = req
        .path_param("name")
        .ok_or_else(|| HandlerError::bad_request("missing name"))?;
    Ok(Payload::from(json!({"message": format!("Hello, {name}!")})))
}

async fn counter(req: Request, events: EventSender) -> anyhow::Result<()> {
    let limit = match req.query_param("limit") {
        Some(raw) => raw.parse::<u32>()?,
        None => 5,
    };

    for i in 0..limit {
        if events.send(json!({"count": i})).await.is_err() {
            break;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;

    let routes = RouteTable::new(vec![
        Route::unary("/hello", "GET", hello)?,
        Route::unary("/hello/{name}", "GET", greet)?,
        Route::stream("/counter", "GET", counter)?,
    ]);

    tokio::select! {
        res = sseline::server::run(&cfg, routes) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
