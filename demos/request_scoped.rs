//! Request-scoped logging in a simulated service.
//!
//! Each request passes through the same layers a web server would use:
//! attach the service logger, tag it with a request id, and turn on debug
//! output for a slice of requests. The handler never sees a logger
//! parameter; it logs through the context.
//!
//! The global level starts at `error`, so only the sampled requests print
//! their debug lines until the admin adapter lowers the level.
//!
//! Run with: cargo run --example request_scoped

use kvlog::prelude::*;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct Request {
    id: u64,
    path: String,
    headers: HashMap<&'static str, String>,
    context: Context,
}

async fn greet(req: &Request) -> String {
    let start = Instant::now();
    context::debug(
        &req.context,
        "handling request",
        &[
            Field::display("url", &req.path),
            Field::reflect("headers", &req.headers),
        ],
    );

    tokio::time::sleep(Duration::from_millis(5)).await;

    context::debug(
        &req.context,
        "request time",
        &[Field::duration("elapsed", start.elapsed())],
    );
    "Hello World!".to_string()
}

fn attach_logger(mut req: Request, logger: &Logger) -> Request {
    req.context = context::attach(&req.context, logger.clone());
    req
}

fn with_request_id(mut req: Request) -> Request {
    let request_id = req
        .headers
        .get("x-request-id")
        .cloned()
        .unwrap_or_else(|| format!("generated-{:04}", req.id));
    req.context = context::with(&req.context, &[Field::string("request_id", request_id)]);
    req
}

/// Debug output for one request in `every`.
fn change_log_level(mut req: Request, every: u64) -> Request {
    if req.id % every == 0 {
        req.context = context::with_level(&req.context, Level::Debug);
    }
    req
}

async fn serve(id: u64, logger: Logger) {
    let mut headers = HashMap::new();
    headers.insert("user-agent", "demo/1.0".to_string());
    if id % 2 == 0 {
        headers.insert("x-request-id", format!("client-{}", id));
    }

    let req = Request {
        id,
        path: format!("/greet?n={}", id),
        headers,
        context: Context::background(),
    };
    let req = change_log_level(with_request_id(attach_logger(req, &logger)), 5);

    let body = greet(&req).await;
    if body.is_empty() {
        context::error(&req.context, "empty response", &[]);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let level = AtomicLevel::new_at(Level::Error);
    let logger = Logger::production(&level);

    println!("--- level error, every 5th request at debug ---");
    let tasks: Vec<_> = (1..=10)
        .map(|id| tokio::spawn(serve(id, logger.clone())))
        .collect();
    for task in tasks {
        task.await.map_err(|e| LoggerError::config("demo", e.to_string()))?;
    }

    // What an HTTP handler mounted at /debug/log would forward.
    let response = level.serve("PUT", br#"{"level":"debug"}"#);
    println!("--- PUT /debug/log -> {} {} ---", response.status, response.body);

    serve(11, logger.clone()).await;

    let response = level.serve("GET", b"");
    println!("--- GET /debug/log -> {} {} ---", response.status, response.body);

    logger.sync()
}
