//! HTTP/1.0 protocol implementation.
//!
//! One request per connection, GET only, no request headers read, no
//! `Content-Length` written: the body ends when the server closes the
//! connection.
//!
//! # Architecture
//!
//! - **`connection`**: per-connection state machine driving one request
//! - **`parser`**: request-line parsing and line framing
//! - **`request`**: the parsed request line
//! - **`path`**: web-root resolution and default-document substitution
//! - **`mime`**: content type from the file name
//! - **`response`**: status codes and response head serialization
//! - **`writer`**: `send_all`, which survives short writes
//!
//! # Connection State Machine
//!
//! ```text
//!   ReadingRequestLine ──(nothing read)──────────────┐
//!          │                                         │
//!          ▼                                         │
//!       Parsing ─────────(malformed)─────────────────┤
//!          │                                         │
//!          ▼                                         │
//!      Resolving ──(escapes root)──┐                 │
//!          │                       │                 │
//!          ▼                       │                 │
//!     OpeningFile ──(fails: 404)───┤                 │
//!          │ (found: 200)          ▼                 │
//!          └──────────────────► SendingHead          │
//!                                  │                 │
//!                         (200)    ▼                 │
//!                            SendingBody             │
//!                                  │                 │
//!                                  ▼                 ▼
//!                                Closed ◄────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use docroot::config::SiteConfig;
//! use docroot::http::connection::Connection;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let site = Arc::new(SiteConfig::new("/srv/www"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let site = Arc::clone(&site);
//!         tokio::spawn(async move {
//!             if let Err(e) = Connection::new(socket, site).run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod path;
pub mod request;
pub mod response;
pub mod writer;
