//! docroot - minimal concurrent HTTP/1.0 file server
//!
//! Every connection carries one request line; the server answers with the
//! requested file under the web root or an empty 404, then closes.

pub mod config;
pub mod http;
pub mod server;
