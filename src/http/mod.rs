//! HTTP protocol implementation.
//!
//! A small HTTP/1.0 and HTTP/1.1 server side: no chunked bodies, no
//! pipelining, no ranges.
//!
//! # Architecture
//!
//! - **`bufio`**: buffered reads over a client stream, addressed by offsets
//! - **`parser`**: request line and header line parsing
//! - **`request`**: parsed request representation
//! - **`response`**: status codes and the response being accumulated
//! - **`writer`**: puts responses on the wire
//! - **`transaction`**: parses one request, dispatches it, answers it
//! - **`connection`**: runs transactions back to back on one client
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌──────────────────┐
//!   ┌──▶ │   Transacting    │ ← parse, dispatch, respond
//!   │    └──────┬───────────┘
//!   │           │ response sent
//!   │           ├─ keep-alive ──▶ Idle (compact buffer) ──┐
//!   │           └─ close / EOF / error ──▶ Closed         │
//!   └─────────────────────────────────────────────────────┘
//! ```

pub mod bufio;
pub mod connection;
pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod transaction;
pub mod writer;
