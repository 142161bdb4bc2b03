//! # wireframer
//!
//! A sans-I/O byte-stream framer: it sits between a transport that delivers
//! arbitrarily-sized byte chunks and a decoder that only understands
//! exactly-sized blocks.
//!
//! ## Architecture
//!
//! - **Inbound**: the transport calls [`StreamFramer::on_data`] once per
//!   arrived chunk, strictly serially.
//! - **Outbound**: the decoder callback receives each assembled block
//!   synchronously, with exactly the byte count it requested, plus an
//!   optional header tag carried across dispatches.
//! - **Control**: the decoder names the next block size with
//!   [`request`](StreamFramer::request) and threads context with
//!   [`save_header`](StreamFramer::save_header) /
//!   [`clear_header`](StreamFramer::clear_header), typically from inside
//!   the callback itself, via the [`ReadRequest`] borrow it is handed.
//!
//! The framer never parses block contents, never writes to the transport,
//! and never bounds its own memory; [`StreamFramer::pending_bytes`] is the
//! hook for caller-side backpressure.
//!
//! ## Example
//!
//! ```
//! use bytes::Bytes;
//! use wireframer::StreamFramer;
//!
//! let mut framer: StreamFramer<()> = StreamFramer::new();
//! framer.request(4);
//!
//! let mut blocks = Vec::new();
//! framer.on_data(Bytes::from_static(b"ab"), |block, _tag, _req| blocks.push(block));
//! assert!(blocks.is_empty()); // 2 of 4 bytes buffered
//!
//! framer.on_data(Bytes::from_static(b"cdef"), |block, _tag, req| {
//!     blocks.push(block);
//!     req.request(0); // pause
//! });
//! assert_eq!(blocks, vec![Bytes::from_static(b"abcd")]);
//! assert_eq!(framer.pending_bytes(), 2); // "ef" retained for later
//! ```

pub mod framer;
pub mod pending;

pub use framer::{ReadRequest, StreamFramer};
pub use pending::PendingQueue;
