//! Mini-message decoder demo.
//!
//! Drives the framer through the header-then-body pattern it exists for:
//! each message is a 6-byte header (u16 kind, u32 body length, big-endian)
//! followed by that many body bytes. The header is parsed once, saved as
//! the dispatch tag, and picked up again when the body completes, no matter
//! how the transport fragments the stream.
//!
//! Run with: `cargo run --example mini_decoder`

use bytes::Bytes;
use wireframer::{ReadRequest, StreamFramer};

const HEADER_LEN: usize = 6;

#[derive(Debug, Clone, Copy)]
struct MiniHeader {
    kind: u16,
    body_len: u32,
}

impl MiniHeader {
    fn parse(block: &[u8]) -> Self {
        Self {
            kind: u16::from_be_bytes([block[0], block[1]]),
            body_len: u32::from_be_bytes([block[2], block[3], block[4], block[5]]),
        }
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.kind.to_be_bytes());
        out.extend_from_slice(&self.body_len.to_be_bytes());
    }
}

fn handle(block: Bytes, tag: Option<MiniHeader>, req: &mut ReadRequest<MiniHeader>) {
    match tag {
        Some(header) => {
            println!(
                "message kind {} ({} body bytes): {:?}",
                header.kind,
                header.body_len,
                String::from_utf8_lossy(&block)
            );
            req.clear_header();
            req.request(HEADER_LEN);
        }
        None => {
            let header = MiniHeader::parse(&block);
            if header.body_len == 0 {
                println!("message kind {} (empty body)", header.kind);
                req.request(HEADER_LEN);
            } else {
                req.save_header(header);
                req.request(header.body_len as usize);
            }
        }
    }
}

fn main() {
    let mut framer = StreamFramer::new();
    framer.request(HEADER_LEN);

    let mut stream = Vec::new();
    for (kind, body) in [(1u16, &b"hello"[..]), (2, &b""[..]), (3, &b"framer"[..])] {
        MiniHeader {
            kind,
            body_len: body.len() as u32,
        }
        .encode_into(&mut stream);
        stream.extend_from_slice(body);
    }

    // Deliver in 4-byte slices so headers and bodies straddle chunks.
    for piece in stream.chunks(4) {
        framer.on_data(Bytes::copy_from_slice(piece), handle);
    }
}
