//! Stream framer - turns fragmented chunks into exactly-sized blocks.
//!
//! The transport hands over chunks of whatever size the wire produced; the
//! decoder only ever wants the next block of a size it names. The framer
//! sits between them, buffering, coalescing, and splitting so the decoder
//! callback always receives exactly the byte count it asked for.
//!
//! The decoder drives sizing through a single mutable request cell,
//! [`ReadRequest`]: the dispatch callback receives a `&mut` borrow of it and
//! typically sets the size of the *next* block (and saves or clears the
//! header tag) before returning. The dispatch loop re-reads the cell after
//! every callback return, so those reentrant mutations take effect
//! immediately.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use wireframer::StreamFramer;
//!
//! let mut framer: StreamFramer<u16> = StreamFramer::new();
//! framer.request(2);
//!
//! let mut bodies = Vec::new();
//! framer.on_data(Bytes::from_static(b"\x00\x05hello\x00"), |block, tag, req| {
//!     match tag {
//!         // Body bytes arrive tagged with the header saved before them.
//!         Some(kind) => {
//!             bodies.push((kind, block));
//!             req.clear_header();
//!             req.request(2);
//!         }
//!         // Header: two bytes of big-endian body length.
//!         None => {
//!             let len = u16::from_be_bytes([block[0], block[1]]);
//!             req.save_header(len);
//!             req.request(usize::from(len));
//!         }
//!     }
//! });
//!
//! assert_eq!(bodies, vec![(5, Bytes::from_static(b"hello"))]);
//! assert_eq!(framer.pending_bytes(), 1); // first byte of the next header
//! ```

use bytes::Bytes;

use crate::pending::PendingQueue;

/// The framer's current read request: how many bytes the decoder wants next
/// and the header tag attached to every dispatch until cleared.
///
/// Inside the dispatch callback this borrow is the control surface back into
/// the framer; between deliveries the same calls are available on
/// [`StreamFramer`] directly.
#[derive(Debug)]
pub struct ReadRequest<H> {
    needed: usize,
    header: Option<H>,
}

impl<H> ReadRequest<H> {
    /// Set the size of the next block. `0` pauses dispatch: chunks are
    /// buffered but nothing is delivered until a positive request arrives.
    pub fn request(&mut self, n: usize) {
        self.needed = n;
    }

    /// The block size currently requested (`0` while paused).
    pub fn needed(&self) -> usize {
        self.needed
    }

    /// Attach a header tag to every following dispatch until cleared.
    /// A dispatch does not reset the tag.
    pub fn save_header(&mut self, tag: H) {
        self.header = Some(tag);
    }

    /// Drop the saved header tag; following dispatches carry `None`.
    pub fn clear_header(&mut self) {
        self.header = None;
    }

    /// The header tag currently saved, if any.
    pub fn header(&self) -> Option<&H> {
        self.header.as_ref()
    }
}

impl<H> Default for ReadRequest<H> {
    fn default() -> Self {
        Self {
            needed: 0,
            header: None,
        }
    }
}

/// Reassembles arbitrarily fragmented byte deliveries into blocks of
/// exactly the size the decoder requests.
///
/// Strictly serial and sans-I/O: the transport calls
/// [`on_data`](Self::on_data) once per arrived chunk, and every dispatch
/// happens synchronously inside that call. The framer owns every buffered
/// byte; a dispatched block is moved out and never referenced again.
///
/// The framer starts paused (`needed == 0`); callers issue the first
/// [`request`](Self::request) before (or while) data flows.
#[derive(Debug)]
pub struct StreamFramer<H> {
    pending: PendingQueue,
    request: ReadRequest<H>,
}

impl<H> StreamFramer<H> {
    /// Create a paused framer with nothing buffered.
    pub fn new() -> Self {
        Self {
            pending: PendingQueue::new(),
            request: ReadRequest::default(),
        }
    }

    /// Set the size of the next block. Pure state mutation: buffered bytes
    /// that already satisfy the new size are dispatched on the next
    /// delivery, not here.
    pub fn request(&mut self, n: usize) {
        self.request.request(n);
    }

    /// The block size currently requested (`0` while paused).
    pub fn needed(&self) -> usize {
        self.request.needed()
    }

    /// Attach a header tag to every following dispatch until cleared.
    pub fn save_header(&mut self, tag: H) {
        self.request.save_header(tag);
    }

    /// Drop the saved header tag.
    pub fn clear_header(&mut self) {
        self.request.clear_header();
    }

    /// The header tag currently saved, if any.
    pub fn header(&self) -> Option<&H> {
        self.request.header()
    }

    /// Advisory count of buffered bytes not yet dispatched. The framer
    /// never bounds this itself; callers wanting backpressure watch it.
    pub fn pending_bytes(&self) -> usize {
        self.pending.bytes()
    }

    /// Number of distinct buffered ranges (fragmentation indicator).
    pub fn pending_segments(&self) -> usize {
        self.pending.segments()
    }

    /// Feed one inbound chunk and dispatch every block it completes.
    ///
    /// `dispatch` is invoked synchronously, once per assembled block, with
    /// exactly the requested byte count, the header tag in effect when the
    /// block was selected, and the request cell to set up the next read.
    /// Zero-length chunks buffer nothing and never dispatch.
    pub fn on_data<F>(&mut self, mut chunk: Bytes, mut dispatch: F)
    where
        H: Clone,
        F: FnMut(Bytes, Option<H>, &mut ReadRequest<H>),
    {
        tracing::trace!(
            needed = self.request.needed,
            arrived = chunk.len(),
            buffered = self.pending.bytes(),
            "inbound chunk"
        );

        if chunk.is_empty() {
            return;
        }

        // Paused: buffer only.
        if self.request.needed == 0 {
            self.pending.push_back(chunk);
            return;
        }

        // Fast path - nothing buffered and this chunk alone covers the
        // request, so the block never touches the queue.
        if self.pending.is_empty() && chunk.len() >= self.request.needed {
            let block = chunk.split_to(self.request.needed);
            self.pending.push_back(chunk); // remainder, if any
            let tag = self.request.header.clone();
            dispatch(block, tag, &mut self.request);
        } else {
            self.pending.push_back(chunk);
        }

        // `needed` is re-read here: the fast-path callback may have moved
        // it, and a resized request changes what the head must hold.
        if self.request.needed > 0 {
            self.pending.coalesce_front(self.request.needed);
        }

        // Drain whole blocks off the head. The callback mutates the request
        // cell through the borrow it was handed, so both the size and the
        // tag are read fresh on every iteration.
        while self.request.needed > 0 {
            let Some(block) = self.pending.split_front(self.request.needed) else {
                break;
            };
            tracing::trace!(len = block.len(), "dispatching block");
            let tag = self.request.header.clone();
            dispatch(block, tag, &mut self.request);
        }
    }
}

impl<H> Default for StreamFramer<H> {
    fn default() -> Self {
        Self::new()
    }
}
