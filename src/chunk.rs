/*
Chunked Processing Protocol
===========================

Every generator in this crate produces output through the same calling
convention: the caller hands over full-length input streams plus a read
offset, and the generator emits at most MAX_CHUNK_SIZE samples into its
own buffers, returning slices whose length is the count it actually
produced. The caller loops, advancing the offset by the produced count,
until the whole request is satisfied:

    let mut done = 0;
    while done < note.len() {
        let out = osc.process(rate, &note, &shape, done);
        if out.len() == 0 { break; }
        sink.extend_from_slice(out.saw);
        done += out.len();
    }

Two guarantees make this protocol usable:

  1. Chunking is invisible. Output for samples [offset, offset + n) is
     bit-identical to what a single unbounded call over the same span
     would produce from the same starting state. The bound is purely a
     buffering concern, never an approximation.

  2. Partial calls leave exactly the state needed to continue. Phase
     accumulators, envelope levels, and filter integrators advance only
     for the samples actually emitted.

A call whose offset is at or past the end of the shortest input stream
produces zero samples and mutates nothing.

The bound itself is a compromise: large enough that per-call overhead
disappears against per-sample work, small enough that a generator's
resident buffers stay a few kilobytes.
*/

/// Most samples any single process call will produce.
pub const MAX_CHUNK_SIZE: usize = 256;

/// How many samples a process call starting at `offset` will produce,
/// given the lengths of its input streams.
///
/// The shortest stream bounds the request (mismatched lengths are the
/// caller's concern; the engines simply never read past the shortest),
/// and [MAX_CHUNK_SIZE] bounds the reply.
pub fn span(offset: usize, lens: &[usize]) -> usize {
    let shortest = lens.iter().copied().min().unwrap_or(0);
    shortest.saturating_sub(offset).min(MAX_CHUNK_SIZE)
}

/// Drive a chunked process call to completion.
///
/// `produce` is called with the current offset and returns the number of
/// samples it emitted; the loop ends when `total` samples have been
/// produced or `produce` reports zero. Returns the total produced.
///
/// Not for audio callbacks - this is a convenience for offline rendering
/// and tests, and it logs its progress.
pub fn drive(total: usize, mut produce: impl FnMut(usize) -> usize) -> usize {
    let mut done = 0;
    while done < total {
        let produced = produce(done);
        if produced == 0 {
            break;
        }
        done += produced;
        log::trace!("chunk complete: {done}/{total} samples");
    }
    done
}
