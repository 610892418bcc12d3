/*!
# Buffered stream source

Producers which do not generate items lazily (tests, step outputs collected
ahead of a pass) need a place to park items until a consumer pulls them.
[`StreamQueue`] is that source: items pushed in are yielded in FIFO order
through the [`Stream`](crate::Stream) contract.
*/
use std::collections::VecDeque;
use std::iter::FromIterator;

use crate::stream::Stream;

/**
# FIFO queue with stream semantics

Items are pushed by a producer and pulled by a consumer through
[`Stream::next`]. The end-of-stream rules are strict: once `next()` has
returned `None` (because the queue ran empty, or [`close()`] was called),
the queue is permanently ended; further pulls keep returning `None` and
further pushes panic, so a finished stream can never be resurrected.

   [`close()`]: StreamQueue::close
*/
pub struct StreamQueue<T> {
	q: VecDeque<T>,
	ended: bool,
}

impl<T> StreamQueue<T> {
	pub fn new() -> StreamQueue<T> {
		StreamQueue {
			q: VecDeque::new(),
			ended: false,
		}
	}

	/// Enqueue one item.
	///
	/// # Panics
	///
	/// If the stream has already ended, either through [`close()`] or by a
	/// pull draining the queue.
	///
	///    [`close()`]: StreamQueue::close
	pub fn push(&mut self, item: T) {
		if self.ended {
			panic!("cannot push into an ended stream");
		}
		self.q.push_back(item);
	}

	/// Mark the end of the stream.
	///
	/// Remaining queued items are discarded; the next pull returns `None`.
	pub fn close(&mut self) {
		self.ended = true;
		self.q.clear();
	}

	/// Number of items queued and not yet pulled.
	pub fn len(&self) -> usize {
		self.q.len()
	}

	pub fn is_empty(&self) -> bool {
		self.q.is_empty()
	}

	pub fn is_ended(&self) -> bool {
		self.ended
	}
}

impl<T> Default for StreamQueue<T> {
	fn default() -> StreamQueue<T> {
		StreamQueue::new()
	}
}

impl<T> Stream for StreamQueue<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		if self.ended {
			return None;
		}
		match self.q.pop_front() {
			Some(item) => Some(item),
			None => {
				self.ended = true;
				None
			}
		}
	}
}

impl<T> FromIterator<T> for StreamQueue<T> {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> StreamQueue<T> {
		StreamQueue {
			q: iter.into_iter().collect(),
			ended: false,
		}
	}
}

impl<T> Extend<T> for StreamQueue<T> {
	/// Enqueue all items from `iter`.
	///
	/// # Panics
	///
	/// If the stream has already ended.
	fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
		if self.ended {
			panic!("cannot push into an ended stream");
		}
		self.q.extend(iter);
	}
}
