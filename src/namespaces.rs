/*!
# Namespace scope tracking

This module implements the resolution of namespace prefixes to URIs during
a single forward pass over an event stream, as described in Namespaces for
XML 1.0. The [`NamespaceScopeTracker`] is a transparent
[`StreamFilter`](crate::StreamFilter): it forwards every item unchanged and
only maintains the stack of prefix→URI scope frames on the side, so that
any collaborator positioned at or after it in the same chain can ask for
the binding in effect *at that point* of the pass.

## Deferred closing

The event grammar closes an element's scope with the `END_ELEMENT` event
itself, but that very event (and queries made while it is the most recently
processed item) must still see the element's own bindings. The tracker
therefore never pops a frame while processing the `END_ELEMENT`; it records
the close and performs the pop at the start of the *next* `process` call,
whatever that item's kind. This one-event hysteresis is modeled as an
explicit two-state machine rather than a side flag.
*/
use std::collections::HashMap;

use smartstring::alias::String as SmartString;

use crate::event::{AsEvent, Event};
use crate::stream::StreamFilter;

/// State of the innermost scope frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeState {
	/// No deferred work.
	Clean,
	/// The innermost frame is logically closed but still on the stack,
	/// awaiting removal at the start of the next `process` call.
	PendingPop,
}

/**
# Prefix→URI scope tracker

A stateful, transparent stream filter resolving namespace prefixes against
the scopes opened by the elements currently on the path from the root to
the most recently processed event.

State transitions per processed item, in this fixed order:

1. If a pop is pending, remove the innermost frame. This runs
   unconditionally, before the new item is inspected.
2. `START_ELEMENT` pushes a fresh empty frame; `END_ELEMENT` marks the
   innermost frame as pending; `NAMESPACE` inserts its binding into the
   innermost frame (the one pushed by the immediately preceding
   `START_ELEMENT`, per the event grammar). All other kinds leave the
   stack untouched.
3. The item is returned unchanged.

The tracker is exclusively owned by the single chain driving it; it holds
no more state than the active scope depth plus the pending-pop marker.

## Non-conformant input

The tracker does not validate the event grammar. A `NAMESPACE` event
arriving with no open frame is ignored. If a stream is truncated right
after an `END_ELEMENT`, the deferred pop stays pending until
[`close()`](StreamFilter::close) settles it; on a conformant stream the
following event (at least the `END_DOCUMENT`) always settles it earlier.
*/
pub struct NamespaceScopeTracker {
	scopes: Vec<HashMap<SmartString, SmartString>>,
	state: ScopeState,
}

impl NamespaceScopeTracker {
	/// Create a tracker with an empty scope stack.
	pub fn new() -> NamespaceScopeTracker {
		NamespaceScopeTracker {
			scopes: Vec::new(),
			state: ScopeState::Clean,
		}
	}

	/// Resolve a prefix against the scopes in effect after the most
	/// recently processed item.
	///
	/// Frames are searched innermost→outermost; the first binding wins.
	/// `None` means the prefix is not bound anywhere on the stack, which
	/// is an expected outcome (e.g. no default namespace declared), not an
	/// error.
	///
	/// Pass the empty prefix to resolve the default namespace.
	pub fn resolve(&self, prefix: &str) -> Option<&str> {
		for scope in self.scopes.iter().rev() {
			if let Some(uri) = scope.get(prefix) {
				return Some(uri);
			}
		}
		None
	}

	/// Number of frames currently on the stack, including a frame whose
	/// pop is still pending.
	pub fn depth(&self) -> usize {
		self.scopes.len()
	}

	/// Whether the innermost frame is logically closed and awaiting
	/// removal.
	pub fn has_pending_pop(&self) -> bool {
		self.state == ScopeState::PendingPop
	}

	/// Perform a deferred pop, if one is pending.
	fn settle(&mut self) {
		if self.state == ScopeState::PendingPop {
			self.scopes.pop();
			self.state = ScopeState::Clean;
		}
	}
}

impl Default for NamespaceScopeTracker {
	fn default() -> NamespaceScopeTracker {
		NamespaceScopeTracker::new()
	}
}

impl<T: AsEvent> StreamFilter<T> for NamespaceScopeTracker {
	fn process(&mut self, item: T) -> T {
		self.settle();
		match item.event() {
			Event::StartElement(..) => {
				self.scopes.push(HashMap::new());
			}
			Event::EndElement(..) => {
				// defer the pop to the next call, so the closing scope
				// stays queryable while this event is the current one
				self.state = ScopeState::PendingPop;
			}
			Event::Namespace { prefix, uri } => {
				if let Some(scope) = self.scopes.last_mut() {
					scope.insert(prefix.clone(), uri.clone());
				}
			}
			_ => (),
		}
		item
	}

	/// Settle a pending pop so an abandoned or truncated pass does not
	/// leave a logically-closed frame on the stack.
	///
	/// Frames of elements that were never closed remain; no event closed
	/// them.
	fn close(&mut self) {
		self.settle();
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use crate::event::QName;
	use crate::matched::MatchedEvent;

	fn elem(name: &str) -> QName {
		QName::new(name, None, None)
	}

	fn feed(tracker: &mut NamespaceScopeTracker, ev: Event) {
		let _ = StreamFilter::<Event>::process(tracker, ev);
	}

	/// Nested redeclaration of the same prefix: innermost wins, and pops
	/// resolve one event late.
	#[test]
	fn scope_resolution_round_trip() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_sequence());
		feed(&mut t, Event::start_document("d"));
		assert_eq!(t.resolve("p"), None);

		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		assert_eq!(t.resolve("p"), Some("urn:x"));

		feed(&mut t, Event::start_element(elem("b")));
		feed(&mut t, Event::namespace(Some("p"), "urn:y"));
		assert_eq!(t.resolve("p"), Some("urn:y"));

		feed(&mut t, Event::end_element(elem("b")));
		// b's frame is logically closed but still queryable
		assert_eq!(t.resolve("p"), Some("urn:y"));
		assert!(t.has_pending_pop());

		feed(&mut t, Event::end_element(elem("a")));
		// processing a's close settled b's pending pop first
		assert_eq!(t.resolve("p"), Some("urn:x"));

		feed(&mut t, Event::end_document("d"));
		// a's pending pop settled by the document close
		assert_eq!(t.resolve("p"), None);
		assert_eq!(t.depth(), 0);

		feed(&mut t, Event::end_sequence());
		assert_eq!(t.depth(), 0);
	}

	#[test]
	fn unbound_prefix_resolves_to_none() {
		let mut t = NamespaceScopeTracker::new();
		assert_eq!(t.resolve("p"), None);
		assert_eq!(t.resolve(""), None);
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::text("no namespaces anywhere"));
		assert_eq!(t.resolve("p"), None);
		assert_eq!(t.resolve(""), None);
	}

	#[test]
	fn default_namespace_uses_the_empty_prefix() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(None, "urn:default"));
		assert_eq!(t.resolve(""), Some("urn:default"));
		assert_eq!(t.resolve("p"), None);
	}

	#[test]
	fn consecutive_closes_settle_one_event_apart() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:outer"));
		feed(&mut t, Event::start_element(elem("b")));
		feed(&mut t, Event::namespace(Some("p"), "urn:inner"));

		feed(&mut t, Event::end_element(elem("b")));
		assert_eq!(t.resolve("p"), Some("urn:inner"));
		feed(&mut t, Event::end_element(elem("a")));
		assert_eq!(t.resolve("p"), Some("urn:outer"));
		feed(&mut t, Event::end_document("d"));
		assert_eq!(t.resolve("p"), None);
		assert_eq!(t.depth(), 0);
	}

	#[test]
	fn sibling_scope_does_not_leak_into_the_next_sibling() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("root")));
		feed(&mut t, Event::start_element(elem("first")));
		feed(&mut t, Event::namespace(Some("p"), "urn:first"));
		feed(&mut t, Event::end_element(elem("first")));
		feed(&mut t, Event::start_element(elem("second")));
		assert_eq!(t.resolve("p"), None);
	}

	#[test]
	fn other_kinds_do_not_touch_the_stack() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		feed(&mut t, Event::attribute(elem("id"), "1"));
		feed(&mut t, Event::text("data"));
		feed(&mut t, Event::pi("tgt", "d"));
		feed(&mut t, Event::comment("c"));
		assert_eq!(t.depth(), 1);
		assert_eq!(t.resolve("p"), Some("urn:x"));
	}

	#[test]
	fn close_settles_a_pending_pop_on_a_truncated_stream() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		feed(&mut t, Event::end_element(elem("a")));
		// stream ends here, non-conformant: no trailing event settles the pop
		assert!(t.has_pending_pop());
		assert_eq!(t.depth(), 1);
		StreamFilter::<Event>::close(&mut t);
		assert!(!t.has_pending_pop());
		assert_eq!(t.depth(), 0);
		assert_eq!(t.resolve("p"), None);
	}

	#[test]
	fn close_leaves_frames_of_unclosed_elements() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		StreamFilter::<Event>::close(&mut t);
		assert_eq!(t.depth(), 1);
		assert_eq!(t.resolve("p"), Some("urn:x"));
	}

	#[test]
	fn namespace_without_open_frame_is_ignored() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		assert_eq!(t.depth(), 0);
		assert_eq!(t.resolve("p"), None);
	}

	#[test]
	fn tracker_observes_through_matched_event_wrappers() {
		let mut t = NamespaceScopeTracker::new();
		let mut feed_wrapped = |ev: Event| {
			let _ = t.process(MatchedEvent::new(ev));
		};
		feed_wrapped(Event::start_element(elem("a")));
		feed_wrapped(Event::namespace(Some("p"), "urn:x"));
		assert_eq!(t.resolve("p"), Some("urn:x"));
	}

	#[test]
	fn rebinding_within_one_frame_keeps_the_last_value() {
		let mut t = NamespaceScopeTracker::new();
		feed(&mut t, Event::start_element(elem("a")));
		feed(&mut t, Event::namespace(Some("p"), "urn:x"));
		feed(&mut t, Event::namespace(Some("p"), "urn:z"));
		assert_eq!(t.resolve("p"), Some("urn:z"));
	}
}
