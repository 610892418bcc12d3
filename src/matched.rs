/*!
# Match-flagged events

Branching and filtering stages need to tag events as selected or not
without copying the underlying [`Event`]. [`MatchedEvent`] is that
decoration: one event, a boolean `matched` flag, and an optional channel
label used by branching constructs to steer events to alternate downstream
paths.
*/
use std::fmt;

use smartstring::alias::String as SmartString;

use crate::event::{AsEvent, Event};

/**
# Event with selection flag

Wraps one [`Event`] together with a `matched` flag and an optional channel
label. Freshly wrapped events are matched; an absent channel means the
event belongs to all channels.

The setters mutate in place and return `&mut Self`, so selection stages can
tag events fluently while passing them through.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEvent {
	event: Event,
	matched: bool,
	channel: Option<SmartString>,
}

impl MatchedEvent {
	/// Wrap an event; the matched flag defaults to `true`.
	pub fn new(event: Event) -> MatchedEvent {
		MatchedEvent {
			event,
			matched: true,
			channel: None,
		}
	}

	/// Wrap an event with an explicit matched flag.
	pub fn with_matched(event: Event, matched: bool) -> MatchedEvent {
		MatchedEvent {
			event,
			matched,
			channel: None,
		}
	}

	/// Return the wrapped event.
	pub fn event(&self) -> &Event {
		&self.event
	}

	/// Unwrap into the underlying event, discarding flag and channel.
	pub fn into_event(self) -> Event {
		self.event
	}

	/// Set the matched flag.
	pub fn set_matched(&mut self, matched: bool) -> &mut MatchedEvent {
		self.matched = matched;
		self
	}

	pub fn is_matched(&self) -> bool {
		self.matched
	}

	/// Channel label, if the event has been routed to a specific channel.
	///
	/// `None` means the event belongs to all channels.
	pub fn channel(&self) -> Option<&str> {
		self.channel.as_deref()
	}

	/// Set or clear the channel label.
	pub fn set_channel<C: Into<SmartString>>(&mut self, channel: Option<C>) -> &mut MatchedEvent {
		self.channel = channel.map(|c| c.into());
		self
	}
}

impl From<Event> for MatchedEvent {
	fn from(event: Event) -> MatchedEvent {
		MatchedEvent::new(event)
	}
}

impl AsEvent for MatchedEvent {
	fn event(&self) -> &Event {
		&self.event
	}
}

impl fmt::Display for MatchedEvent {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		write!(f, "{};{}", self.event, self.matched)
	}
}
