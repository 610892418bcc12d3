/*!
# Streaming event model for XML pipeline processors

This crate provides the event-model and streaming-filter foundation of an
XML pipeline evaluation engine: an XML infoset represented as a
forward-only sequence of typed tokens, and stateful 1:1 transformations
composed over that sequence without buffering whole documents.

## Pieces

* [`Event`]: closed set of XML infoset tokens, immutable once constructed.
* [`MatchedEvent`]: an [`Event`] plus a selection flag and optional channel
  label, used by branching/filtering stages.
* [`Stream`] / [`StreamFilter`] / [`Filtered`]: the pull contract, the
  one-in/one-out stage contract, and their composition. Chains of any
  depth preserve item count and order.
* [`NamespaceScopeTracker`]: a transparent filter resolving prefix→URI
  bindings in a single forward pass, under the grammar's deferred-closing
  semantics.
* [`Context`]: optional canonicalization of qualified names across
  producer streams (`shared_names` feature; `mt` makes it thread-safe for
  parallel pipeline branches).

## Example

```
use xpipe::{Event, Filtered, NamespaceScopeTracker, QName, Stream, StreamQueue};

let mut q = StreamQueue::new();
q.push(Event::start_sequence());
q.push(Event::start_document("doc.xml"));
q.push(Event::start_element(QName::from_qualified("x:root", Some("urn:example"))));
q.push(Event::namespace(Some("x"), "urn:example"));
q.push(Event::text("hello"));
q.push(Event::end_element(QName::from_qualified("x:root", Some("urn:example"))));
q.push(Event::end_document("doc.xml"));
q.push(Event::end_sequence());

let mut stream = Filtered::new(q, NamespaceScopeTracker::new());
let mut count = 0;
while let Some(ev) = stream.next() {
    if ev.is_text() {
        // binding in effect at this point of the pass
        assert_eq!(stream.filter().resolve("x"), Some("urn:example"));
    }
    count += 1;
}
assert_eq!(count, 8);
```

## What this crate is not

The actual XML parser and serializer, pipeline step implementations, and
pipeline graph scheduling live at the boundary; they produce and consume
these events but are separate concerns. The event grammar (see
[`event`]) is a precondition on producers, not something this crate
validates.
*/
pub mod context;
pub mod error;
pub mod event;
pub mod matched;
pub mod namespaces;
pub mod queue;
pub mod stream;


#[doc(inline)]
pub use context::Context;
#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use event::{AsEvent, Event, EventKind, QName, RcPtr, SharedQName};
#[doc(inline)]
pub use matched::MatchedEvent;
#[doc(inline)]
pub use namespaces::NamespaceScopeTracker;
#[doc(inline)]
pub use queue::StreamQueue;
#[doc(inline)]
pub use stream::{Filtered, Stream, StreamFilter};

pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
