/*!
# Infoset event model

This module defines the [`Event`] type, the unit of data flowing through a
pipeline: a single token describing a fragment of an XML document's logical
structure. Producers (parsers, step outputs) mint events through the factory
functions, filters pass them along unchanged or wrapped, and consumers
narrow them back to their kind-specific payloads.

Any conformant producer emits events according to this grammar:

```text
sequence := START_SEQUENCE, document*, END_SEQUENCE
document := START_DOCUMENT, (PI|COMMENT)*, element, (PI|COMMENT)*, END_DOCUMENT
element  := START_ELEMENT, NAMESPACE*, ATTRIBUTE*,
            (TEXT|element|PI|COMMENT)*, END_ELEMENT
```

The grammar is a precondition, not something this module enforces; checking
it belongs to a conformance-checking stage, if one exists.
*/
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(not(feature = "mt"))]
use std::rc::Rc;
#[cfg(feature = "mt")]
use std::sync::Arc;

use smartstring::alias::String as SmartString;

use crate::error::{Error, Result};

/// Wrapper pointer around shared qualified names
///
/// In builds with the `mt` feature, this is a [`Arc`]. In non-`mt` builds,
/// this is a [`std::rc::Rc`]
#[cfg(feature = "mt")]
pub type RcPtr<T> = Arc<T>;
/// Wrapper pointer around shared qualified names
///
/// In builds with the `mt` feature, this is a [`std::sync::Arc`].
/// In non-`mt` builds, this is a [`Rc`].
#[cfg(not(feature = "mt"))]
pub type RcPtr<T> = Rc<T>;

/// Refcounted qualified name as carried by events.
///
/// Cloning an event clones this pointer, not the name data. With the
/// `shared_names` feature, a [`crate::Context`] can dedup these across
/// events and streams.
pub type SharedQName = RcPtr<QName>;

/**
# Qualified name

A (namespace URI, local name, prefix) triple identifying an element or
attribute.

Two names are the same binding target if their local name and namespace URI
match; the prefix is carried for serialization only and takes no part in
equality or hashing.

Absent URI or prefix is represented as the empty string; the constructors
normalize `None` accordingly.
*/
#[derive(Debug, Clone)]
pub struct QName {
	uri: SmartString,
	local: SmartString,
	prefix: SmartString,
}

impl QName {
	/// Create a name from its parts.
	///
	/// `None` for the URI or prefix is normalized to the empty string.
	pub fn new<L: Into<SmartString>>(local: L, uri: Option<&str>, prefix: Option<&str>) -> QName {
		QName {
			uri: uri.unwrap_or("").into(),
			local: local.into(),
			prefix: prefix.unwrap_or("").into(),
		}
	}

	/// Create a name from a `prefix:local` string, with the namespace URI
	/// supplied separately.
	///
	/// The qualified string is split on the *first* colon; without a colon,
	/// the whole string is the local name and the prefix is empty.
	pub fn from_qualified(qualified: &str, uri: Option<&str>) -> QName {
		match qualified.split_once(':') {
			Some((prefix, local)) => QName::new(local, uri, Some(prefix)),
			None => QName::new(qualified, uri, None),
		}
	}

	/// Namespace URI, empty if the name is in no namespace.
	pub fn uri(&self) -> &str {
		&self.uri
	}

	/// Local name.
	pub fn local(&self) -> &str {
		&self.local
	}

	/// Prefix, empty if the name was written without one.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Render the name as it would appear in a document: `prefix:local`, or
	/// just `local` if the prefix is empty.
	pub fn qualified(&self) -> String {
		if self.prefix.is_empty() {
			self.local.to_string()
		} else {
			format!("{}:{}", self.prefix, self.local)
		}
	}
}

impl PartialEq for QName {
	fn eq(&self, other: &QName) -> bool {
		self.uri == other.uri && self.local == other.local
	}
}

impl Eq for QName {}

impl Hash for QName {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.uri.hash(state);
		self.local.hash(state);
	}
}

impl fmt::Display for QName {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		if self.prefix.is_empty() {
			f.write_str(&self.local)
		} else {
			write!(f, "{}:{}", self.prefix, self.local)
		}
	}
}

/// Kind tag of an [`Event`].
///
/// The kind query ([`Event::kind`]) is always available and never fails,
/// in contrast to the narrowing accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	StartSequence,
	EndSequence,
	StartDocument,
	EndDocument,
	Namespace,
	StartElement,
	EndElement,
	Attribute,
	Text,
	Pi,
	Comment,
}

impl EventKind {
	/// Stable name of the kind, as used in debug renderings and
	/// diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			EventKind::StartSequence => "START_SEQUENCE",
			EventKind::EndSequence => "END_SEQUENCE",
			EventKind::StartDocument => "START_DOCUMENT",
			EventKind::EndDocument => "END_DOCUMENT",
			EventKind::Namespace => "NAMESPACE",
			EventKind::StartElement => "START_ELEMENT",
			EventKind::EndElement => "END_ELEMENT",
			EventKind::Attribute => "ATTRIBUTE",
			EventKind::Text => "TEXT",
			EventKind::Pi => "PI",
			EventKind::Comment => "COMMENT",
		}
	}
}

impl fmt::Display for EventKind {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		f.write_str(self.name())
	}
}

/**
# Infoset event

One token of the XML infoset, as a closed set of variants. Events are
created once by a producer, never mutated, consumed exactly once by the
next stage and then dropped.

Element and attribute events carry their name as a [`SharedQName`], so
cloning an event never copies the name data and a [`crate::Context`] can
canonicalize names across streams.

The [`fmt::Display`] impl renders the debug string format used in logs and
tests: the kind name followed by the primary human-readable attribute
(local name for elements and attributes, data for text and comments, target
for processing instructions, URI for documents).
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
	/// Start of the whole event sequence.
	StartSequence,
	/// End of the whole event sequence.
	EndSequence,
	/// Start of one document; carries the document URI.
	StartDocument(SmartString),
	/// End of one document; carries the document URI.
	EndDocument(SmartString),
	/// One prefix→URI binding introduced by the enclosing element's start
	/// tag. An empty prefix declares the default namespace.
	Namespace {
		prefix: SmartString,
		uri: SmartString,
	},
	/// Start of an element.
	StartElement(SharedQName),
	/// End of an element.
	EndElement(SharedQName),
	/// One attribute of the enclosing element.
	Attribute {
		name: SharedQName,
		value: SmartString,
	},
	/// Character data.
	Text(SmartString),
	/// Processing instruction.
	Pi {
		target: SmartString,
		data: SmartString,
	},
	/// Comment.
	Comment(SmartString),
}

impl Event {
	/* factories, one per kind */

	pub fn start_sequence() -> Event {
		Event::StartSequence
	}

	pub fn end_sequence() -> Event {
		Event::EndSequence
	}

	pub fn start_document<U: Into<SmartString>>(uri: U) -> Event {
		Event::StartDocument(uri.into())
	}

	pub fn end_document<U: Into<SmartString>>(uri: U) -> Event {
		Event::EndDocument(uri.into())
	}

	/// Create a namespace binding event.
	///
	/// An absent prefix is normalized to the empty string, which declares
	/// the default namespace.
	pub fn namespace<U: Into<SmartString>>(prefix: Option<&str>, uri: U) -> Event {
		Event::Namespace {
			prefix: prefix.unwrap_or("").into(),
			uri: uri.into(),
		}
	}

	pub fn start_element<N: Into<SharedQName>>(name: N) -> Event {
		Event::StartElement(name.into())
	}

	pub fn end_element<N: Into<SharedQName>>(name: N) -> Event {
		Event::EndElement(name.into())
	}

	pub fn attribute<N: Into<SharedQName>, V: Into<SmartString>>(name: N, value: V) -> Event {
		Event::Attribute {
			name: name.into(),
			value: value.into(),
		}
	}

	pub fn text<T: Into<SmartString>>(data: T) -> Event {
		Event::Text(data.into())
	}

	pub fn pi<T: Into<SmartString>, D: Into<SmartString>>(target: T, data: D) -> Event {
		Event::Pi {
			target: target.into(),
			data: data.into(),
		}
	}

	pub fn comment<D: Into<SmartString>>(data: D) -> Event {
		Event::Comment(data.into())
	}

	/// Return the kind tag of this event.
	pub fn kind(&self) -> EventKind {
		match self {
			Event::StartSequence => EventKind::StartSequence,
			Event::EndSequence => EventKind::EndSequence,
			Event::StartDocument(..) => EventKind::StartDocument,
			Event::EndDocument(..) => EventKind::EndDocument,
			Event::Namespace { .. } => EventKind::Namespace,
			Event::StartElement(..) => EventKind::StartElement,
			Event::EndElement(..) => EventKind::EndElement,
			Event::Attribute { .. } => EventKind::Attribute,
			Event::Text(..) => EventKind::Text,
			Event::Pi { .. } => EventKind::Pi,
			Event::Comment(..) => EventKind::Comment,
		}
	}

	/* narrowing accessors */

	/// Narrow to an exact kind without accessing a payload.
	///
	/// This is the narrowing operation for the payload-free kinds
	/// (`START_SEQUENCE`, `END_SEQUENCE`), but works for any kind.
	pub fn expect_kind(&self, kind: EventKind) -> Result<&Event> {
		if self.kind() == kind {
			Ok(self)
		} else {
			Err(Error::TypeMismatch {
				expected: kind.name(),
				actual: self.kind(),
			})
		}
	}

	/// Qualified name of an element or attribute event.
	pub fn name(&self) -> Result<&SharedQName> {
		match self {
			Event::StartElement(name) | Event::EndElement(name) => Ok(name),
			Event::Attribute { name, .. } => Ok(name),
			other => Err(Error::TypeMismatch {
				expected: "START_ELEMENT, END_ELEMENT or ATTRIBUTE",
				actual: other.kind(),
			}),
		}
	}

	/// URI of a document delimiter event.
	pub fn document_uri(&self) -> Result<&str> {
		match self {
			Event::StartDocument(uri) | Event::EndDocument(uri) => Ok(uri),
			other => Err(Error::TypeMismatch {
				expected: "START_DOCUMENT or END_DOCUMENT",
				actual: other.kind(),
			}),
		}
	}

	/// Prefix of a namespace binding event; empty for the default
	/// namespace.
	pub fn namespace_prefix(&self) -> Result<&str> {
		match self {
			Event::Namespace { prefix, .. } => Ok(prefix),
			other => Err(Error::TypeMismatch {
				expected: "NAMESPACE",
				actual: other.kind(),
			}),
		}
	}

	/// URI of a namespace binding event.
	pub fn namespace_uri(&self) -> Result<&str> {
		match self {
			Event::Namespace { uri, .. } => Ok(uri),
			other => Err(Error::TypeMismatch {
				expected: "NAMESPACE",
				actual: other.kind(),
			}),
		}
	}

	/// Value of an attribute event.
	pub fn attribute_value(&self) -> Result<&str> {
		match self {
			Event::Attribute { value, .. } => Ok(value),
			other => Err(Error::TypeMismatch {
				expected: "ATTRIBUTE",
				actual: other.kind(),
			}),
		}
	}

	/// Character data of a text, processing instruction or comment event.
	pub fn data(&self) -> Result<&str> {
		match self {
			Event::Text(data) | Event::Comment(data) => Ok(data),
			Event::Pi { data, .. } => Ok(data),
			other => Err(Error::TypeMismatch {
				expected: "TEXT, PI or COMMENT",
				actual: other.kind(),
			}),
		}
	}

	/// Target of a processing instruction event.
	pub fn pi_target(&self) -> Result<&str> {
		match self {
			Event::Pi { target, .. } => Ok(target),
			other => Err(Error::TypeMismatch {
				expected: "PI",
				actual: other.kind(),
			}),
		}
	}

	/* kind predicates */

	pub fn is_start_sequence(&self) -> bool {
		matches!(self, Event::StartSequence)
	}

	pub fn is_end_sequence(&self) -> bool {
		matches!(self, Event::EndSequence)
	}

	pub fn is_start_document(&self) -> bool {
		matches!(self, Event::StartDocument(..))
	}

	pub fn is_end_document(&self) -> bool {
		matches!(self, Event::EndDocument(..))
	}

	pub fn is_namespace(&self) -> bool {
		matches!(self, Event::Namespace { .. })
	}

	pub fn is_start_element(&self) -> bool {
		matches!(self, Event::StartElement(..))
	}

	pub fn is_end_element(&self) -> bool {
		matches!(self, Event::EndElement(..))
	}

	pub fn is_attribute(&self) -> bool {
		matches!(self, Event::Attribute { .. })
	}

	pub fn is_text(&self) -> bool {
		matches!(self, Event::Text(..))
	}

	pub fn is_pi(&self) -> bool {
		matches!(self, Event::Pi { .. })
	}

	pub fn is_comment(&self) -> bool {
		matches!(self, Event::Comment(..))
	}
}

impl fmt::Display for Event {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Event::StartSequence | Event::EndSequence => f.write_str(self.kind().name()),
			Event::StartDocument(uri) | Event::EndDocument(uri) => {
				write!(f, "{} {}", self.kind(), uri)
			}
			Event::Namespace { prefix, uri } => write!(f, "{} {}:{}", self.kind(), prefix, uri),
			Event::StartElement(name) | Event::EndElement(name) => {
				write!(f, "{} {}", self.kind(), name.local())
			}
			Event::Attribute { name, .. } => write!(f, "{} {}", self.kind(), name.local()),
			Event::Text(data) => write!(f, "{} {}", self.kind(), data),
			Event::Pi { target, .. } => write!(f, "{} {}", self.kind(), target),
			Event::Comment(data) => write!(f, "{} {}", self.kind(), data),
		}
	}
}

/**
# Access to the underlying event of a stream item

Filters which only observe the event structure (such as
[`crate::NamespaceScopeTracker`]) are generic over this trait, so they can
sit in chains of bare [`Event`]s as well as chains of wrappers like
[`crate::MatchedEvent`].
*/
pub trait AsEvent {
	/// Return the underlying event.
	fn event(&self) -> &Event;
}

impl AsEvent for Event {
	fn event(&self) -> &Event {
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;

	#[test]
	fn kind_is_available_for_every_event() {
		assert_eq!(Event::start_sequence().kind(), EventKind::StartSequence);
		assert_eq!(Event::end_sequence().kind(), EventKind::EndSequence);
		assert_eq!(Event::start_document("d").kind(), EventKind::StartDocument);
		assert_eq!(Event::end_document("d").kind(), EventKind::EndDocument);
		assert_eq!(
			Event::namespace(Some("p"), "urn:x").kind(),
			EventKind::Namespace
		);
		assert_eq!(
			Event::start_element(QName::new("e", None, None)).kind(),
			EventKind::StartElement
		);
		assert_eq!(
			Event::end_element(QName::new("e", None, None)).kind(),
			EventKind::EndElement
		);
		assert_eq!(
			Event::attribute(QName::new("a", None, None), "v").kind(),
			EventKind::Attribute
		);
		assert_eq!(Event::text("t").kind(), EventKind::Text);
		assert_eq!(Event::pi("tgt", "data").kind(), EventKind::Pi);
		assert_eq!(Event::comment("c").kind(), EventKind::Comment);
	}

	#[test]
	fn narrowing_text_as_attribute_fails_with_type_mismatch() {
		let ev = Event::text("hello");
		match ev.attribute_value() {
			Err(Error::TypeMismatch { expected, actual }) => {
				assert_eq!(expected, "ATTRIBUTE");
				assert_eq!(actual, EventKind::Text);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn narrowing_on_matching_kind_returns_payload() {
		let name = QName::new("lang", Some("http://www.w3.org/XML/1998/namespace"), Some("xml"));
		let ev = Event::attribute(name, "en");
		assert_eq!(ev.name().unwrap().local(), "lang");
		assert_eq!(ev.attribute_value().unwrap(), "en");
		assert_eq!(Event::start_document("doc.xml").document_uri().unwrap(), "doc.xml");
		assert_eq!(Event::text("hello").data().unwrap(), "hello");
		assert_eq!(Event::pi("tgt", "data").pi_target().unwrap(), "tgt");
		assert_eq!(Event::pi("tgt", "data").data().unwrap(), "data");
		assert_eq!(Event::comment("c").data().unwrap(), "c");
		let ns = Event::namespace(Some("p"), "urn:x");
		assert_eq!(ns.namespace_prefix().unwrap(), "p");
		assert_eq!(ns.namespace_uri().unwrap(), "urn:x");
	}

	#[test]
	fn expect_kind_narrows_payload_free_kinds() {
		let ev = Event::start_sequence();
		ev.expect_kind(EventKind::StartSequence).unwrap();
		match ev.expect_kind(EventKind::EndSequence) {
			Err(Error::TypeMismatch { expected, actual }) => {
				assert_eq!(expected, "END_SEQUENCE");
				assert_eq!(actual, EventKind::StartSequence);
			}
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn qname_identity_ignores_prefix() {
		let a = QName::new("item", Some("urn:x"), Some("p"));
		let b = QName::new("item", Some("urn:x"), Some("q"));
		let c = QName::new("item", Some("urn:y"), Some("p"));
		assert_eq!(a, b);
		assert_ne!(a, c);

		let mut m = HashMap::new();
		m.insert(a, 1u32);
		assert_eq!(m.get(&b), Some(&1u32));
	}

	#[test]
	fn qname_from_qualified_splits_on_first_colon() {
		let qn = QName::from_qualified("p:local", Some("urn:x"));
		assert_eq!(qn.prefix(), "p");
		assert_eq!(qn.local(), "local");
		assert_eq!(qn.uri(), "urn:x");

		let qn = QName::from_qualified("a:b:c", None);
		assert_eq!(qn.prefix(), "a");
		assert_eq!(qn.local(), "b:c");

		let qn = QName::from_qualified("plain", None);
		assert_eq!(qn.prefix(), "");
		assert_eq!(qn.local(), "plain");
	}

	#[test]
	fn qname_normalizes_absent_parts_to_empty() {
		let qn = QName::new("e", None, None);
		assert_eq!(qn.uri(), "");
		assert_eq!(qn.prefix(), "");
		assert_eq!(qn.qualified(), "e");

		let qn = QName::new("e", Some("urn:x"), Some("p"));
		assert_eq!(qn.qualified(), "p:e");
	}

	#[test]
	fn namespace_factory_normalizes_absent_prefix() {
		let ev = Event::namespace(None, "urn:x");
		assert_eq!(ev.namespace_prefix().unwrap(), "");
	}

	#[test]
	fn display_renders_kind_and_primary_attribute() {
		assert_eq!(Event::start_sequence().to_string(), "START_SEQUENCE");
		assert_eq!(
			Event::start_document("doc.xml").to_string(),
			"START_DOCUMENT doc.xml"
		);
		assert_eq!(
			Event::namespace(Some("p"), "urn:x").to_string(),
			"NAMESPACE p:urn:x"
		);
		assert_eq!(
			Event::start_element(QName::from_qualified("p:root", Some("urn:x"))).to_string(),
			"START_ELEMENT root"
		);
		assert_eq!(
			Event::attribute(QName::new("id", None, None), "42").to_string(),
			"ATTRIBUTE id"
		);
		assert_eq!(Event::text("hi").to_string(), "TEXT hi");
		assert_eq!(Event::pi("tgt", "data").to_string(), "PI tgt");
		assert_eq!(Event::comment("note").to_string(), "COMMENT note");
	}

	#[test]
	fn type_mismatch_display_names_both_kinds() {
		let err = Event::text("x").name().err().unwrap();
		assert_eq!(
			err.to_string(),
			"type mismatch: expected START_ELEMENT, END_ELEMENT or ATTRIBUTE, got TEXT"
		);
	}
}
