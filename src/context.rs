use std::fmt;

#[cfg(all(feature = "shared_names", feature = "mt"))]
use std::sync::{Mutex, MutexGuard, Weak};
#[cfg(all(feature = "shared_names", not(feature = "mt")))]
use std::cell::{RefCell, RefMut};
#[cfg(all(feature = "shared_names", not(feature = "mt")))]
use std::rc::Weak;

use crate::event::{QName, RcPtr, SharedQName};

#[cfg(feature = "shared_names")]
use weak_table;

#[cfg(feature = "shared_names")]
type QNameWeakSet = weak_table::WeakHashSet<Weak<QName>>;

/**
# Shared context for multiple event producers

This context allows producers to share data. This is useful in cases where
many producer streams run in the same application and all of them mint
events with similar qualified names.

As of writing, the context is only used to canonicalize qualified names,
and only if the `shared_names` feature is used for building. Without the
feature, the context still hands out [`SharedQName`]s, but each call
allocates a fresh one, so ownership stays simple and no global state
exists.

Even though the context is internally mutable, it can safely be shared with
an immutable reference between producers. If the crate is built with the
`mt` feature, the Context is Send and Sync and the canonicalization table
is lock-guarded, because independent pipeline branches may canonicalize
concurrently; otherwise it is neither.
*/
pub struct Context {
	#[cfg(all(feature = "shared_names", feature = "mt"))]
	names: Mutex<QNameWeakSet>,
	#[cfg(all(feature = "shared_names", not(feature = "mt")))]
	names: RefCell<QNameWeakSet>,
}

impl Context {
	#[cfg(all(feature = "shared_names", feature = "mt"))]
	fn wrap_names(names: QNameWeakSet) -> Mutex<QNameWeakSet> {
		Mutex::new(names)
	}

	#[cfg(all(feature = "shared_names", not(feature = "mt")))]
	fn wrap_names(names: QNameWeakSet) -> RefCell<QNameWeakSet> {
		RefCell::new(names)
	}

	/// Create a new context
	pub fn new() -> Context {
		Context {
			#[cfg(feature = "shared_names")]
			names: Self::wrap_names(weak_table::WeakHashSet::new()),
		}
	}

	#[cfg(all(feature = "shared_names", feature = "mt"))]
	fn lock_names<'a>(&'a self) -> MutexGuard<'a, QNameWeakSet> {
		self.names.lock().unwrap()
	}

	#[cfg(all(feature = "shared_names", not(feature = "mt")))]
	fn lock_names<'a>(&'a self) -> RefMut<'a, QNameWeakSet> {
		self.names.borrow_mut()
	}

	/// Intern a qualified name
	///
	/// The given name is interned in the context and a refcounted pointer
	/// is returned. When the last reference to that pointer expires, the
	/// name will be lazily removed from the internal storage.
	///
	/// Lookup uses qualified-name identity, which covers the namespace URI
	/// and local name only; interning a name whose (URI, local) pair is
	/// already live returns the existing pointer even if the prefixes
	/// differ.
	///
	/// To force expiry, call [`Context::release_temporaries`], although
	/// that should only rarely be necessary.
	pub fn intern(&self, name: QName) -> SharedQName {
		#[cfg(feature = "shared_names")]
		{
			let mut names = self.lock_names();
			return match names.get(&name) {
				Some(ptr) => ptr,
				None => {
					let ptr = RcPtr::new(name);
					names.insert(ptr.clone());
					ptr
				}
			};
		}
		#[cfg(not(feature = "shared_names"))]
		RcPtr::new(name)
	}

	/// Intern a name given as a `prefix:local` string, with the namespace
	/// URI supplied separately.
	pub fn qname(&self, qualified: &str, uri: Option<&str>) -> SharedQName {
		self.intern(QName::from_qualified(qualified, uri))
	}

	/// Intern a name given as its parts.
	pub fn qname_parts(
		&self,
		local: &str,
		uri: Option<&str>,
		prefix: Option<&str>,
	) -> SharedQName {
		self.intern(QName::new(local, uri, prefix))
	}

	/// Remove all unreferenced names from storage and shrink the storage
	/// to fit the requirements.
	///
	/// This should rarely be necessary to call. The internal storage will
	/// prefer expiring unused names over reallocating and will only
	/// reallocate if necessary.
	pub fn release_temporaries(&self) {
		#[cfg(feature = "shared_names")]
		{
			let mut names = self.lock_names();
			names.remove_expired();
			names.shrink_to_fit();
		}
	}

	/// Return the number of names interned.
	///
	/// Returns zero if built without `shared_names`. This count includes
	/// names which are unreferenced and which would be removed before the
	/// next reallocation.
	pub fn names(&self) -> usize {
		#[cfg(feature = "shared_names")]
		{
			let names = self.lock_names();
			names.len()
		}
		#[cfg(not(feature = "shared_names"))]
		0
	}
}

impl Default for Context {
	fn default() -> Context {
		Context::new()
	}
}

impl fmt::Debug for Context {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		let mut f = f.debug_struct("Context");
		f.field("instance", &(self as *const Context));
		#[cfg(feature = "shared_names")]
		{
			let names = self.lock_names();
			f.field("names.capacity()", &names.capacity())
				.field("names.len()", &names.len());
		}
		f.finish()
	}
}
