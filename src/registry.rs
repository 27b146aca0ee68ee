//! Registries mapping object identifiers to schemas.
//!
//! Open types are resolved by looking up the value of their governing
//! component, an object identifier, in a named [`Registry`]. A
//! [`Registries`] value collects all the named registries used during one
//! decoding run.
//!
//! Registries are filled by any number of independent modules, each
//! contributing the types it knows about. If two modules register the same
//! identifier, the later registration wins.
//!
//! The [`global`] module provides a process-wide set of registries with an
//! explicit life cycle: registrations are collected during start-up, then
//! the registries are frozen and only read from afterwards.

use std::{error, fmt};
use std::collections::HashMap;
use std::sync::Arc;
use bytes::Bytes;
use log::debug;
use crate::oid::Oid;
use crate::schema::Schema;


//------------ Registry Names ------------------------------------------------

/// The types of the values of X.509 certificate extensions.
pub const CERTIFICATE_EXTENSIONS: &str = "certificateExtensions";

/// The types of the content of CMS messages.
pub const CMS_CONTENT_TYPES: &str = "cmsContentTypes";

/// The types of the values of CMS attributes.
pub const CMS_ATTRIBUTES: &str = "cmsAttributes";

/// The types of the parameters of algorithm identifiers.
pub const ALGORITHM_IDENTIFIER_PARAMETERS: &str
    = "algorithmIdentifierParameters";

/// The types of the parameters of S/MIME capabilities.
pub const SMIME_CAPABILITIES: &str = "smimeCapabilities";

/// The types of the values of attributes in distinguished names.
pub const CERTIFICATE_ATTRIBUTES: &str = "certificateAttributes";

/// The types of the content of PKCS #7 messages.
pub const PKCS7_CONTENT_TYPES: &str = "pkcs7ContentTypes";


//------------ Registry ------------------------------------------------------

/// A map from object identifiers to schemas.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    entries: HashMap<Bytes, Arc<Schema>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the schema for an object identifier.
    ///
    /// If there already was a schema for the identifier, it is replaced
    /// and returned.
    pub fn register<T: AsRef<[u8]>>(
        &mut self, oid: &Oid<T>, schema: impl Into<Arc<Schema>>
    ) -> Option<Arc<Schema>> {
        let res = self.entries.insert(
            Bytes::copy_from_slice(oid.as_slice()), schema.into()
        );
        if res.is_some() {
            debug!("Replaced registered schema for {}.", oid);
        }
        res
    }

    /// Returns the schema registered for an object identifier.
    pub fn lookup<T: AsRef<[u8]>>(&self, oid: &Oid<T>) -> Option<&Arc<Schema>> {
        self.entries.get(oid.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns an iterator over all entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Oid, &Arc<Schema>)> + '_ {
        self.entries.iter().map(|(oid, schema)| (Oid(oid.clone()), schema))
    }

    /// Registers all entries of `other`.
    pub fn merge(&mut self, other: &Registry) {
        for (oid, schema) in other.iter() {
            self.register(&oid, schema.clone());
        }
    }
}


//------------ Registries ----------------------------------------------------

/// A collection of named registries.
#[derive(Clone, Debug, Default)]
pub struct Registries {
    registries: HashMap<String, Registry>,
}

impl Registries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the registry with the given name if it exists.
    pub fn registry(&self, name: &str) -> Option<&Registry> {
        self.registries.get(name)
    }

    /// Returns the registry with the given name, creating it if necessary.
    pub fn registry_mut(&mut self, name: &str) -> &mut Registry {
        self.registries.entry(name.into()).or_default()
    }

    /// Registers a schema in the registry `name`.
    pub fn register<T: AsRef<[u8]>>(
        &mut self,
        name: &str,
        oid: &Oid<T>,
        schema: impl Into<Arc<Schema>>,
    ) -> Option<Arc<Schema>> {
        self.registry_mut(name).register(oid, schema)
    }

    /// Looks up a schema in the registry `name`.
    ///
    /// Returns `None` if there is no such registry or if it has no entry
    /// for `oid`.
    pub fn lookup<T: AsRef<[u8]>>(
        &self, name: &str, oid: &Oid<T>
    ) -> Option<&Arc<Schema>> {
        self.registries.get(name)?.lookup(oid)
    }

    /// Returns the names of all registries.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.registries.keys().map(String::as_str)
    }

    /// Adds all entries of `other`, replacing existing ones.
    pub fn merge(&mut self, other: &Registries) {
        for (name, registry) in &other.registries {
            self.registry_mut(name).merge(registry)
        }
    }
}


//------------ RegistryError -------------------------------------------------

/// The process-wide registries could not be changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistryError {
    /// The registries have been frozen.
    Frozen,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RegistryError::Frozen => f.write_str("registries are frozen"),
        }
    }
}

impl error::Error for RegistryError { }


//------------ global --------------------------------------------------------

/// The process-wide registries.
///
/// During start-up, modules add their entries via [`register`] or
/// [`extend`]. Once [`freeze`] has been called, further registrations
/// fail. Readers take a [`snapshot`] which is never modified afterwards.
/// A complete new set of registries can still be swapped in via
/// [`replace`].
pub mod global {
    use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
    use lazy_static::lazy_static;
    use log::info;
    use crate::oid::Oid;
    use crate::schema::Schema;
    use super::{Registries, RegistryError};

    #[derive(Default)]
    struct Global {
        registries: Arc<Registries>,
        frozen: bool,
    }

    lazy_static! {
        static ref GLOBAL: RwLock<Global> = RwLock::new(Global::default());
    }

    fn read() -> RwLockReadGuard<'static, Global> {
        GLOBAL.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write() -> RwLockWriteGuard<'static, Global> {
        GLOBAL.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a schema in the process-wide registry `name`.
    pub fn register<T: AsRef<[u8]>>(
        name: &str, oid: &Oid<T>, schema: impl Into<Arc<Schema>>
    ) -> Result<Option<Arc<Schema>>, RegistryError> {
        let mut global = write();
        if global.frozen {
            return Err(RegistryError::Frozen)
        }
        Ok(Arc::make_mut(&mut global.registries).register(name, oid, schema))
    }

    /// Adds all entries of `registries`.
    pub fn extend(registries: &Registries) -> Result<(), RegistryError> {
        let mut global = write();
        if global.frozen {
            return Err(RegistryError::Frozen)
        }
        Arc::make_mut(&mut global.registries).merge(registries);
        Ok(())
    }

    /// Ends the registration phase.
    ///
    /// Returns the final registries.
    pub fn freeze() -> Arc<Registries> {
        let mut global = write();
        if !global.frozen {
            info!("Freezing process-wide schema registries.");
            global.frozen = true;
        }
        global.registries.clone()
    }

    pub fn is_frozen() -> bool {
        read().frozen
    }

    /// Returns the current registries.
    pub fn snapshot() -> Arc<Registries> {
        read().registries.clone()
    }

    /// Swaps in a complete new set of registries.
    ///
    /// This works even if the registries are frozen. Snapshots taken
    /// earlier keep seeing the previous registries. Returns those.
    pub fn replace(registries: Registries) -> Arc<Registries> {
        info!("Replacing process-wide schema registries.");
        std::mem::replace(&mut write().registries, Arc::new(registries))
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn oid(s: &str) -> Oid {
        Oid::from_str(s).unwrap()
    }

    #[test]
    fn last_write_wins() {
        let mut registry = Registry::new();
        assert!(registry.register(&oid("2.5.29.19"), Schema::null()).is_none());
        assert_eq!(
            registry.register(&oid("2.5.29.19"), Schema::integer()).as_deref(),
            Some(&Schema::null())
        );
        assert_eq!(
            registry.lookup(&oid("2.5.29.19")).map(|schema| &**schema),
            Some(&Schema::integer())
        );
        assert!(registry.lookup(&oid("2.5.29.15")).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registries() {
        let mut left = Registries::new();
        left.register(CERTIFICATE_EXTENSIONS, &oid("2.5.29.19"), Schema::null());
        let mut right = Registries::new();
        right.register(
            CERTIFICATE_EXTENSIONS, &oid("2.5.29.19"), Schema::integer()
        );
        right.register(CMS_CONTENT_TYPES, &oid("1.2.840.113549.1.7.1"),
            Schema::octet_string()
        );
        left.merge(&right);
        assert_eq!(
            left.lookup(CERTIFICATE_EXTENSIONS, &oid("2.5.29.19"))
                .map(|schema| &**schema),
            Some(&Schema::integer())
        );
        assert!(
            left.lookup(CMS_CONTENT_TYPES, &oid("1.2.840.113549.1.7.1"))
                .is_some()
        );
        assert!(left.lookup("unknown", &oid("2.5.29.19")).is_none());
        let mut names = left.names().collect::<Vec<_>>();
        names.sort_unstable();
        assert_eq!(names, [CERTIFICATE_EXTENSIONS, CMS_CONTENT_TYPES]);
    }

    // This is the only test touching the process-wide registries.
    #[test]
    fn global_life_cycle() {
        global::register(
            CERTIFICATE_EXTENSIONS, &oid("2.5.29.19"), Schema::null()
        ).unwrap();
        let early = global::snapshot();

        let mut more = Registries::new();
        more.register(CERTIFICATE_EXTENSIONS, &oid("2.5.29.15"),
            Schema::bit_string()
        );
        global::extend(&more).unwrap();
        assert!(early.lookup(CERTIFICATE_EXTENSIONS, &oid("2.5.29.15"))
            .is_none());

        let frozen = global::freeze();
        assert!(global::is_frozen());
        assert!(frozen.lookup(CERTIFICATE_EXTENSIONS, &oid("2.5.29.15"))
            .is_some());
        assert_eq!(
            global::register(
                CERTIFICATE_EXTENSIONS, &oid("2.5.29.32"), Schema::any()
            ),
            Err(RegistryError::Frozen)
        );
        assert_eq!(global::extend(&more), Err(RegistryError::Frozen));

        let previous = global::replace(Registries::new());
        assert!(Arc::ptr_eq(&previous, &frozen));
        assert!(global::snapshot().registry(CERTIFICATE_EXTENSIONS).is_none());
        assert!(frozen.lookup(CERTIFICATE_EXTENSIONS, &oid("2.5.29.19"))
            .is_some());
    }
}
