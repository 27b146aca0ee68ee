//! Schemas for types defined in a number of RFCs.
//!
//! Each submodule covers one RFC. It provides functions returning the
//! schemas of the types defined there, constants for the object
//! identifiers it defines, and a `register` function that adds its open
//! type definitions to a set of [`Registries`].
//!
//! The function [`registries`] collects the definitions of all modules into
//! a fresh set of registries. [`install`] adds them to the process-wide
//! registries instead.

use log::debug;
use crate::registry::{global, Registries, RegistryError};
use crate::schema::{Fields, Schema};

pub mod rfc2315;
pub mod rfc3274;
pub mod rfc3779;
pub mod rfc5280;
pub mod rfc5652;
pub mod rfc5958;
pub mod rfc5990;
pub mod rfc6066;
pub mod rfc8551;


//------------ Functions -----------------------------------------------------

/// Adds the definitions of all modules to `registries`.
///
/// Modules are registered in the order of their RFC number. Later modules
/// replace definitions of earlier ones for the same identifier.
pub fn register(registries: &mut Registries) {
    rfc2315::register(registries);
    rfc3274::register(registries);
    rfc3779::register(registries);
    rfc5280::register(registries);
    rfc5652::register(registries);
    rfc5958::register(registries);
    rfc5990::register(registries);
    rfc6066::register(registries);
    rfc8551::register(registries);
}

/// Returns new registries with the definitions of all modules.
pub fn registries() -> Registries {
    let mut res = Registries::new();
    register(&mut res);
    debug!(
        "Built catalog registries: {}.",
        res.names().collect::<Vec<_>>().join(", ")
    );
    res
}

/// Adds the definitions of all modules to the process-wide registries.
///
/// This fails if the process-wide registries have already been frozen.
pub fn install() -> Result<(), RegistryError> {
    global::extend(&registries())
}

/// A SEQUENCE whose content is kept but not interpreted.
///
/// This is used for types that can appear in a structure but that the
/// catalog doesn’t describe in detail. All elements end up as extensions
/// of the decoded value and are encoded again unchanged.
pub(crate) fn opaque_sequence() -> Schema {
    Schema::sequence(Fields::new().extensible())
}


//============ Tests =========================================================
