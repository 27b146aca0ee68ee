//! Certification paths.
//!
//! [RFC 6066](https://tools.ietf.org/html/rfc6066) uses the `PkiPath` type
//! to transfer a certificate chain, starting with the certificate closest
//! to the trust anchor.

use log::debug;
use crate::registry::Registries;
use crate::schema::Schema;
use super::rfc5280;


/// `PkiPath`
pub fn pki_path() -> Schema {
    Schema::sequence_of(rfc5280::certificate())
}

/// Registers nothing.
///
/// The module doesn’t define any open type entries. The function exists so
/// all catalog modules can be treated alike.
pub fn register(_registries: &mut Registries) {
    debug!("RFC 6066 has no registry entries.");
}


//============ Tests =========================================================
