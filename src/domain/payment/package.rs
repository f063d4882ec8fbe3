//! Payment package catalog.
//!
//! Packages and amounts are defined server-side only; a client-supplied
//! amount is never trusted. MindSpace sells a single one-time unlock.

use serde::Serialize;

/// Package id for the one-time full-access unlock.
pub const UNLOCK_FULL_ACCESS: &str = "unlock_full_access";

/// A purchasable package with a fixed server-side price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentPackage {
    /// Stable package identifier.
    pub id: &'static str,

    /// Price in cents.
    pub amount_cents: i64,

    /// ISO currency code.
    pub currency: &'static str,

    /// Checkout line-item description.
    pub description: &'static str,
}

impl PaymentPackage {
    /// Looks up a package by id.
    ///
    /// Returns `None` for unknown ids; the caller rejects the checkout.
    pub fn lookup(package_id: &str) -> Option<&'static PaymentPackage> {
        CATALOG.iter().find(|p| p.id == package_id)
    }
}

/// The fixed catalog: a single $1.00 one-time payment.
static CATALOG: &[PaymentPackage] = &[PaymentPackage {
    id: UNLOCK_FULL_ACCESS,
    amount_cents: 100,
    currency: "usd",
    description: "MindSpace Full Access - One-time payment",
}];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unlock_package_exists_with_fixed_price() {
        let package = PaymentPackage::lookup(UNLOCK_FULL_ACCESS).unwrap();
        assert_eq!(package.amount_cents, 100);
        assert_eq!(package.currency, "usd");
    }

    #[test]
    fn unknown_package_is_rejected() {
        assert!(PaymentPackage::lookup("premium_plus").is_none());
        assert!(PaymentPackage::lookup("").is_none());
    }
}
