//! Typed entity identifiers.
//!
//! One UUID wrapper per entity kind, so an `AccountId` can never be passed
//! where an `AffiliateId` is expected. The marker types carry no data; the
//! wrapper is `Copy` and stores the bare UUID.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// UUID tagged with an entity marker
///
/// ```
/// use kernel::id::{Id, markers};
/// type AccountId = Id<markers::Account>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Mint a fresh random ID (UUID v4)
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID, e.g. one read from the database
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Borrow the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Unwrap into the bare UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

/// Marker types, one per identified entity
///
/// The markers must carry the same derives as `Id` itself: `derive` on a
/// generic type bounds `T`, so a marker without `Clone` would strip `Clone`
/// from every entity holding its id.
pub mod markers {
    /// Login account
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Account;

    /// Affiliate profile
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Affiliate;

    /// Submitted referral
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Referral;
}

pub type AccountId = Id<markers::Account>;
pub type AffiliateId = Id<markers::Affiliate>;
pub type ReferralId = Id<markers::Referral>;
