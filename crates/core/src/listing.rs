//! Listing lifecycle statuses and the UI/DB status translation table.
//!
//! Statuses are stored as SMALLINT lookup ids (1-based, matching the seed
//! data order in the `listing_statuses` table). The web UI works with German
//! status slugs; [`ListingStatus::ui_status`] and
//! [`ListingStatus::from_ui_status`] form a bijection over the defined
//! domain, so round-tripping either way is lossless.

/// Status ID type matching SMALLINT/SMALLSERIAL in the database.
pub type StatusId = i16;

/// Listing lifecycle status.
///
/// Transitions are driven by the checkout flow (`Draft` ->
/// `PendingPayment`), the payment webhook (`PendingPayment` ->
/// `PendingSync`), the syndication worker (`PendingSync` -> `Active`), and
/// manual owner actions (deactivate/reactivate/market/archive).
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    Draft = 1,
    PendingPayment = 2,
    PendingSync = 3,
    Active = 4,
    Deactivated = 5,
    Marketed = 6,
    Archived = 7,
    Deleted = 8,
}

/// All defined statuses, in seed-data order.
pub const ALL_STATUSES: [ListingStatus; 8] = [
    ListingStatus::Draft,
    ListingStatus::PendingPayment,
    ListingStatus::PendingSync,
    ListingStatus::Active,
    ListingStatus::Deactivated,
    ListingStatus::Marketed,
    ListingStatus::Archived,
    ListingStatus::Deleted,
];

impl ListingStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Look up a status by its database ID.
    pub fn from_id(id: StatusId) -> Option<Self> {
        ALL_STATUSES.iter().copied().find(|s| s.id() == id)
    }

    /// The UI-facing status slug (German, as rendered by the web frontend).
    pub fn ui_status(self) -> &'static str {
        match self {
            ListingStatus::Draft => "entwurf",
            ListingStatus::PendingPayment => "zahlung_ausstehend",
            ListingStatus::PendingSync => "wird_veroeffentlicht",
            ListingStatus::Active => "aktiv",
            ListingStatus::Deactivated => "deaktiviert",
            ListingStatus::Marketed => "vermarktet",
            ListingStatus::Archived => "archiviert",
            ListingStatus::Deleted => "geloescht",
        }
    }

    /// Inverse of [`ui_status`](Self::ui_status).
    pub fn from_ui_status(slug: &str) -> Option<Self> {
        ALL_STATUSES.iter().copied().find(|s| s.ui_status() == slug)
    }

    /// Whether the owner may hard-delete a listing in this status.
    ///
    /// Only `entwurf` rows are deletable. `zahlung_ausstehend` is excluded
    /// on purpose: a hosted checkout session may still complete against the
    /// row after the owner clicked delete.
    pub fn is_deletable(self) -> bool {
        matches!(self, ListingStatus::Draft)
    }

    /// Whether the owner may manually move a listing from `self` to `to`.
    ///
    /// Owners can toggle active/deactivated, mark an exposed listing as
    /// marketed, and archive anything that is not already deleted. All
    /// other transitions belong to the payment/syndication machinery.
    pub fn owner_may_transition(self, to: ListingStatus) -> bool {
        use ListingStatus::*;
        match (self, to) {
            (Active, Deactivated) | (Deactivated, Active) => true,
            (Active, Marketed) | (Deactivated, Marketed) => true,
            (Deleted, _) => false,
            (_, Archived) => true,
            _ => false,
        }
    }
}

/// Paid publication package. Determines the one-off listing fee and the
/// portal runtime purchased with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Package {
    Basis,
    Plus,
    Premium,
}

impl Package {
    pub fn code(self) -> &'static str {
        match self {
            Package::Basis => "basis",
            Package::Plus => "plus",
            Package::Premium => "premium",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "basis" => Some(Package::Basis),
            "plus" => Some(Package::Plus),
            "premium" => Some(Package::Premium),
            _ => None,
        }
    }

    /// One-off listing fee in Euro cents.
    pub fn price_cents(self) -> i64 {
        match self {
            Package::Basis => 4_990,
            Package::Plus => 7_990,
            Package::Premium => 12_990,
        }
    }

    /// Portal runtime purchased with the package, in days.
    pub fn runtime_days(self) -> i32 {
        match self {
            Package::Basis => 90,
            Package::Plus => 180,
            Package::Premium => 365,
        }
    }
}

impl Default for Package {
    fn default() -> Self {
        Package::Basis
    }
}

/// Whether a listing offers the property for sale or for rent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Sale,
    Rent,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Sale => "sale",
            TransactionType::Rent => "rent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sale" => Some(TransactionType::Sale),
            "rent" => Some(TransactionType::Rent),
            _ => None,
        }
    }
}

/// Intended use of the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageType {
    Residential,
    Commercial,
    Plot,
}

impl UsageType {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageType::Residential => "residential",
            UsageType::Commercial => "commercial",
            UsageType::Plot => "plot",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "residential" => Some(UsageType::Residential),
            "commercial" => Some(UsageType::Commercial),
            "plot" => Some(UsageType::Plot),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(ListingStatus::Draft.id(), 1);
        assert_eq!(ListingStatus::PendingPayment.id(), 2);
        assert_eq!(ListingStatus::PendingSync.id(), 3);
        assert_eq!(ListingStatus::Active.id(), 4);
        assert_eq!(ListingStatus::Deactivated.id(), 5);
        assert_eq!(ListingStatus::Marketed.id(), 6);
        assert_eq!(ListingStatus::Archived.id(), 7);
        assert_eq!(ListingStatus::Deleted.id(), 8);
    }

    #[test]
    fn ui_status_mapping_is_a_bijection() {
        // Every status maps to a distinct slug and back to itself.
        let mut seen = std::collections::HashSet::new();
        for status in ALL_STATUSES {
            let slug = status.ui_status();
            assert!(seen.insert(slug), "duplicate UI slug: {slug}");
            assert_eq!(ListingStatus::from_ui_status(slug), Some(status));
        }
        assert_eq!(seen.len(), ALL_STATUSES.len());
    }

    #[test]
    fn unknown_ui_status_maps_to_none() {
        assert_eq!(ListingStatus::from_ui_status("veroeffentlicht"), None);
        assert_eq!(ListingStatus::from_ui_status(""), None);
    }

    #[test]
    fn from_id_round_trips() {
        for status in ALL_STATUSES {
            assert_eq!(ListingStatus::from_id(status.id()), Some(status));
        }
        assert_eq!(ListingStatus::from_id(0), None);
        assert_eq!(ListingStatus::from_id(9), None);
    }

    #[test]
    fn only_draft_is_deletable() {
        for status in ALL_STATUSES {
            assert_eq!(
                status.is_deletable(),
                status == ListingStatus::Draft,
                "{status:?}"
            );
        }
    }

    #[test]
    fn owner_transitions() {
        use ListingStatus::*;
        assert!(Active.owner_may_transition(Deactivated));
        assert!(Deactivated.owner_may_transition(Active));
        assert!(Active.owner_may_transition(Marketed));
        assert!(Deactivated.owner_may_transition(Marketed));
        assert!(PendingPayment.owner_may_transition(Archived));

        // Payment-driven moves are not available to the owner.
        assert!(!Draft.owner_may_transition(Active));
        assert!(!PendingPayment.owner_may_transition(PendingSync));
        assert!(!PendingSync.owner_may_transition(Active));
        assert!(!Deleted.owner_may_transition(Archived));
    }

    #[test]
    fn package_codes_round_trip() {
        for p in [Package::Basis, Package::Plus, Package::Premium] {
            assert_eq!(Package::parse(p.code()), Some(p));
            assert!(p.price_cents() > 0);
            assert!(p.runtime_days() > 0);
        }
        assert_eq!(Package::parse("gold"), None);
        assert_eq!(Package::default(), Package::Basis);
    }

    #[test]
    fn transaction_and_usage_round_trip() {
        for t in [TransactionType::Sale, TransactionType::Rent] {
            assert_eq!(TransactionType::parse(t.as_str()), Some(t));
        }
        for u in [
            UsageType::Residential,
            UsageType::Commercial,
            UsageType::Plot,
        ] {
            assert_eq!(UsageType::parse(u.as_str()), Some(u));
        }
        assert_eq!(TransactionType::parse("lease"), None);
        assert_eq!(UsageType::parse("mixed"), None);
    }
}
