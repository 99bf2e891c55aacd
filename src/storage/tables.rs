use redb::TableDefinition;

/// A named document collection: document id -> msgpack document body.
pub type Collection = TableDefinition<'static, &'static str, &'static [u8]>;

/// User-submitted reviews awaiting moderation
pub const PENDING_REVIEWS: Collection = TableDefinition::new("PendingReviews");

/// Reviews accepted by an admin; `is_hidden` controls public visibility
pub const APPROVED_REVIEWS: Collection = TableDefinition::new("ApprovedReviews");

/// Achievement cards, each owning one image blob
pub const ACHIEVEMENTS: Collection = TableDefinition::new("Achievements");

/// Holds the `MainProfile` singleton
pub const PROFILE_SECTION: Collection = TableDefinition::new("ProfileSection");

/// Holds the `MainSlides` singleton with its `slides` array field
pub const SLIDESHOW_MAIN: Collection = TableDefinition::new("SlideshowMain");

/// Every collection, for purge and initialization sweeps.
pub const ALL_COLLECTIONS: [Collection; 5] = [
    PENDING_REVIEWS,
    APPROVED_REVIEWS,
    ACHIEVEMENTS,
    PROFILE_SECTION,
    SLIDESHOW_MAIN,
];

/// Singleton document ids
pub const MAIN_PROFILE: &str = "MainProfile";
pub const MAIN_SLIDES: &str = "MainSlides";
