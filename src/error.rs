/// Errors that can occur when constructing a ShardMap.
///
/// Lookups and removals never fail: a missing key is reported through
/// `Option`, not through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The map was configured without a hasher and none was supplied.
    MissingHasher,
    /// A hash function was explicitly supplied but is unset.
    InvalidHasher,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::MissingHasher => write!(
                f,
                "no hasher configured for this key type; supply one with a custom hash function"
            ),
            Error::InvalidHasher => write!(f, "the supplied hash function is unset"),
        }
    }
}

impl std::error::Error for Error {}
