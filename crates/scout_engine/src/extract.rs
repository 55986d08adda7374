use scout_core::UserRecord;

use crate::Document;

/// A site adapter producing user records from one document snapshot.
///
/// Implementations never fail: selector misses and malformed markup shrink the
/// result instead.
pub trait UserExtractor {
    fn extract_users(&self, doc: &Document) -> Vec<UserRecord>;
}
