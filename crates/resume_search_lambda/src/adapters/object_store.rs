use std::time::Duration;

use crate::error::StoreError;

pub trait ObjectStore {
    fn put_object(&self, bucket: &str, key: &str, body: &[u8]) -> Result<(), StoreError>;
}

/// Issues time-limited read links for stored objects.
pub trait LinkSigner {
    fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration)
        -> Result<String, StoreError>;
}
