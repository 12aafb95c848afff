//! Durable client-side key-value storage.

mod errors;
mod file;
mod memory;

pub use errors::StorageError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// Bearer token of the signed-in user.
pub const TOKEN_KEY: &str = "token";

/// JSON encoded signed-in user.
pub const USER_KEY: &str = "user";

/// JSON encoded pending checkout snapshot.
pub const PENDING_CART_KEY: &str = "pending_cart";

/// String values keyed by name that outlive a single run of the client.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a value. Deleting a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
