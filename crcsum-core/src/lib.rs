pub mod aggregate;
pub mod checksum;
pub mod discover;
pub mod job;
pub mod manifest;
pub mod path_safety;
pub mod pool;
pub mod progress;
pub mod scan;
pub mod verify;
