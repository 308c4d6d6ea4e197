mod hashing;
mod timeouts;
