/// Nanoseconds since the UNIX epoch, truncated to 64 bits. Used to seed noise.
pub fn timestamp_nanos() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64
}
