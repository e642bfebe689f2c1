// src/config/consts.rs

// Local store
pub const STORE_DIR: &str = ".store";
pub const DATA_FILE: &str = "close_data.json";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_EXPORT_STEM: &str = "close-data";
