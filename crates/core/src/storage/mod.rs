pub mod json_codec;
#[cfg(not(target_arch = "wasm32"))]
pub mod local_vault;
pub mod memory_vault;
pub mod paths;
pub mod repository;
pub mod traits;
