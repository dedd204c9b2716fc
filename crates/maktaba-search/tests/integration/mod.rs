mod search_service;
#[cfg(feature = "typesense")]
mod typesense_backend;
