pub mod bundle_server;
pub mod producer;
