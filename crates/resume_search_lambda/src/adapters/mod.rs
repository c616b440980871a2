pub mod attribute_codec;
pub mod aws;
pub mod document_store;
pub mod memory;
pub mod object_store;
