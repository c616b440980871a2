pub mod finder;
pub mod response;
pub mod uploader;
