pub(crate) mod handlers;
pub(crate) mod params;
pub mod response;
