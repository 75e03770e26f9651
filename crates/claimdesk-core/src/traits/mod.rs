//! Backend trait consumed by the resource layer.

mod resource_api;

pub use resource_api::ResourceApi;
