pub mod dataset;
pub mod store;

pub use dataset::Dataset;
pub use store::ContentStore;
