pub mod geojson_utils;
pub mod record_store;
#[allow(clippy::module_inception)]
pub mod storage;

pub use geojson_utils::{result_to_feature, result_to_geojson};
pub use record_store::{RecordStore, SerializationFormat, StoreError};
pub use storage::{DatabaseStats, FinderDatabase};
