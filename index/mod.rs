pub mod algorithms;
pub mod collection;
pub mod coordinate;
pub mod record;

// 重新导出主要类型
pub use algorithms::distance::{haversine_miles, EARTH_RADIUS_MILES};
pub use algorithms::nearest::DistanceResult;
pub use collection::RecordCollection;
pub use coordinate::Coordinate;
pub use record::Record;
